//! Prompt text sent to the generative model.

use super::models::{QuestionRequest, QuestionType};

const MULTIPLE_CHOICE_FORMAT: &str = r#"Each question object must have:
- "question": the question text.
- "options": an array of exactly 4 strings. Exactly one is correct; the others are plausible distractors.
- "correct_answer_index": the index of the correct option (0, 1, 2 or 3).
- "solution_steps": an array of steps explaining why the correct option is correct.
- "svg_image": SVG markup if the question has a figure, otherwise an empty string."#;

const CLASSIC_FORMAT: &str = r#"Each question object must have:
- "question": the question text.
- "answer": a short, precise answer.
- "solution_steps": an array of steps showing how the answer is reached.
- "svg_image": SVG markup if the question has a figure, otherwise an empty string."#;

const VISUAL_INSTRUCTION: &str = "When a figure helps the question, fill \"svg_image\" with valid, \
self-contained SVG markup that declares width, height and viewBox. Otherwise leave it empty.";

pub fn build_prompt(request: &QuestionRequest) -> String {
    let format = match request.question_type {
        QuestionType::MultipleChoice => MULTIPLE_CHOICE_FORMAT,
        QuestionType::Classic => CLASSIC_FORMAT,
    };
    let visual = if request.is_visual { VISUAL_INSTRUCTION } else { "" };

    format!(
        "You write high-school level questions that follow the Turkish national curriculum. \
Write all question content in Turkish.\n\
Respond ONLY with a valid JSON object that has a single key \"questions\" whose value is an \
array of question objects.\n\n\
{format}\n\
{visual}\n\n\
Topic: {topic}\n\
Sub-topic: {sub_topic}\n\
Number of questions: {count}\n",
        topic = request.topic,
        sub_topic = request.sub_topic,
        count = request.count,
    )
}
