use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// One AI-generated question as it is stored in history and rendered into documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QuestionRecord {
    #[schema(example = "Bir üçgenin iç açıları toplamı kaç derecedir?")]
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default)]
    pub solution_steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub svg_image: Option<String>,
}

impl QuestionRecord {
    /// Options, when present and non-empty.
    pub fn choices(&self) -> Option<&[String]> {
        self.options.as_deref().filter(|options| !options.is_empty())
    }

    /// The authoritative answer text.
    ///
    /// With options, this is the option at `correct_answer_index`; an index that is
    /// missing or out of range falls back to `answer`, then to an empty string.
    pub fn correct_answer(&self) -> &str {
        if let Some(options) = self.choices() {
            if let Some(text) = self.correct_answer_index.and_then(|idx| options.get(idx)) {
                return text;
            }
        }
        self.answer.as_deref().unwrap_or("")
    }

    /// SVG markup, when present and not blank.
    pub fn svg_markup(&self) -> Option<&str> {
        self.svg_image
            .as_deref()
            .filter(|markup| !markup.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    #[default]
    Classic,
}

/// Body of `POST /generate-documents`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct GenerateRequest {
    #[schema(example = "Matematik")]
    pub topic: String,
    #[schema(example = "Üçgenler")]
    pub sub_topic: String,
    /// Number of questions; the browser form sends it as a string.
    #[serde(deserialize_with = "deserialize_count")]
    #[schema(value_type = u32, example = 5)]
    pub count: u32,
    #[serde(default)]
    pub is_visual: bool,
    #[serde(default)]
    pub question_type: QuestionType,
}

impl GenerateRequest {
    /// Label used for document titles and history entries.
    pub fn label(&self) -> String {
        format!("{} - {}", self.topic.trim(), self.sub_topic.trim())
    }

    pub fn to_source_request(&self) -> QuestionRequest {
        QuestionRequest {
            topic: self.topic.trim().to_string(),
            sub_topic: self.sub_topic.trim().to_string(),
            count: self.count,
            is_visual: self.is_visual,
            question_type: self.question_type,
        }
    }
}

/// What the question source is asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionRequest {
    pub topic: String,
    pub sub_topic: String,
    pub count: u32,
    pub is_visual: bool,
    pub question_type: QuestionType,
}

fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u32),
        Text(String),
    }

    match Count::deserialize(deserializer)? {
        Count::Number(n) => Ok(n),
        Count::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("count '{text}' is not a number"))),
    }
}
