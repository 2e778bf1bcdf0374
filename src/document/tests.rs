use std::fs;
use std::path::Path;

use super::naming::ANSWER_PREFIX;
use super::{AssemblyError, DocumentAssembler, FileSlot, GeneratedFiles};
use crate::question::QuestionRecord;

const FIGURE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="120" height="60" viewBox="0 0 120 60"><line x1="0" y1="60" x2="120" y2="0" stroke="black" stroke-width="2"/></svg>"#;

/// Text of every paragraph plus the number of embedded drawings.
struct DocText {
    lines: Vec<String>,
    drawings: usize,
}

impl DocText {
    fn read(path: &Path) -> Self {
        let bytes = fs::read(path).unwrap();
        let docx = docx_rs::read_docx(&bytes).unwrap();

        let mut lines = Vec::new();
        let mut drawings = 0;
        for child in &docx.document.children {
            if let docx_rs::DocumentChild::Paragraph(para) = child {
                let mut line = String::new();
                for paragraph_child in &para.children {
                    if let docx_rs::ParagraphChild::Run(run) = paragraph_child {
                        for run_child in &run.children {
                            match run_child {
                                docx_rs::RunChild::Text(t) => line.push_str(&t.text),
                                docx_rs::RunChild::Drawing(_) => drawings += 1,
                                _ => {}
                            }
                        }
                    }
                }
                lines.push(line);
            }
        }

        Self { lines, drawings }
    }

    fn sections(&self) -> usize {
        self.lines
            .iter()
            .filter(|line| {
                line.strip_prefix("Soru ")
                    .map_or(false, |n| n.parse::<usize>().is_ok())
            })
            .count()
    }

    fn answers(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|line| line.starts_with(ANSWER_PREFIX))
            .map(String::as_str)
            .collect()
    }

    fn contains(&self, text: &str) -> bool {
        self.lines.iter().any(|line| line == text)
    }
}

fn classic(question: &str, answer: &str) -> QuestionRecord {
    QuestionRecord {
        question: question.to_string(),
        answer: Some(answer.to_string()),
        solution_steps: vec!["Adım 1".to_string(), "Adım 2".to_string()],
        ..Default::default()
    }
}

fn multiple_choice() -> QuestionRecord {
    QuestionRecord {
        question: "Hangisi asal sayıdır?".to_string(),
        options: Some(vec!["4".into(), "6".into(), "7".into(), "9".into()]),
        correct_answer_index: Some(2),
        solution_steps: vec!["7 yalnızca 1 ve kendisine bölünür.".to_string()],
        ..Default::default()
    }
}

fn with_figure(mut record: QuestionRecord, svg: &str) -> QuestionRecord {
    record.svg_image = Some(svg.to_string());
    record
}

fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_text_only_batch_produces_two_documents_with_n_sections() {
    let dir = tempfile::tempdir().unwrap();
    let assembler = DocumentAssembler::new(dir.path());
    let questions = vec![classic("1+1?", "2"), classic("2+2?", "4"), classic("3+3?", "6")];

    let files = assembler
        .assemble(&questions, "Matematik - Toplama", "run00001")
        .unwrap();

    assert_eq!(files.questions_word, "sorular_run00001.docx");
    assert_eq!(files.solutions_word, "cozumler_run00001.docx");
    assert!(files.svg_files.is_empty());
    assert_eq!(
        dir_entries(dir.path()),
        vec!["cozumler_run00001.docx", "sorular_run00001.docx"]
    );

    let questions_doc = DocText::read(&dir.path().join(&files.questions_word));
    let solutions_doc = DocText::read(&dir.path().join(&files.solutions_word));
    assert_eq!(questions_doc.sections(), 3);
    assert_eq!(solutions_doc.sections(), 3);
    assert!(questions_doc.contains("Matematik - Toplama - Sorular"));
    assert!(solutions_doc.contains("Matematik - Toplama - Çözümler"));
    assert_eq!(questions_doc.drawings, 0);
}

#[test]
fn test_questions_document_has_no_solutions() {
    let dir = tempfile::tempdir().unwrap();
    let files = DocumentAssembler::new(dir.path())
        .assemble(&[classic("1+1?", "2")], "Matematik", "run00002")
        .unwrap();

    let questions_doc = DocText::read(&dir.path().join(&files.questions_word));
    assert!(questions_doc.answers().is_empty());
    assert!(!questions_doc.contains("Adım 1"));

    let solutions_doc = DocText::read(&dir.path().join(&files.solutions_word));
    assert!(solutions_doc.contains("Çözüm Adımları:"));
    assert!(solutions_doc.contains("Adım 1"));
    assert!(solutions_doc.contains("Adım 2"));
}

#[test]
fn test_multiple_choice_answer_names_option_at_index() {
    let dir = tempfile::tempdir().unwrap();
    let files = DocumentAssembler::new(dir.path())
        .assemble(&[multiple_choice()], "Matematik - Sayılar", "run00003")
        .unwrap();

    let solutions_doc = DocText::read(&dir.path().join(&files.solutions_word));
    assert_eq!(solutions_doc.answers(), vec!["Doğru Cevap: 7"]);

    let questions_doc = DocText::read(&dir.path().join(&files.questions_word));
    for line in ["A) 4", "B) 6", "C) 7", "D) 9"] {
        assert!(questions_doc.contains(line), "missing option line {line}");
        assert!(solutions_doc.contains(line), "missing option line {line}");
    }
}

#[test]
fn test_classic_answer_is_printed() {
    let dir = tempfile::tempdir().unwrap();
    let files = DocumentAssembler::new(dir.path())
        .assemble(&[classic("6 x 7 = ?", "42")], "Matematik", "run00004")
        .unwrap();

    let solutions_doc = DocText::read(&dir.path().join(&files.solutions_word));
    let answers = solutions_doc.answers();
    assert_eq!(answers.len(), 1);
    assert!(answers[0].contains("42"));
}

#[test]
fn test_valid_figure_is_embedded_and_saved() {
    let dir = tempfile::tempdir().unwrap();
    let questions = vec![with_figure(classic("Eğim nedir?", "1/2"), FIGURE)];

    let files = DocumentAssembler::new(dir.path())
        .assemble(&questions, "Geometri", "run00005")
        .unwrap();

    assert_eq!(files.svg_files, vec!["gorsel_run00005_1.svg".to_string()]);
    assert_eq!(
        fs::read_to_string(dir.path().join("gorsel_run00005_1.svg")).unwrap(),
        FIGURE
    );
    assert_eq!(DocText::read(&dir.path().join(&files.questions_word)).drawings, 1);
    assert_eq!(DocText::read(&dir.path().join(&files.solutions_word)).drawings, 1);
    assert_eq!(dir_entries(dir.path()).len(), 3);
}

#[test]
fn test_malformed_figure_is_skipped_without_leftovers() {
    let dir = tempfile::tempdir().unwrap();
    let questions = vec![
        classic("Birinci", "1"),
        with_figure(classic("İkinci", "2"), "<svg><circle r="),
        classic("Üçüncü", "3"),
    ];

    let files = DocumentAssembler::new(dir.path())
        .assemble(&questions, "Geometri", "run00006")
        .unwrap();

    assert!(files.svg_files.is_empty());
    assert_eq!(
        dir_entries(dir.path()),
        vec!["cozumler_run00006.docx", "sorular_run00006.docx"]
    );
    let solutions_doc = DocText::read(&dir.path().join(&files.solutions_word));
    assert_eq!(solutions_doc.sections(), 3);
    assert_eq!(solutions_doc.drawings, 0);
    assert_eq!(solutions_doc.answers().len(), 3);
}

#[test]
fn test_figure_names_use_question_position() {
    let dir = tempfile::tempdir().unwrap();
    let questions = vec![
        with_figure(classic("Birinci", "1"), FIGURE),
        classic("İkinci", "2"),
        with_figure(classic("Üçüncü", "3"), FIGURE),
    ];

    let files = DocumentAssembler::new(dir.path())
        .assemble(&questions, "Geometri", "run00007")
        .unwrap();

    assert_eq!(
        files.svg_files,
        vec![
            "gorsel_run00007_1.svg".to_string(),
            "gorsel_run00007_3.svg".to_string()
        ]
    );
    assert_eq!(DocText::read(&dir.path().join(&files.questions_word)).drawings, 2);
}

#[test]
fn test_empty_batch_still_writes_both_documents() {
    let dir = tempfile::tempdir().unwrap();
    let files = DocumentAssembler::new(dir.path())
        .assemble(&[], "Boş", "run00008")
        .unwrap();

    assert_eq!(DocText::read(&dir.path().join(&files.questions_word)).sections(), 0);
    assert_eq!(DocText::read(&dir.path().join(&files.solutions_word)).sections(), 0);
}

#[test]
fn test_output_dir_is_created_on_demand() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("generated_files");

    let files = DocumentAssembler::new(&nested)
        .assemble(&[classic("1+1?", "2")], "Matematik", "run00009")
        .unwrap();

    assert!(nested.join(files.questions_word).is_file());
}

#[test]
fn test_unusable_output_dir_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not_a_dir");
    fs::write(&blocker, b"file").unwrap();

    let result = DocumentAssembler::new(&blocker).assemble(&[classic("1+1?", "2")], "Matematik", "run00010");
    assert!(matches!(result, Err(AssemblyError::OutputDir { .. })));
}

#[test]
fn test_document_write_failure_removes_run_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("cozumler_run00011.docx")).unwrap();
    let questions = vec![with_figure(classic("Eğim nedir?", "1/2"), FIGURE)];

    let result = DocumentAssembler::new(dir.path()).assemble(&questions, "Geometri", "run00011");

    match result {
        Err(AssemblyError::Persist { file, .. }) => assert_eq!(file, "cozumler_run00011.docx"),
        other => panic!("expected a persist failure, got {:?}", other),
    }
    assert_eq!(dir_entries(dir.path()), vec!["cozumler_run00011.docx"]);
    assert!(dir.path().join("cozumler_run00011.docx").is_dir());
}

#[test]
fn test_run_id_must_be_a_plain_name() {
    let dir = tempfile::tempdir().unwrap();
    let result = DocumentAssembler::new(dir.path()).assemble(&[], "Matematik", "../escape");

    assert!(matches!(result, Err(AssemblyError::InvalidRunId(_))));
    assert!(dir_entries(dir.path()).is_empty());
}

#[test]
fn test_generated_files_slots_cover_every_file() {
    let files = GeneratedFiles {
        questions_word: "sorular_x.docx".to_string(),
        solutions_word: "cozumler_x.docx".to_string(),
        svg_files: vec!["gorsel_x_1.svg".to_string(), "gorsel_x_2.svg".to_string()],
    };

    let slots = files.slots();
    assert_eq!(slots[0], FileSlot::Single("sorular_x.docx"));
    assert!(matches!(slots[2], FileSlot::Many(list) if list.len() == 2));
    assert_eq!(
        files.file_names(),
        vec!["sorular_x.docx", "cozumler_x.docx", "gorsel_x_1.svg", "gorsel_x_2.svg"]
    );
}

#[test]
fn test_generated_files_wire_format() {
    let files: GeneratedFiles = serde_json::from_value(serde_json::json!({
        "questions_word": "sorular_a.docx",
        "solutions_word": "cozumler_a.docx"
    }))
    .unwrap();
    assert!(files.svg_files.is_empty());

    let value = serde_json::to_value(&files).unwrap();
    assert_eq!(value["svg_files"], serde_json::json!([]));
}
