#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use quiz_doc_server::question::{QuestionRecord, QuestionRequest, QuestionSource, SourceError};
use quiz_doc_server::{AppConfig, AppState};
use std::path::Path;
use std::sync::Arc;

/// Minimal square figure that renders without system fonts.
pub const SQUARE_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="40" viewBox="0 0 40 40"><rect x="5" y="5" width="30" height="30" fill="none" stroke="black"/></svg>"#;

/// In-memory question source with canned answers.
pub struct MockQuestionSource {
    questions: Option<Vec<QuestionRecord>>,
    models: Option<Vec<String>>,
    requests: Mutex<Vec<QuestionRequest>>,
}

impl MockQuestionSource {
    pub fn with_questions(questions: Vec<QuestionRecord>) -> Self {
        Self {
            questions: Some(questions),
            models: Some(vec!["models/gemini-pro-latest".to_string()]),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails as if the upstream API was unavailable.
    pub fn failing() -> Self {
        Self {
            questions: None,
            models: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<QuestionRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl QuestionSource for MockQuestionSource {
    async fn generate(&self, request: &QuestionRequest) -> Result<Vec<QuestionRecord>, SourceError> {
        self.requests.lock().push(request.clone());
        self.questions.clone().ok_or(SourceError::Status {
            status: 503,
            body: "service unavailable".to_string(),
        })
    }

    async fn list_models(&self) -> Result<Vec<String>, SourceError> {
        self.models.clone().ok_or(SourceError::EmptyText)
    }
}

pub fn classic_question(text: &str, answer: &str) -> QuestionRecord {
    QuestionRecord {
        question: text.to_string(),
        answer: Some(answer.to_string()),
        solution_steps: vec!["Adım 1".to_string(), "Adım 2".to_string()],
        ..Default::default()
    }
}

pub fn visual_question(text: &str, answer: &str) -> QuestionRecord {
    QuestionRecord {
        svg_image: Some(SQUARE_SVG.to_string()),
        ..classic_question(text, answer)
    }
}

/// Application state rooted in `base` and backed by `source`.
pub fn test_state(base: &Path, source: Arc<MockQuestionSource>) -> AppState {
    let config = AppConfig::local(base, "test-key");
    AppState::with_source(config, source).expect("Failed to create AppState")
}
