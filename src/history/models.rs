use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::document::GeneratedFiles;
use crate::question::QuestionRecord;

/// One past generation run and the files it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HistoryEntry {
    #[schema(example = "1a2b3c4d")]
    pub id: String,
    #[schema(example = "Matematik - Üçgenler")]
    pub topic: String,
    pub count: usize,
    pub files: GeneratedFiles,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub questions: Vec<QuestionRecord>,
}

impl HistoryEntry {
    pub fn new(id: String, topic: String, files: GeneratedFiles, questions: Vec<QuestionRecord>) -> Self {
        Self {
            id,
            topic,
            count: questions.len(),
            files,
            timestamp: Utc::now(),
            questions,
        }
    }
}

/// Body of `DELETE /delete-item/{id}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

/// Outcome of [`HistoryStore::delete`](super::HistoryStore::delete).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted { removed_files: usize },
    NotFound,
}
