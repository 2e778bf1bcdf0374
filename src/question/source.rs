use async_trait::async_trait;
use thiserror::Error;

use super::models::{QuestionRecord, QuestionRequest};

/// Errors from the upstream question generator.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to the generative API failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("generative API returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("generative API returned no content (block reason: {0})")]
    EmptyResponse(String),
    #[error("generative API returned blank text")]
    EmptyText,
    #[error("failed to parse generated questions: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Source of AI-generated questions.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    async fn generate(&self, request: &QuestionRequest)
        -> Result<Vec<QuestionRecord>, SourceError>;

    /// Names of the models that can serve `generate`.
    async fn list_models(&self) -> Result<Vec<String>, SourceError>;
}
