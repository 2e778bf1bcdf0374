//! Question generation: request/record models, validation, and the AI source.

pub mod gemini;
pub mod handlers;
pub mod models;
pub mod prompt;
pub mod source;
pub mod validation;

pub use gemini::GeminiClient;
pub use models::{GenerateRequest, QuestionRecord, QuestionRequest, QuestionType};
pub use source::{QuestionSource, SourceError};
pub use validation::Validator;
