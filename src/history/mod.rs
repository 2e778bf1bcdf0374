pub mod handlers;
pub mod models;
pub mod store;

pub use models::{DeleteOutcome, DeleteResponse, HistoryEntry};
pub use store::{HistoryError, HistoryStore};
