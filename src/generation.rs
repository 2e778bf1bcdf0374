//! The synchronous half of a generation request: documents, then history.

use log::error;
use thiserror::Error;
use uuid::Uuid;

use crate::document::{AssemblyError, DocumentAssembler};
use crate::history::{HistoryEntry, HistoryError, HistoryStore};
use crate::question::QuestionRecord;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Short identifier that namespaces the files of one run.
pub fn new_run_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

/// Assemble the documents for `questions` and record the run in history.
///
/// If the history entry cannot be written the run's files are removed again so
/// nothing on disk is left unreachable.
pub fn record_generation(
    assembler: &DocumentAssembler,
    history: &HistoryStore,
    questions: Vec<QuestionRecord>,
    label: String,
    run_id: String,
) -> Result<HistoryEntry, GenerationError> {
    let files = assembler.assemble(&questions, &label, &run_id)?;
    let entry = HistoryEntry::new(run_id, label, files, questions);

    if let Err(e) = history.append(entry.clone()) {
        error!("Failed to record run {} in history: {}", entry.id, e);
        assembler.discard(&entry.files);
        return Err(e.into());
    }

    Ok(entry)
}
