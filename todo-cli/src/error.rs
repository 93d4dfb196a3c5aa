use thiserror::Error;

use crate::domain::task::TaskId;

/// Failures a task store can report. `NotFound` is the only one callers
/// are expected to branch on; the rest are fatal for a CLI invocation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no task found with id {0}")]
    NotFound(TaskId),

    #[error("storage failure: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("malformed timestamp {value:?} stored for task {id}")]
    Timestamp { id: TaskId, value: String },
}
