use crate::domain::task::{Task, TaskId};
use crate::error::StoreError;

pub mod sqlite;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Sole mediator between `Task` values and the persistent table.
///
/// Listing operations hide soft-deleted rows; `get_by_id` (and therefore
/// `toggle`) still reaches them. That asymmetry is deliberate and matches
/// the CLI's delete semantics.
pub trait TaskRepository {
    fn add(&mut self, title: &str) -> Result<Task>;
    fn get_by_id(&self, id: TaskId) -> Result<Task>;
    fn show_all(&self) -> Result<Vec<Task>>;
    fn show_pending(&self) -> Result<Vec<Task>>;
    /// Flip completion: pending tasks get `completed_at = now`, completed
    /// ones go back to pending. Returns the post-toggle task.
    fn toggle(&mut self, id: TaskId) -> Result<Task>;
    /// Hide the row from listings without removing it. Returns the task as
    /// it was before the flag was set.
    fn soft_delete(&mut self, id: TaskId) -> Result<Task>;
    /// Remove the row permanently. Returns the pre-deletion snapshot.
    fn delete(&mut self, id: TaskId) -> Result<Task>;
}
