use anyhow::Result;
use uuid::Uuid;

use crate::model::task::{Task, TaskDraft};

/// Durable task storage. Implementations own identifier assignment and
/// serialise their own writes.
pub trait TaskRepository {
    /// Stores a classified draft under a fresh id.
    fn create(&self, draft: TaskDraft) -> Result<Task>;
    fn get(&self, id: &Uuid) -> Result<Task>;
    fn list(&self) -> Result<Vec<Task>>;
    fn update(&self, task: &Task) -> Result<()>;
    fn delete(&self, id: &Uuid) -> Result<()>;
}
