use thiserror::Error;
use uuid::Uuid;

/// Conditions the engine reports to its caller.
///
/// A missing date is not one of them: extraction failure is a normal
/// outcome and shows up as an undated scheduled task.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("task {0} not found")]
    NotFound(Uuid),
}

impl TaskError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        TaskError::InvalidInput(msg.into())
    }
}
