//! Repository port for messages owned by tasks.

use crate::organization::domain::UserId;
use crate::task::domain::{MessageId, TaskId, TaskMessage};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for message repository operations.
pub type MessageRepositoryResult<T> = Result<T, MessageRepositoryError>;

/// Message persistence contract.
#[async_trait]
pub trait TaskMessageRepository: Send + Sync {
    /// Appends a message to its task.
    ///
    /// # Errors
    ///
    /// Returns [`MessageRepositoryError::DuplicateMessage`] when the message
    /// ID already exists.
    async fn append(&self, message: &TaskMessage) -> MessageRepositoryResult<()>;

    /// Returns the messages of a task, oldest first.
    async fn list_for_task(&self, task_id: TaskId) -> MessageRepositoryResult<Vec<TaskMessage>>;

    /// Clears the unread marker on every message of the task that `reader`
    /// did not send, and on every system notice.
    ///
    /// Returns the number of messages changed.
    async fn mark_read(&self, task_id: TaskId, reader: UserId) -> MessageRepositoryResult<usize>;

    /// Deletes every message of a task.
    async fn delete_for_task(&self, task_id: TaskId) -> MessageRepositoryResult<()>;
}

/// Errors returned by message repository implementations.
#[derive(Debug, Clone, Error)]
pub enum MessageRepositoryError {
    /// A message with the same identifier already exists.
    #[error("duplicate message identifier: {0}")]
    DuplicateMessage(MessageId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl MessageRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
