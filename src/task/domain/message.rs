//! Messages exchanged on a task.

use super::{MessageId, TaskDomainError, TaskId};
use crate::organization::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Content of the system message posted when a task becomes overdue.
pub const OVERDUE_NOTICE: &str = "Поручение просрочено";

/// A message owned by a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskMessage {
    id: MessageId,
    task_id: TaskId,
    sender_id: UserId,
    content: String,
    created_at: DateTime<Utc>,
    is_new: bool,
    is_system: bool,
}

/// Parameter object for reconstructing a persisted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedMessageData {
    /// Message identifier.
    pub id: MessageId,
    /// Owning task.
    pub task_id: TaskId,
    /// Sending user.
    pub sender_id: UserId,
    /// Message text.
    pub content: String,
    /// Posting timestamp.
    pub created_at: DateTime<Utc>,
    /// Unread marker.
    pub is_new: bool,
    /// Whether the message was generated automatically.
    pub is_system: bool,
}

impl TaskMessage {
    /// Creates a message written by a user.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyMessage`] when `content` is blank.
    pub fn new(
        task_id: TaskId,
        sender_id: UserId,
        content: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let text = content.into();
        if text.trim().is_empty() {
            return Err(TaskDomainError::EmptyMessage);
        }
        Ok(Self::build(task_id, sender_id, text, false, clock))
    }

    /// Creates an automated notice attributed to `sender_id`.
    #[must_use]
    pub fn system(
        task_id: TaskId,
        sender_id: UserId,
        content: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self::build(task_id, sender_id, content.into(), true, clock)
    }

    fn build(
        task_id: TaskId,
        sender_id: UserId,
        content: String,
        is_system: bool,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: MessageId::new(),
            task_id,
            sender_id,
            content,
            created_at: clock.utc(),
            is_new: true,
            is_system,
        }
    }

    /// Reconstructs a message from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedMessageData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            sender_id: data.sender_id,
            content: data.content,
            created_at: data.created_at,
            is_new: data.is_new,
            is_system: data.is_system,
        }
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the owning task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the sender.
    #[must_use]
    pub const fn sender_id(&self) -> UserId {
        self.sender_id
    }

    /// Returns the message text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the posting timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns `true` until someone other than the sender reads it.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.is_new
    }

    /// Returns `true` for automated notices.
    #[must_use]
    pub const fn is_system(&self) -> bool {
        self.is_system
    }

    /// Marks the message read for `reader`.
    ///
    /// A user's own messages stay unread for them; system notices are
    /// cleared by whoever reads them.
    ///
    /// Returns `true` when the unread marker was cleared.
    pub fn mark_read_by(&mut self, reader: UserId) -> bool {
        if self.is_new && (self.is_system || self.sender_id != reader) {
            self.is_new = false;
            return true;
        }
        false
    }
}
