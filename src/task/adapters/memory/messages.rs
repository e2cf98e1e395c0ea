//! In-memory message repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::organization::domain::UserId;
use crate::task::{
    domain::{TaskId, TaskMessage},
    ports::{MessageRepositoryError, MessageRepositoryResult, TaskMessageRepository},
};

/// Thread-safe in-memory message repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMessageRepository {
    state: Arc<RwLock<HashMap<TaskId, Vec<TaskMessage>>>>,
}

impl InMemoryMessageRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl ToString) -> MessageRepositoryError {
    MessageRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskMessageRepository for InMemoryMessageRepository {
    async fn append(&self, message: &TaskMessage) -> MessageRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let duplicate = state
            .values()
            .flatten()
            .any(|existing| existing.id() == message.id());
        if duplicate {
            return Err(MessageRepositoryError::DuplicateMessage(message.id()));
        }
        state
            .entry(message.task_id())
            .or_default()
            .push(message.clone());
        Ok(())
    }

    async fn list_for_task(&self, task_id: TaskId) -> MessageRepositoryResult<Vec<TaskMessage>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut messages = state.get(&task_id).cloned().unwrap_or_default();
        messages.sort_by_key(TaskMessage::created_at);
        Ok(messages)
    }

    async fn mark_read(&self, task_id: TaskId, reader: UserId) -> MessageRepositoryResult<usize> {
        let mut state = self.state.write().map_err(poisoned)?;
        let changed = state
            .get_mut(&task_id)
            .map(|messages| {
                messages
                    .iter_mut()
                    .map(|message| message.mark_read_by(reader))
                    .filter(|changed| *changed)
                    .count()
            })
            .unwrap_or_default();
        Ok(changed)
    }

    async fn delete_for_task(&self, task_id: TaskId) -> MessageRepositoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.remove(&task_id);
        Ok(())
    }
}
