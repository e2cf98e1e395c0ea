//! Repository port for task persistence and filtered listing.

use crate::organization::domain::{DepartmentId, UserId};
use crate::task::domain::{Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Row filter for task listings.
///
/// Both restrictions must hold when both are set. The participant clause is
/// itself an OR: `created_by = user OR assigned_to = user`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    department_ids: Option<Vec<DepartmentId>>,
    participant: Option<UserId>,
}

impl TaskFilter {
    /// Creates a filter matching every task.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts to tasks owned by any of the departments.
    #[must_use]
    pub fn in_departments(mut self, ids: impl IntoIterator<Item = DepartmentId>) -> Self {
        self.department_ids = Some(ids.into_iter().collect());
        self
    }

    /// Restricts to tasks the user created or is assigned.
    #[must_use]
    pub const fn involving(mut self, user_id: UserId) -> Self {
        self.participant = Some(user_id);
        self
    }

    /// Returns the department restriction, if any.
    #[must_use]
    pub fn department_ids(&self) -> Option<&[DepartmentId]> {
        self.department_ids.as_deref()
    }

    /// Returns the participant restriction, if any.
    #[must_use]
    pub const fn participant(&self) -> Option<UserId> {
        self.participant
    }

    /// Evaluates the filter against a task.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        let in_department = self
            .department_ids
            .as_ref()
            .is_none_or(|ids| ids.contains(&task.department_id()));
        let involved = self.participant.is_none_or(|user_id| task.involves(user_id));
        in_department && involved
    }
}

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Stores several new tasks as one unit: either all are stored or none.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] naming the first
    /// task whose ID already exists; nothing is stored in that case.
    async fn store_all(&self, tasks: &[Task]) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task (status, history, deadline,
    /// unread marker, timestamps).
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Deletes a task. Its messages must already be gone.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns the tasks matching `filter`, newest first.
    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
