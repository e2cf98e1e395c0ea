//! Service layer for task creation, status changes, and messaging.

use crate::organization::{
    domain::{Department, DepartmentId, User, UserId},
    ports::{DepartmentFilter, DirectoryError, DirectoryRepository},
};
use crate::task::{
    domain::{
        Task, TaskDomainError, TaskDraft, TaskId, TaskMessage, executor_pool, plan_duplication,
        reassign,
    },
    ports::{
        MessageRepositoryError, TaskFilter, TaskMessageRepository, TaskRepository,
        TaskRepositoryError,
    },
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// Where a new task, or its duplicates, should be placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreationTarget {
    /// One task for one department and assignee.
    Single {
        /// Owning department.
        department_id: Option<DepartmentId>,
        /// Assignee.
        assignee: Option<UserId>,
    },
    /// One task per selected executor drawn from the selected departments.
    Duplicate {
        /// Departments whose members and managers form the executor pool.
        departments: Vec<DepartmentId>,
        /// Executors chosen from the pool.
        executors: Vec<UserId>,
    },
}

/// Request payload for creating one or more tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    creator: UserId,
    draft: TaskDraft,
    target: CreationTarget,
}

impl CreateTaskRequest {
    /// Creates a single-target request.
    #[must_use]
    pub const fn single(
        creator: UserId,
        draft: TaskDraft,
        department_id: Option<DepartmentId>,
        assignee: Option<UserId>,
    ) -> Self {
        Self {
            creator,
            draft,
            target: CreationTarget::Single {
                department_id,
                assignee,
            },
        }
    }

    /// Creates a duplication request.
    #[must_use]
    pub fn duplicate(
        creator: UserId,
        draft: TaskDraft,
        departments: impl IntoIterator<Item = DepartmentId>,
        executors: impl IntoIterator<Item = UserId>,
    ) -> Self {
        Self {
            creator,
            draft,
            target: CreationTarget::Duplicate {
                departments: departments.into_iter().collect(),
                executors: executors.into_iter().collect(),
            },
        }
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn creator(&self) -> UserId {
        self.creator
    }

    /// Returns the placement target.
    #[must_use]
    pub const fn target(&self) -> &CreationTarget {
        &self.target
    }
}

/// Request payload for reassigning a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassignTaskRequest {
    task_id: TaskId,
    actor: UserId,
    new_assignee: UserId,
    title: Option<String>,
}

impl ReassignTaskRequest {
    /// Creates a request that keeps the default reassigned title.
    #[must_use]
    pub const fn new(task_id: TaskId, actor: UserId, new_assignee: UserId) -> Self {
        Self {
            task_id,
            actor,
            new_assignee,
            title: None,
        }
    }

    /// Supplies an explicit title for the new task.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Outcome of a user opening a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewReceipt {
    /// Whether the task's unread marker was cleared.
    pub task_cleared: bool,
    /// Number of messages marked as read.
    pub messages_read: usize,
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation or authorization failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Message repository operation failed.
    #[error(transparent)]
    Messages(#[from] MessageRepositoryError),
    /// Directory lookup failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// The referenced user does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Every operation reaches a domain decision before its first write, so a
/// rejected request leaves persistence untouched.
#[derive(Clone)]
pub struct TaskLifecycleService<R, M, D, C>
where
    R: TaskRepository,
    M: TaskMessageRepository,
    D: DirectoryRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    messages: Arc<M>,
    directory: Arc<D>,
    clock: Arc<C>,
}

impl<R, M, D, C> TaskLifecycleService<R, M, D, C>
where
    R: TaskRepository,
    M: TaskMessageRepository,
    D: DirectoryRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, messages: Arc<M>, directory: Arc<D>, clock: Arc<C>) -> Self {
        Self {
            repository,
            messages,
            directory,
            clock,
        }
    }

    /// Creates one task, or one task per selected executor.
    ///
    /// Duplicates are stored together, so a failed write leaves none of
    /// them behind.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] with the missing fields or
    /// [`TaskDomainError::NoDuplicationTargets`] before anything is stored,
    /// and repository or directory errors when collaborators fail.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Vec<Task>> {
        let CreateTaskRequest {
            creator,
            draft,
            target,
        } = request;

        let tasks = match target {
            CreationTarget::Single {
                department_id,
                assignee,
            } => {
                let (content, assignment) = draft
                    .into_single(department_id, assignee)
                    .inspect_err(|err| warn!(%creator, %err, "task creation rejected"))?;
                vec![Task::new(content, assignment, creator, &*self.clock)]
            }
            CreationTarget::Duplicate {
                departments,
                executors,
            } => {
                let content = draft
                    .into_content()
                    .inspect_err(|err| warn!(%creator, %err, "task duplication rejected"))?;
                let pool = executor_pool(&self.load_departments_with_members(&departments).await?);
                let skipped = executors
                    .iter()
                    .filter(|user_id| !pool.iter().any(|candidate| candidate.user_id == **user_id))
                    .count();
                if skipped > 0 {
                    warn!(%creator, skipped, "executors outside the selected departments skipped");
                }
                let assignments = plan_duplication(&pool, &executors)
                    .inspect_err(|err| warn!(%creator, %err, "task duplication rejected"))?;
                assignments
                    .into_iter()
                    .map(|assignment| Task::new(content.clone(), assignment, creator, &*self.clock))
                    .collect()
            }
        };

        self.repository
            .store_all(&tasks)
            .await
            .inspect_err(|err| error!(%creator, count = tasks.len(), %err, "task creation failed"))?;
        for task in &tasks {
            info!(
                task_id = %task.id(),
                %creator,
                assignee = %task.assigned_to(),
                department_id = %task.department_id(),
                "task created"
            );
        }
        Ok(tasks)
    }

    /// Advances a task to its next status on behalf of `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] for unknown tasks,
    /// [`TaskLifecycleError::Domain`] with the rejection reason, or a
    /// repository error when the update fails.
    pub async fn advance_task(&self, task_id: TaskId, actor: UserId) -> TaskLifecycleResult<Task> {
        let mut task = self.load_task(task_id).await?;
        let change = task
            .advance(actor, &*self.clock)
            .inspect_err(|err| warn!(%task_id, %actor, %err, "status change rejected"))?;
        self.repository.update(&task).await?;
        info!(%task_id, %actor, from = %change.from, to = %change.to, "task status changed");
        Ok(task)
    }

    /// Spawns a linked task for a different assignee.
    ///
    /// The original task is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] or
    /// [`TaskLifecycleError::UserNotFound`] for unknown references,
    /// [`TaskLifecycleError::Domain`] when no reassignment rule applies, or
    /// a collaborator error.
    pub async fn reassign_task(&self, request: ReassignTaskRequest) -> TaskLifecycleResult<Task> {
        let ReassignTaskRequest {
            task_id,
            actor,
            new_assignee,
            title,
        } = request;

        let task = self.load_task(task_id).await?;
        let target = self.load_user(new_assignee).await?;
        let departments = self
            .directory
            .list_departments(&reassignment_scope(&task, &target, actor))
            .await?;

        let reassigned = reassign(
            &task,
            actor,
            &target,
            &departments,
            title.as_deref(),
            &*self.clock,
        )
        .inspect_err(|err| warn!(%task_id, %actor, %new_assignee, %err, "reassignment rejected"))?;
        self.repository.store(&reassigned).await?;
        info!(
            %task_id,
            new_task_id = %reassigned.id(),
            %actor,
            %new_assignee,
            "task reassigned"
        );
        Ok(reassigned)
    }

    /// Changes a task's deadline on behalf of `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when `actor` is not the
    /// creator, plus the not-found and repository errors of
    /// [`Self::advance_task`].
    pub async fn update_deadline(
        &self,
        task_id: TaskId,
        actor: UserId,
        deadline: DateTime<Utc>,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load_task(task_id).await?;
        task.reschedule(actor, deadline, &*self.clock)
            .inspect_err(|err| warn!(%task_id, %actor, %err, "deadline change rejected"))?;
        self.repository.update(&task).await?;
        info!(%task_id, %actor, %deadline, "task deadline changed");
        Ok(task)
    }

    /// Deletes a task after deleting its messages.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] for unknown tasks or a
    /// collaborator error. A failure after the messages are gone leaves the
    /// task in place without its messages.
    pub async fn delete_task(&self, task_id: TaskId) -> TaskLifecycleResult<()> {
        self.load_task(task_id).await?;
        self.messages.delete_for_task(task_id).await?;
        self.repository.delete(task_id).await?;
        info!(%task_id, "task deleted");
        Ok(())
    }

    /// Records that `viewer` opened a task and its messages.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when `viewer` is neither the
    /// creator nor the assignee, [`TaskLifecycleError::TaskNotFound`] for
    /// unknown tasks, or a collaborator error.
    pub async fn mark_viewed(&self, task_id: TaskId, viewer: UserId) -> TaskLifecycleResult<ViewReceipt> {
        let mut task = self.load_task(task_id).await?;
        if !task.involves(viewer) {
            warn!(%task_id, %viewer, "view by non-participant rejected");
            return Err(TaskDomainError::ViewerNotAParticipant(task_id).into());
        }
        let task_cleared = task.mark_viewed(viewer);
        if task_cleared {
            self.repository.update(&task).await?;
        }
        let messages_read = self.messages.mark_read(task_id, viewer).await?;
        Ok(ViewReceipt {
            task_cleared,
            messages_read,
        })
    }

    /// Posts a message on a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when `sender` is neither the
    /// creator nor the assignee, or the content is blank.
    pub async fn post_message(
        &self,
        task_id: TaskId,
        sender: UserId,
        content: impl Into<String> + Send,
    ) -> TaskLifecycleResult<TaskMessage> {
        let task = self.load_task(task_id).await?;
        if !task.involves(sender) {
            warn!(%task_id, %sender, "message from non-participant rejected");
            return Err(TaskDomainError::NotAParticipant(task_id).into());
        }
        let message = TaskMessage::new(task_id, sender, content, &*self.clock)?;
        self.messages.append(&message).await?;
        Ok(message)
    }

    /// Lists a task's messages, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Messages`] when the lookup fails.
    pub async fn list_messages(&self, task_id: TaskId) -> TaskLifecycleResult<Vec<TaskMessage>> {
        Ok(self.messages.list_for_task(task_id).await?)
    }

    /// Lists tasks matching the filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn list_tasks(&self, filter: &TaskFilter) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.list(filter).await?)
    }

    /// Retrieves a task by identifier.
    ///
    /// Returns `Ok(None)` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn find_task(&self, task_id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        Ok(self.repository.find_by_id(task_id).await?)
    }

    async fn load_task(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::TaskNotFound(task_id))
    }

    async fn load_user(&self, user_id: UserId) -> TaskLifecycleResult<User> {
        self.directory
            .find_user(user_id)
            .await?
            .ok_or(TaskLifecycleError::UserNotFound(user_id))
    }

    async fn load_departments_with_members(
        &self,
        ids: &[DepartmentId],
    ) -> TaskLifecycleResult<Vec<(Department, Vec<User>)>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let departments = self
            .directory
            .list_departments(&DepartmentFilter::all().with_ids(ids.iter().copied()))
            .await?;
        // The directory sorts by name; the pool must follow selection order.
        let mut loaded = Vec::with_capacity(departments.len());
        for id in ids {
            let Some(department) = departments.iter().find(|department| department.id == *id) else {
                continue;
            };
            let members = self.directory.list_users_by_department(department.id).await?;
            loaded.push((department.clone(), members));
        }
        Ok(loaded)
    }
}

/// Departments any reassignment rule could consult: the task's and the
/// target's departments, plus every department the actor manages or
/// created.
fn reassignment_scope(task: &Task, target: &User, actor: UserId) -> DepartmentFilter {
    DepartmentFilter::all()
        .with_ids(std::iter::once(task.department_id()).chain(target.department_id))
        .involving(actor)
}
