//! Task aggregate root and its content, assignment, and history types.

use super::{
    Advance, MissingFields, Priority, ProtocolFlag, TaskDomainError, TaskField, TaskId,
    TaskStatus, decide_advance,
};
use crate::organization::domain::{DepartmentId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Descriptive content shared by a task and the tasks duplicated or
/// reassigned from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskContent {
    title: String,
    description: String,
    priority: Priority,
    protocol: ProtocolFlag,
    deadline: DateTime<Utc>,
}

impl TaskContent {
    /// Creates content with default priority and protocol flag.
    ///
    /// Stored descriptions may be empty; creation-time checks live in
    /// [`super::TaskDraft`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::MissingFields`] when the title is empty
    /// after trimming.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        deadline: DateTime<Utc>,
    ) -> Result<Self, TaskDomainError> {
        let title_value = title.into();
        let trimmed_title = title_value.trim();
        if trimmed_title.is_empty() {
            return Err(MissingFields::of(TaskField::Title).into());
        }
        Ok(Self {
            title: trimmed_title.to_owned(),
            description: description.into(),
            priority: Priority::default(),
            protocol: ProtocolFlag::default(),
            deadline,
        })
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the protocol flag.
    #[must_use]
    pub const fn with_protocol(mut self, protocol: ProtocolFlag) -> Self {
        self.protocol = protocol;
        self
    }

    /// Replaces the title, keeping the current one when `title` is blank.
    #[must_use]
    pub fn retitled(mut self, title: &str) -> Self {
        let trimmed = title.trim();
        if !trimmed.is_empty() {
            trimmed.clone_into(&mut self.title);
        }
        self
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the protocol flag.
    #[must_use]
    pub const fn protocol(&self) -> ProtocolFlag {
        self.protocol
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }
}

/// Department and assignee a task is placed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    /// Owning department.
    pub department_id: DepartmentId,
    /// User responsible for the work.
    pub assignee: UserId,
}

impl Assignment {
    /// Creates an assignment.
    #[must_use]
    pub const fn new(department_id: DepartmentId, assignee: UserId) -> Self {
        Self {
            department_id,
            assignee,
        }
    }
}

/// Who caused a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionActor {
    /// The task's assignee.
    Assignee,
    /// The task's creator.
    Creator,
    /// The overdue sweep.
    Sweep,
}

/// One applied status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    /// Status before the change.
    pub from: TaskStatus,
    /// Status after the change.
    pub to: TaskStatus,
    /// Role that caused the change.
    pub actor: TransitionActor,
    /// Acting user, absent for the sweep.
    pub actor_id: Option<UserId>,
    /// When the change was applied.
    pub at: DateTime<Utc>,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    parent_id: Option<TaskId>,
    content: TaskContent,
    department_id: DepartmentId,
    assigned_to: UserId,
    created_by: UserId,
    status: TaskStatus,
    is_new: bool,
    history: Vec<StatusChange>,
    overdue_waiver: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Task this one was reassigned from.
    pub parent_id: Option<TaskId>,
    /// Persisted content.
    pub content: TaskContent,
    /// Persisted department and assignee.
    pub assignment: Assignment,
    /// Persisted creator.
    pub created_by: UserId,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted unread marker.
    pub is_new: bool,
    /// Persisted status history.
    pub history: Vec<StatusChange>,
    /// Deadline the task was last reopened against, if any.
    pub overdue_waiver: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new root task in the `new` status.
    #[must_use]
    pub fn new(
        content: TaskContent,
        assignment: Assignment,
        created_by: UserId,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            parent_id: None,
            content,
            department_id: assignment.department_id,
            assigned_to: assignment.assignee,
            created_by,
            status: TaskStatus::New,
            is_new: true,
            history: Vec::new(),
            overdue_waiver: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Creates a new task linked to `parent`, leaving `parent` untouched.
    #[must_use]
    pub fn new_child(
        parent: &Self,
        content: TaskContent,
        assignment: Assignment,
        created_by: UserId,
        clock: &impl Clock,
    ) -> Self {
        let mut child = Self::new(content, assignment, created_by, clock);
        child.parent_id = Some(parent.id);
        child
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            parent_id: data.parent_id,
            content: data.content,
            department_id: data.assignment.department_id,
            assigned_to: data.assignment.assignee,
            created_by: data.created_by,
            status: data.status,
            is_new: data.is_new,
            history: data.history,
            overdue_waiver: data.overdue_waiver,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task this one was reassigned from.
    #[must_use]
    pub const fn parent_id(&self) -> Option<TaskId> {
        self.parent_id
    }

    /// Returns the task content.
    #[must_use]
    pub const fn content(&self) -> &TaskContent {
        &self.content
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.content.title()
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.content.description()
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn deadline(&self) -> DateTime<Utc> {
        self.content.deadline
    }

    /// Returns the owning department.
    #[must_use]
    pub const fn department_id(&self) -> DepartmentId {
        self.department_id
    }

    /// Returns the assignee.
    #[must_use]
    pub const fn assigned_to(&self) -> UserId {
        self.assigned_to
    }

    /// Returns the creator.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the department and assignee.
    #[must_use]
    pub const fn assignment(&self) -> Assignment {
        Assignment::new(self.department_id, self.assigned_to)
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns `true` while the assignee has not opened the task.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.is_new
    }

    /// Returns every applied status change, oldest first.
    #[must_use]
    pub fn history(&self) -> &[StatusChange] {
        &self.history
    }

    /// Returns the deadline the creator last reopened this task against.
    #[must_use]
    pub const fn overdue_waiver(&self) -> Option<DateTime<Utc>> {
        self.overdue_waiver
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when `user_id` is the assignee.
    #[must_use]
    pub fn is_assignee(&self, user_id: UserId) -> bool {
        self.assigned_to == user_id
    }

    /// Returns `true` when `user_id` is the creator.
    #[must_use]
    pub fn is_creator(&self, user_id: UserId) -> bool {
        self.created_by == user_id
    }

    /// Returns `true` when `user_id` created or is assigned the task.
    #[must_use]
    pub fn involves(&self, user_id: UserId) -> bool {
        self.is_assignee(user_id) || self.is_creator(user_id)
    }

    /// Advances the task to the next status on behalf of `actor`.
    ///
    /// The task is left unchanged when the advance is rejected.
    ///
    /// # Errors
    ///
    /// Returns the rejection produced by [`decide_advance`].
    pub fn advance(
        &mut self,
        actor: UserId,
        clock: &impl Clock,
    ) -> Result<StatusChange, TaskDomainError> {
        let Advance { to, by } = decide_advance(self, actor)?;
        let change = StatusChange {
            from: self.status,
            to,
            actor: by,
            actor_id: Some(actor),
            at: clock.utc(),
        };
        if self.status == TaskStatus::Overdue && to == TaskStatus::InProgress {
            self.overdue_waiver = Some(self.content.deadline);
        }
        self.apply(change);
        Ok(change)
    }

    /// Moves the task to `overdue` on behalf of the sweep.
    ///
    /// Callers decide eligibility; see [`super::sweep_overdue`].
    pub(crate) fn mark_overdue(&mut self, clock: &impl Clock) -> StatusChange {
        let change = StatusChange {
            from: self.status,
            to: TaskStatus::Overdue,
            actor: TransitionActor::Sweep,
            actor_id: None,
            at: clock.utc(),
        };
        self.apply(change);
        change
    }

    /// Changes the deadline on behalf of `actor`.
    ///
    /// Clears any overdue waiver; the status is not touched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::OnlyCreatorMayChangeDeadline`] when
    /// `actor` is not the creator.
    pub fn reschedule(
        &mut self,
        actor: UserId,
        deadline: DateTime<Utc>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if !self.is_creator(actor) {
            return Err(TaskDomainError::OnlyCreatorMayChangeDeadline(self.id));
        }
        self.content.deadline = deadline;
        self.overdue_waiver = None;
        self.touch(clock);
        Ok(())
    }

    /// Records that `viewer` opened the task.
    ///
    /// Returns `true` when the unread marker was cleared.
    pub fn mark_viewed(&mut self, viewer: UserId) -> bool {
        if self.is_new && self.is_assignee(viewer) {
            self.is_new = false;
            return true;
        }
        false
    }

    fn apply(&mut self, change: StatusChange) {
        self.status = change.to;
        self.history.push(change);
        self.updated_at = change.at;
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
