//! Error types for task validation, authorisation, and parsing.

use super::TaskId;
use crate::organization::domain::UserId;
use std::fmt;
use thiserror::Error;

/// A field that must be supplied when creating a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskField {
    /// Task title.
    Title,
    /// Task description.
    Description,
    /// Task deadline.
    Deadline,
    /// Target department (single-target creation).
    Department,
    /// Target assignee (single-target creation).
    Assignee,
}

impl TaskField {
    /// Returns the field name reported to callers.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Deadline => "deadline",
            Self::Department => "department",
            Self::Assignee => "assignee",
        }
    }
}

/// Ordered list of required fields that were not supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFields(Vec<TaskField>);

impl MissingFields {
    /// Wraps the missing fields, returning `None` when nothing is missing.
    #[must_use]
    pub fn from_fields(fields: Vec<TaskField>) -> Option<Self> {
        if fields.is_empty() {
            None
        } else {
            Some(Self(fields))
        }
    }

    /// Reports a single missing field.
    #[must_use]
    pub fn of(field: TaskField) -> Self {
        Self(vec![field])
    }

    /// Succeeds when `fields` is empty.
    ///
    /// # Errors
    ///
    /// Returns the non-empty list as [`MissingFields`].
    pub fn check(fields: Vec<TaskField>) -> Result<(), Self> {
        Self::from_fields(fields).map_or(Ok(()), Err)
    }

    /// Returns the missing fields in report order.
    #[must_use]
    pub fn fields(&self) -> &[TaskField] {
        &self.0
    }

    /// Returns the missing field names in report order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.0.iter().map(|field| field.as_str()).collect()
    }
}

impl fmt::Display for MissingFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().join(", "))
    }
}

/// Errors returned by task domain decisions.
///
/// Display strings are the user-facing reasons and are shown verbatim.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The assignee tried to close a task pending verification, or a
    /// non-creator tried to accept it.
    #[error("insufficient privileges")]
    InsufficientPrivileges(TaskId),

    /// The task is already completed.
    #[error("cannot change status of a completed task")]
    TaskAlreadyCompleted(TaskId),

    /// Someone other than the assignee tried to start the task.
    #[error("only the assignee may start a task")]
    OnlyAssigneeMayStart(TaskId),

    /// Someone other than the assignee tried to submit the task.
    #[error("only the assignee may submit a task for verification")]
    OnlyAssigneeMaySubmit(TaskId),

    /// Someone other than the creator tried to resume an overdue task.
    #[error("only the creator may move an overdue task back into progress or verification")]
    OnlyCreatorMayResume(TaskId),

    /// None of the reassignment rules authorise the actor.
    #[error("insufficient privileges to reassign to the selected employee")]
    ReassignmentDenied {
        /// Task being reassigned.
        task_id: TaskId,
        /// Requested new assignee.
        assignee: UserId,
    },

    /// Someone other than the creator tried to move the deadline.
    #[error("only the creator may change the deadline")]
    OnlyCreatorMayChangeDeadline(TaskId),

    /// A user outside the task tried to post a message.
    #[error("only task participants may post messages")]
    NotAParticipant(TaskId),

    /// A user outside the task tried to open it.
    #[error("only task participants may open a task")]
    ViewerNotAParticipant(TaskId),

    /// The new assignee already holds the task.
    #[error("the task is already assigned to the selected employee")]
    AlreadyAssigned(TaskId),

    /// Required creation fields are missing.
    #[error("missing required fields: {0}")]
    MissingFields(MissingFields),

    /// Duplication resolved no executors.
    #[error("no duplication targets")]
    NoDuplicationTargets,

    /// Message content is empty after trimming.
    #[error("message content must not be empty")]
    EmptyMessage,
}

impl From<MissingFields> for TaskDomainError {
    fn from(fields: MissingFields) -> Self {
        Self::MissingFields(fields)
    }
}

/// Error returned while parsing stored enumeration values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseValueError {
    kind: &'static str,
    value: String,
}

impl ParseValueError {
    /// Creates a parse error for the given value kind.
    #[must_use]
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    /// Returns the rejected value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}
