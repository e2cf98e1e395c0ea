//! Status advance rules.
//!
//! Every status change requested by a user goes through [`decide_advance`].
//! The sweep is the only other writer of status, see [`super::sweep_overdue`].

use super::{Task, TaskDomainError, TaskStatus, TransitionActor};
use crate::organization::domain::UserId;

/// An authorised advance: the next status and the role that earned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    /// Status the task moves to.
    pub to: TaskStatus,
    /// Role the actor held for this advance.
    pub by: TransitionActor,
}

/// Decides whether `actor` may advance `task` to its next status.
///
/// | status            | actor    | next              |
/// |-------------------|----------|-------------------|
/// | `new`             | assignee | `in_progress`     |
/// | `in_progress`     | assignee | `on_verification` |
/// | `overdue`         | creator  | `in_progress`     |
/// | `on_verification` | creator  | `completed`       |
///
/// Rejections are checked in a fixed order and the first match wins, so an
/// assignee who also created the task still cannot accept their own work.
///
/// # Errors
///
/// Returns the [`TaskDomainError`] naming the rule that rejected the
/// advance.
pub fn decide_advance(task: &Task, actor: UserId) -> Result<Advance, TaskDomainError> {
    let id = task.id();
    let is_assignee = task.is_assignee(actor);
    let is_creator = task.is_creator(actor);

    match task.status() {
        TaskStatus::OnVerification if is_assignee => {
            Err(TaskDomainError::InsufficientPrivileges(id))
        }
        TaskStatus::Completed => Err(TaskDomainError::TaskAlreadyCompleted(id)),
        TaskStatus::New if !is_assignee => Err(TaskDomainError::OnlyAssigneeMayStart(id)),
        TaskStatus::InProgress if !is_assignee => Err(TaskDomainError::OnlyAssigneeMaySubmit(id)),
        TaskStatus::Overdue if !is_creator => Err(TaskDomainError::OnlyCreatorMayResume(id)),
        TaskStatus::OnVerification if !is_creator => {
            Err(TaskDomainError::InsufficientPrivileges(id))
        }
        TaskStatus::New => Ok(Advance {
            to: TaskStatus::InProgress,
            by: TransitionActor::Assignee,
        }),
        TaskStatus::InProgress => Ok(Advance {
            to: TaskStatus::OnVerification,
            by: TransitionActor::Assignee,
        }),
        TaskStatus::Overdue => Ok(Advance {
            to: TaskStatus::InProgress,
            by: TransitionActor::Creator,
        }),
        TaskStatus::OnVerification => Ok(Advance {
            to: TaskStatus::Completed,
            by: TransitionActor::Creator,
        }),
    }
}
