//! Reassignment: spawning a linked task for a different assignee.
//!
//! Reassignment never mutates the original task. The new task starts in
//! `new`, points back through `parent_id`, and is created by the actor.

use super::{Assignment, Task, TaskDomainError};
use crate::organization::domain::{Department, DepartmentId, User, UserId};
use mockable::Clock;

/// Title prefix applied when no explicit title is supplied.
pub const REASSIGNED_TITLE_PREFIX: &str = "[Переназначено]";

/// Which reassignment rule authorised the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReassignmentRule {
    /// The actor created the original task.
    Creator,
    /// The actor manages the task's department and the target is a member.
    DepartmentManager,
    /// The actor is the assignee and the target belongs to a department the
    /// actor manages.
    AssigneeManagedDepartment,
    /// The actor is the assignee and the target manages a department the
    /// actor created.
    AssigneeCreatedDepartment,
}

/// Outcome of a successful authorisation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReassignmentGrant {
    /// Rule that matched.
    pub rule: ReassignmentRule,
    /// Department the new task belongs to.
    pub department_id: DepartmentId,
}

/// Checks whether `actor` may hand `task` to `target`.
///
/// `departments` must contain the task's department and every department
/// the actor manages or created; missing entries simply fail to match.
/// Authorization is decided first, so an unauthorised actor always sees
/// [`TaskDomainError::ReassignmentDenied`].
///
/// # Errors
///
/// Returns [`TaskDomainError::ReassignmentDenied`] when no rule matches and
/// [`TaskDomainError::AlreadyAssigned`] when `target` already holds the
/// task.
pub fn authorize_reassignment(
    task: &Task,
    actor: UserId,
    target: &User,
    departments: &[Department],
) -> Result<ReassignmentGrant, TaskDomainError> {
    let grant = matching_rule(task, actor, target, departments).ok_or(
        TaskDomainError::ReassignmentDenied {
            task_id: task.id(),
            assignee: target.id,
        },
    )?;
    if task.is_assignee(target.id) {
        return Err(TaskDomainError::AlreadyAssigned(task.id()));
    }
    Ok(grant)
}

fn matching_rule(
    task: &Task,
    actor: UserId,
    target: &User,
    departments: &[Department],
) -> Option<ReassignmentGrant> {
    let grant = |rule, department_id| ReassignmentGrant {
        rule,
        department_id,
    };

    if task.is_creator(actor) {
        // Targets outside any department stay with the task's department.
        let department_id = target.department_id.unwrap_or_else(|| task.department_id());
        return Some(grant(ReassignmentRule::Creator, department_id));
    }

    let manages_task_department = departments
        .iter()
        .any(|department| department.id == task.department_id() && department.is_managed_by(actor));
    if manages_task_department && target.is_member_of(task.department_id()) {
        return Some(grant(
            ReassignmentRule::DepartmentManager,
            task.department_id(),
        ));
    }

    if !task.is_assignee(actor) {
        return None;
    }

    let managed_by_actor = target.department_id.and_then(|target_department| {
        departments
            .iter()
            .find(|department| department.id == target_department && department.is_managed_by(actor))
    });
    if let Some(department) = managed_by_actor {
        return Some(grant(
            ReassignmentRule::AssigneeManagedDepartment,
            department.id,
        ));
    }

    departments
        .iter()
        .find(|department| department.created_by == actor && department.is_managed_by(target.id))
        .map(|department| grant(ReassignmentRule::AssigneeCreatedDepartment, department.id))
}

/// Returns the title for a reassigned task.
#[must_use]
pub fn reassigned_title(original: &str, explicit: Option<&str>) -> String {
    match explicit.map(str::trim) {
        Some(title) if !title.is_empty() => title.to_owned(),
        _ => format!("{REASSIGNED_TITLE_PREFIX} {original}"),
    }
}

/// Authorises and builds the task that replaces `task` for `target`.
///
/// # Errors
///
/// Returns the rejection from [`authorize_reassignment`].
pub fn reassign(
    task: &Task,
    actor: UserId,
    target: &User,
    departments: &[Department],
    title: Option<&str>,
    clock: &impl Clock,
) -> Result<Task, TaskDomainError> {
    let grant = authorize_reassignment(task, actor, target, departments)?;
    let content = task
        .content()
        .clone()
        .retitled(&reassigned_title(task.title(), title));
    Ok(Task::new_child(
        task,
        content,
        Assignment::new(grant.department_id, target.id),
        actor,
        clock,
    ))
}
