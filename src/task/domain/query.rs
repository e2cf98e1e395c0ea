//! Role-scoped and status-scoped views over loaded tasks.
//!
//! Every function borrows its input and returns references, so views can
//! be chained without copying or mutating the underlying collection.

use super::{ProtocolFlag, Task, TaskStatus};
use crate::organization::domain::{DEPARTMENT_NOT_FOUND, Department, DepartmentId, User, UserId};

/// Which relationship to a user a task view selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRole {
    /// Tasks the user created or is assigned.
    All,
    /// Tasks the user created.
    Author,
    /// Tasks assigned to the user.
    Assignee,
    /// Tasks a chosen subordinate created or is assigned.
    Subordinate(UserId),
}

/// Selects tasks by the viewer's relationship to them.
#[must_use]
pub fn filter_by_role<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    user_id: UserId,
    role: TaskRole,
) -> Vec<&'a Task> {
    tasks
        .into_iter()
        .filter(|task| match role {
            TaskRole::All => task.involves(user_id),
            TaskRole::Author => task.is_creator(user_id),
            TaskRole::Assignee => task.is_assignee(user_id),
            TaskRole::Subordinate(subordinate) => task.involves(subordinate),
        })
        .collect()
}

/// Selects archived (`completed`) or active tasks.
#[must_use]
pub fn filter_by_archived<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    archived: bool,
) -> Vec<&'a Task> {
    tasks
        .into_iter()
        .filter(|task| (task.status() == TaskStatus::Completed) == archived)
        .collect()
}

/// Tasks partitioned by status in [`TaskStatus::ALL`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusGroups<'a> {
    buckets: Vec<(TaskStatus, Vec<&'a Task>)>,
}

impl<'a> StatusGroups<'a> {
    /// Returns the tasks in `status`.
    #[must_use]
    pub fn bucket(&self, status: TaskStatus) -> &[&'a Task] {
        self.buckets
            .iter()
            .find(|(bucket_status, _)| *bucket_status == status)
            .map(|(_, tasks)| tasks.as_slice())
            .unwrap_or_default()
    }

    /// Iterates over every bucket, empty ones included, in fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (TaskStatus, &[&'a Task])> {
        self.buckets
            .iter()
            .map(|(status, tasks)| (*status, tasks.as_slice()))
    }

    /// Returns the number of tasks across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|(_, tasks)| tasks.len()).sum()
    }

    /// Returns `true` when every bucket is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partitions tasks into the five status buckets.
#[must_use]
pub fn group_by_status<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> StatusGroups<'a> {
    let mut buckets: Vec<(TaskStatus, Vec<&'a Task>)> = TaskStatus::ALL
        .iter()
        .map(|status| (*status, Vec::new()))
        .collect();
    for task in tasks {
        if let Some((_, bucket)) = buckets
            .iter_mut()
            .find(|(status, _)| *status == task.status())
        {
            bucket.push(task);
        }
    }
    StatusGroups { buckets }
}

/// Tasks belonging to one department.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentGroup<'a> {
    /// Department identifier.
    pub department_id: DepartmentId,
    /// Department name, or [`DEPARTMENT_NOT_FOUND`].
    pub department_name: &'a str,
    /// Tasks in input order.
    pub tasks: Vec<&'a Task>,
}

/// Partitions tasks by department in first-seen order.
#[must_use]
pub fn group_by_department<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    departments: &'a [Department],
) -> Vec<DepartmentGroup<'a>> {
    let mut groups: Vec<DepartmentGroup<'a>> = Vec::new();
    for task in tasks {
        let department_id = task.department_id();
        if let Some(group) = groups
            .iter_mut()
            .find(|group| group.department_id == department_id)
        {
            group.tasks.push(task);
            continue;
        }
        let department_name = departments
            .iter()
            .find(|department| department.id == department_id)
            .map_or(DEPARTMENT_NOT_FOUND, |department| department.name.as_str());
        groups.push(DepartmentGroup {
            department_id,
            department_name,
            tasks: vec![task],
        });
    }
    groups
}

/// Case-insensitive search over the tasks visible to `user_id`.
///
/// Matches the title, the description, or the status label. A blank query
/// returns nothing.
#[must_use]
pub fn search<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    query: &str,
    user_id: UserId,
) -> Vec<&'a Task> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    tasks
        .into_iter()
        .filter(|task| task.involves(user_id))
        .filter(|task| {
            [task.title(), task.description(), task.status().label()]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Sorts by deadline, soonest first; ties keep their input order.
pub fn sort_by_deadline(tasks: &mut [&Task]) {
    tasks.sort_by_key(|task| task.deadline());
}

/// Selects tasks flagged for the meeting protocol.
#[must_use]
pub fn protocol_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<&'a Task> {
    tasks
        .into_iter()
        .filter(|task| task.content().protocol() == ProtocolFlag::Active)
        .collect()
}

/// Selects the users whose leader is `manager_id`.
#[must_use]
pub fn subordinates(users: &[User], manager_id: UserId) -> Vec<&User> {
    users
        .iter()
        .filter(|user| user.leader_id == Some(manager_id))
        .collect()
}
