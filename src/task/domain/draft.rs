//! Task creation input: validation and duplication planning.

use super::{
    Assignment, MissingFields, Priority, ProtocolFlag, TaskContent, TaskDomainError, TaskField,
};
use crate::organization::domain::{Department, DepartmentId, User, UserId};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Unvalidated task input as entered by a user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    title: String,
    description: String,
    deadline: Option<DateTime<Utc>>,
    priority: Priority,
    protocol: ProtocolFlag,
}

impl TaskDraft {
    /// Creates a draft with title and description.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Sets the deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
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

    fn missing_content_fields(&self) -> Vec<TaskField> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push(TaskField::Title);
        }
        if self.description.trim().is_empty() {
            missing.push(TaskField::Description);
        }
        if self.deadline.is_none() {
            missing.push(TaskField::Deadline);
        }
        missing
    }

    /// Validates the fields shared by every creation mode.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::MissingFields`] listing every missing
    /// field.
    pub fn into_content(self) -> Result<TaskContent, TaskDomainError> {
        MissingFields::check(self.missing_content_fields())?;
        let deadline = self
            .deadline
            .ok_or_else(|| MissingFields::of(TaskField::Deadline))?;
        Ok(TaskContent::new(self.title, self.description, deadline)?
            .with_priority(self.priority)
            .with_protocol(self.protocol))
    }

    /// Validates a single-target creation.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::MissingFields`] listing every missing
    /// field, the department and the assignee included.
    pub fn into_single(
        self,
        department_id: Option<DepartmentId>,
        assignee: Option<UserId>,
    ) -> Result<(TaskContent, Assignment), TaskDomainError> {
        let mut missing = self.missing_content_fields();
        if department_id.is_none() {
            missing.push(TaskField::Department);
        }
        if assignee.is_none() {
            missing.push(TaskField::Assignee);
        }
        MissingFields::check(missing)?;
        let department = department_id.ok_or_else(|| MissingFields::of(TaskField::Department))?;
        let assignee_id = assignee.ok_or_else(|| MissingFields::of(TaskField::Assignee))?;
        Ok((self.into_content()?, Assignment::new(department, assignee_id)))
    }
}

/// A user eligible to receive a duplicated task, and the department the
/// copy would belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorCandidate {
    /// Candidate user.
    pub user_id: UserId,
    /// Department the candidate was gathered from.
    pub department_id: DepartmentId,
}

/// Gathers duplication candidates from the selected departments.
///
/// Each department contributes its members, then its manager. A user
/// reachable through several departments keeps the first one seen.
#[must_use]
pub fn executor_pool(departments: &[(Department, Vec<User>)]) -> Vec<ExecutorCandidate> {
    let mut seen = HashSet::new();
    let mut pool = Vec::new();
    for (department, members) in departments {
        let member_ids = members.iter().map(|member| member.id);
        for user_id in member_ids.chain(department.manager_id) {
            if seen.insert(user_id) {
                pool.push(ExecutorCandidate {
                    user_id,
                    department_id: department.id,
                });
            }
        }
    }
    pool
}

/// Resolves the selected executors against the candidate pool.
///
/// Selected users outside the pool are skipped; duplicates collapse.
///
/// # Errors
///
/// Returns [`TaskDomainError::NoDuplicationTargets`] when nothing resolves.
pub fn plan_duplication(
    pool: &[ExecutorCandidate],
    selected: &[UserId],
) -> Result<Vec<Assignment>, TaskDomainError> {
    let mut planned = HashSet::new();
    let assignments: Vec<Assignment> = selected
        .iter()
        .filter(|user_id| planned.insert(**user_id))
        .filter_map(|user_id| pool.iter().find(|candidate| candidate.user_id == *user_id))
        .map(|candidate| Assignment::new(candidate.department_id, candidate.user_id))
        .collect();
    if assignments.is_empty() {
        return Err(TaskDomainError::NoDuplicationTargets);
    }
    Ok(assignments)
}
