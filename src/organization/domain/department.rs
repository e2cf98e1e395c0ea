//! Department records and display fallbacks.

use super::{DepartmentId, User, UserId};
use serde::{Deserialize, Serialize};

/// Label shown when a department has no manager or the manager is unknown.
pub const MANAGER_NOT_ASSIGNED: &str = "manager not assigned";

/// Label shown when a referenced department cannot be found.
pub const DEPARTMENT_NOT_FOUND: &str = "department not found";

/// An organisational unit owning a set of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Department identifier.
    pub id: DepartmentId,
    /// Display name.
    pub name: String,
    /// User managing the department.
    pub manager_id: Option<UserId>,
    /// User who created the department.
    pub created_by: UserId,
}

impl Department {
    /// Creates a department without a manager.
    #[must_use]
    pub fn new(id: DepartmentId, name: impl Into<String>, created_by: UserId) -> Self {
        Self {
            id,
            name: name.into(),
            manager_id: None,
            created_by,
        }
    }

    /// Sets the department manager.
    #[must_use]
    pub const fn managed_by(mut self, manager_id: UserId) -> Self {
        self.manager_id = Some(manager_id);
        self
    }

    /// Returns `true` when `user_id` manages this department.
    #[must_use]
    pub fn is_managed_by(&self, user_id: UserId) -> bool {
        self.manager_id == Some(user_id)
    }

    /// Resolves the manager's display name against a user snapshot.
    ///
    /// Falls back to [`MANAGER_NOT_ASSIGNED`] when no manager is set or the
    /// manager is missing from `users`.
    #[must_use]
    pub fn manager_label<'a>(&self, users: &'a [User]) -> &'a str {
        self.manager_id
            .and_then(|manager_id| users.iter().find(|user| user.id == manager_id))
            .map_or(MANAGER_NOT_ASSIGNED, |user| user.full_name.as_str())
    }
}
