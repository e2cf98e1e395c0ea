//! Registered user profile.

use super::{DepartmentId, UserId};
use serde::{Deserialize, Serialize};

/// A registered user as seen by the task tracker.
///
/// Users are created by the external authentication flow; the tracker only
/// reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub full_name: String,
    /// Contact e-mail address.
    pub email: String,
    /// Avatar reference, if one was uploaded.
    pub avatar_url: Option<String>,
    /// Department the user belongs to.
    pub department_id: Option<DepartmentId>,
    /// User who manages or oversees this user.
    pub leader_id: Option<UserId>,
}

impl User {
    /// Creates a user without department membership or leader.
    #[must_use]
    pub fn new(id: UserId, full_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            email: email.into(),
            avatar_url: None,
            department_id: None,
            leader_id: None,
        }
    }

    /// Places the user in a department.
    #[must_use]
    pub const fn in_department(mut self, department_id: DepartmentId) -> Self {
        self.department_id = Some(department_id);
        self
    }

    /// Sets the user's leader.
    #[must_use]
    pub const fn reporting_to(mut self, leader_id: UserId) -> Self {
        self.leader_id = Some(leader_id);
        self
    }

    /// Sets the avatar reference.
    #[must_use]
    pub fn with_avatar(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    /// Returns `true` when the user is a member of the department.
    #[must_use]
    pub fn is_member_of(&self, department_id: DepartmentId) -> bool {
        self.department_id == Some(department_id)
    }
}
