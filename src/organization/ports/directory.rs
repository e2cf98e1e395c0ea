//! Read-side directory port for users and departments.

use crate::organization::domain::{Department, DepartmentId, User, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Row filter over departments.
///
/// The two predicates are OR-composed: a department matches when its id is
/// listed in `ids` or when `involving` manages or created it. An empty
/// filter matches every department.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentFilter {
    ids: Vec<DepartmentId>,
    involving: Option<UserId>,
}

impl DepartmentFilter {
    /// Creates a filter matching every department.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Adds departments to match by identifier.
    #[must_use]
    pub fn with_ids(mut self, ids: impl IntoIterator<Item = DepartmentId>) -> Self {
        self.ids.extend(ids);
        self
    }

    /// Matches departments managed or created by `user_id`.
    #[must_use]
    pub const fn involving(mut self, user_id: UserId) -> Self {
        self.involving = Some(user_id);
        self
    }

    /// Returns the identifiers matched explicitly.
    #[must_use]
    pub fn ids(&self) -> &[DepartmentId] {
        &self.ids
    }

    /// Returns the user whose managed or created departments match.
    #[must_use]
    pub const fn involved_user(&self) -> Option<UserId> {
        self.involving
    }

    /// Returns `true` when the filter places no restriction.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.ids.is_empty() && self.involving.is_none()
    }

    /// Evaluates the filter against a department.
    #[must_use]
    pub fn matches(&self, department: &Department) -> bool {
        if self.is_unrestricted() {
            return true;
        }
        self.ids.contains(&department.id)
            || self.involving.is_some_and(|user_id| {
                department.is_managed_by(user_id) || department.created_by == user_id
            })
    }
}

/// Directory lookup contract.
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// Finds a user by identifier.
    ///
    /// Returns `None` when the user does not exist.
    async fn find_user(&self, id: UserId) -> DirectoryResult<Option<User>>;

    /// Returns the members of a department.
    async fn list_users_by_department(&self, id: DepartmentId) -> DirectoryResult<Vec<User>>;

    /// Returns every user whose leader is `leader_id`.
    async fn list_subordinates(&self, leader_id: UserId) -> DirectoryResult<Vec<User>>;

    /// Returns departments matching the filter, ordered by name.
    async fn list_departments(&self, filter: &DepartmentFilter) -> DirectoryResult<Vec<Department>>;
}

/// Errors returned by directory implementations.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DirectoryError {
    /// Wraps a data-quality error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
