//! In-memory directory for tests and embedders without a database.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::organization::{
    domain::{Department, DepartmentId, User, UserId},
    ports::{DepartmentFilter, DirectoryError, DirectoryRepository, DirectoryResult},
};

/// Thread-safe in-memory directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    state: Arc<RwLock<InMemoryDirectoryState>>,
}

#[derive(Debug, Default)]
struct InMemoryDirectoryState {
    users: HashMap<UserId, User>,
    departments: HashMap<DepartmentId, Department>,
}

fn poisoned(err: impl ToString) -> DirectoryError {
    DirectoryError::persistence(std::io::Error::other(err.to_string()))
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a user.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Persistence`] when the state lock is
    /// poisoned.
    pub fn insert_user(&self, user: User) -> DirectoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.users.insert(user.id, user);
        Ok(())
    }

    /// Inserts or replaces a department.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Persistence`] when the state lock is
    /// poisoned.
    pub fn insert_department(&self, department: Department) -> DirectoryResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.departments.insert(department.id, department);
        Ok(())
    }
}

/// Collects matching users ordered by full name.
fn users_where(state: &InMemoryDirectoryState, predicate: impl Fn(&User) -> bool) -> Vec<User> {
    let mut users: Vec<User> = state
        .users
        .values()
        .filter(|user| predicate(user))
        .cloned()
        .collect();
    users.sort_by(|left, right| left.full_name.cmp(&right.full_name));
    users
}

#[async_trait]
impl DirectoryRepository for InMemoryDirectory {
    async fn find_user(&self, id: UserId) -> DirectoryResult<Option<User>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.users.get(&id).cloned())
    }

    async fn list_users_by_department(&self, id: DepartmentId) -> DirectoryResult<Vec<User>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(users_where(&state, |user| user.is_member_of(id)))
    }

    async fn list_subordinates(&self, leader_id: UserId) -> DirectoryResult<Vec<User>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(users_where(&state, |user| user.leader_id == Some(leader_id)))
    }

    async fn list_departments(&self, filter: &DepartmentFilter) -> DirectoryResult<Vec<Department>> {
        let state = self.state.read().map_err(poisoned)?;
        let mut departments: Vec<Department> = state
            .departments
            .values()
            .filter(|department| filter.matches(department))
            .cloned()
            .collect();
        departments.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(departments)
    }
}
