//! `PostgreSQL` directory implementation.

use super::{
    models::{DepartmentRow, UserRow},
    schema::{departments, users},
};
use crate::organization::{
    domain::{Department, DepartmentId, User, UserId},
    ports::{DepartmentFilter, DirectoryError, DirectoryRepository, DirectoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type used by directory adapters.
pub type DirectoryPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed directory.
#[derive(Debug, Clone)]
pub struct PostgresDirectory {
    pool: DirectoryPgPool,
}

impl PostgresDirectory {
    /// Creates a new directory from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: DirectoryPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> DirectoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> DirectoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(DirectoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(DirectoryError::persistence)?
    }
}

#[async_trait]
impl DirectoryRepository for PostgresDirectory {
    async fn find_user(&self, id: UserId) -> DirectoryResult<Option<User>> {
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::id.eq(id.into_inner()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(DirectoryError::persistence)?;
            Ok(row.map(User::from))
        })
        .await
    }

    async fn list_users_by_department(&self, id: DepartmentId) -> DirectoryResult<Vec<User>> {
        self.run_blocking(move |connection| {
            let rows = users::table
                .filter(users::department_id.eq(id.into_inner()))
                .order(users::full_name.asc())
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(DirectoryError::persistence)?;
            Ok(rows.into_iter().map(User::from).collect())
        })
        .await
    }

    async fn list_subordinates(&self, leader_id: UserId) -> DirectoryResult<Vec<User>> {
        self.run_blocking(move |connection| {
            let rows = users::table
                .filter(users::leader_id.eq(leader_id.into_inner()))
                .order(users::full_name.asc())
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(DirectoryError::persistence)?;
            Ok(rows.into_iter().map(User::from).collect())
        })
        .await
    }

    async fn list_departments(&self, filter: &DepartmentFilter) -> DirectoryResult<Vec<Department>> {
        let ids: Vec<uuid::Uuid> = filter
            .ids()
            .iter()
            .map(|id| id.into_inner())
            .collect();
        let involving = filter.involved_user().map(UserId::into_inner);
        let unrestricted = filter.is_unrestricted();

        self.run_blocking(move |connection| {
            let mut query = departments::table
                .select(DepartmentRow::as_select())
                .into_boxed();
            if !unrestricted {
                // `eq_any` over no ids matches nothing, so the clauses below OR in.
                query = query.filter(departments::id.eq_any(ids));
                if let Some(user_id) = involving {
                    query = query
                        .or_filter(departments::manager_id.eq(user_id))
                        .or_filter(departments::created_by.eq(user_id));
                }
            }
            let rows = query
                .order(departments::name.asc())
                .load::<DepartmentRow>(connection)
                .map_err(DirectoryError::persistence)?;
            Ok(rows.into_iter().map(Department::from).collect())
        })
        .await
    }
}
