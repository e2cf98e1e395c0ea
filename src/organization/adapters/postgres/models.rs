//! Diesel row models for the organisation directory.

use super::schema::{departments, users};
use crate::organization::domain::{Department, DepartmentId, User, UserId};
use diesel::prelude::*;

/// Query result row for users.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub full_name: String,
    /// Contact e-mail address.
    pub email: String,
    /// Avatar reference.
    pub avatar_url: Option<String>,
    /// Department membership.
    pub department_id: Option<uuid::Uuid>,
    /// Leader reference.
    pub leader_id: Option<uuid::Uuid>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            full_name: row.full_name,
            email: row.email,
            avatar_url: row.avatar_url,
            department_id: row.department_id.map(DepartmentId::from_uuid),
            leader_id: row.leader_id.map(UserId::from_uuid),
        }
    }
}

/// Query result row for departments.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = departments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DepartmentRow {
    /// Department identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Managing user.
    pub manager_id: Option<uuid::Uuid>,
    /// Creating user.
    pub created_by: uuid::Uuid,
}

impl From<DepartmentRow> for Department {
    fn from(row: DepartmentRow) -> Self {
        Self {
            id: DepartmentId::from_uuid(row.id),
            name: row.name,
            manager_id: row.manager_id.map(UserId::from_uuid),
            created_by: UserId::from_uuid(row.created_by),
        }
    }
}
