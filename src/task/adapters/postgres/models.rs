//! Diesel row models for task persistence.

use super::schema::{task_messages, tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task this one was reassigned from.
    pub parent_id: Option<uuid::Uuid>,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Priority.
    pub priority: String,
    /// Meeting-protocol flag.
    pub protocol: String,
    /// Deadline.
    pub deadline: DateTime<Utc>,
    /// Owning department.
    pub department_id: uuid::Uuid,
    /// Assignee.
    pub assigned_to: uuid::Uuid,
    /// Creator.
    pub created_by: uuid::Uuid,
    /// Lifecycle status.
    pub status: String,
    /// Unread marker.
    pub is_new: bool,
    /// Status history JSON payload.
    pub history: Value,
    /// Deadline the task was last reopened against.
    pub overdue_waiver: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task this one was reassigned from.
    pub parent_id: Option<uuid::Uuid>,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Priority.
    pub priority: String,
    /// Meeting-protocol flag.
    pub protocol: String,
    /// Deadline.
    pub deadline: DateTime<Utc>,
    /// Owning department.
    pub department_id: uuid::Uuid,
    /// Assignee.
    pub assigned_to: uuid::Uuid,
    /// Creator.
    pub created_by: uuid::Uuid,
    /// Lifecycle status.
    pub status: String,
    /// Unread marker.
    pub is_new: bool,
    /// Status history JSON payload.
    pub history: Value,
    /// Deadline the task was last reopened against.
    pub overdue_waiver: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset for the mutable task columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Priority.
    pub priority: String,
    /// Meeting-protocol flag.
    pub protocol: String,
    /// Deadline.
    pub deadline: DateTime<Utc>,
    /// Owning department.
    pub department_id: uuid::Uuid,
    /// Assignee.
    pub assigned_to: uuid::Uuid,
    /// Lifecycle status.
    pub status: String,
    /// Unread marker.
    pub is_new: bool,
    /// Status history JSON payload.
    pub history: Value,
    /// Deadline the task was last reopened against.
    pub overdue_waiver: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Row model for task messages, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskMessageRow {
    /// Message identifier.
    pub id: uuid::Uuid,
    /// Owning task.
    pub task_id: uuid::Uuid,
    /// Sending user.
    pub sender_id: uuid::Uuid,
    /// Message text.
    pub content: String,
    /// Posting timestamp.
    pub created_at: DateTime<Utc>,
    /// Unread marker.
    pub is_new: bool,
    /// Automated notice flag.
    pub is_system: bool,
}
