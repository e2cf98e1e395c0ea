//! `PostgreSQL` repository implementation for task messages.

use super::{TaskPgPool, models::TaskMessageRow, schema::task_messages};
use crate::organization::domain::UserId;
use crate::task::{
    domain::{MessageId, PersistedMessageData, TaskId, TaskMessage},
    ports::{MessageRepositoryError, MessageRepositoryResult, TaskMessageRepository},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed message repository.
#[derive(Debug, Clone)]
pub struct PostgresMessageRepository {
    pool: TaskPgPool,
}

impl PostgresMessageRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> MessageRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> MessageRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(MessageRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(MessageRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskMessageRepository for PostgresMessageRepository {
    async fn append(&self, message: &TaskMessage) -> MessageRepositoryResult<()> {
        let message_id = message.id();
        let row = to_row(message);

        self.run_blocking(move |connection| {
            diesel::insert_into(task_messages::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        MessageRepositoryError::DuplicateMessage(message_id)
                    }
                    _ => MessageRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn list_for_task(&self, task_id: TaskId) -> MessageRepositoryResult<Vec<TaskMessage>> {
        self.run_blocking(move |connection| {
            let rows = task_messages::table
                .filter(task_messages::task_id.eq(task_id.into_inner()))
                .order(task_messages::created_at.asc())
                .select(TaskMessageRow::as_select())
                .load::<TaskMessageRow>(connection)
                .map_err(MessageRepositoryError::persistence)?;
            Ok(rows.into_iter().map(row_to_message).collect())
        })
        .await
    }

    async fn mark_read(&self, task_id: TaskId, reader: UserId) -> MessageRepositoryResult<usize> {
        self.run_blocking(move |connection| {
            diesel::update(
                task_messages::table
                    .filter(task_messages::task_id.eq(task_id.into_inner()))
                    .filter(task_messages::is_new.eq(true))
                    .filter(
                        task_messages::sender_id
                            .ne(reader.into_inner())
                            .or(task_messages::is_system.eq(true)),
                    ),
            )
            .set(task_messages::is_new.eq(false))
            .execute(connection)
            .map_err(MessageRepositoryError::persistence)
        })
        .await
    }

    async fn delete_for_task(&self, task_id: TaskId) -> MessageRepositoryResult<()> {
        self.run_blocking(move |connection| {
            diesel::delete(
                task_messages::table.filter(task_messages::task_id.eq(task_id.into_inner())),
            )
            .execute(connection)
            .map_err(MessageRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }
}

fn to_row(message: &TaskMessage) -> TaskMessageRow {
    TaskMessageRow {
        id: message.id().into_inner(),
        task_id: message.task_id().into_inner(),
        sender_id: message.sender_id().into_inner(),
        content: message.content().to_owned(),
        created_at: message.created_at(),
        is_new: message.is_new(),
        is_system: message.is_system(),
    }
}

fn row_to_message(row: TaskMessageRow) -> TaskMessage {
    TaskMessage::from_persisted(PersistedMessageData {
        id: MessageId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        sender_id: UserId::from_uuid(row.sender_id),
        content: row.content,
        created_at: row.created_at,
        is_new: row.is_new,
        is_system: row.is_system,
    })
}
