//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{NewTaskRow, TaskChangeset, TaskRow},
    schema::tasks,
};
use crate::organization::domain::{DepartmentId, UserId};
use crate::task::{
    domain::{
        Assignment, PersistedTaskData, Priority, ProtocolFlag, StatusChange, Task, TaskContent,
        TaskId, TaskStatus,
    },
    ports::{TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn store_all(&self, batch: &[Task]) -> TaskRepositoryResult<()> {
        let new_rows = batch
            .iter()
            .map(to_new_row)
            .collect::<TaskRepositoryResult<Vec<_>>>()?;
        if new_rows.is_empty() {
            return Ok(());
        }
        let ids: Vec<uuid::Uuid> = new_rows.iter().map(|row| row.id).collect();

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx_connection| {
                // Pre-check so the caller learns which task collided.
                let existing = tasks::table
                    .filter(tasks::id.eq_any(ids))
                    .select(tasks::id)
                    .first::<uuid::Uuid>(tx_connection)
                    .optional()?;
                if let Some(id) = existing {
                    return Err(TaskRepositoryError::DuplicateTask(TaskId::from_uuid(id)));
                }
                diesel::insert_into(tasks::table)
                    .values(&new_rows)
                    .execute(tx_connection)?;
                Ok(())
            })
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changeset = to_changeset(task)?;

        self.run_blocking(move |connection| {
            let updated_count = diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
                .set(&changeset)
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if updated_count == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let deleted_count = diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if deleted_count == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>> {
        let department_ids: Option<Vec<uuid::Uuid>> = filter
            .department_ids()
            .map(|ids| ids.iter().copied().map(DepartmentId::into_inner).collect());
        let participant = filter.participant().map(UserId::into_inner);

        self.run_blocking(move |connection| {
            let mut query = tasks::table.select(TaskRow::as_select()).into_boxed();
            if let Some(ids) = department_ids {
                query = query.filter(tasks::department_id.eq_any(ids));
            }
            if let Some(user_id) = participant {
                query = query.filter(
                    tasks::created_by
                        .eq(user_id)
                        .or(tasks::assigned_to.eq(user_id)),
                );
            }
            let rows = query
                .order(tasks::created_at.desc())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

fn to_new_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    let history = serde_json::to_value(task.history()).map_err(TaskRepositoryError::persistence)?;
    let content = task.content();

    Ok(NewTaskRow {
        id: task.id().into_inner(),
        parent_id: task.parent_id().map(TaskId::into_inner),
        title: content.title().to_owned(),
        description: content.description().to_owned(),
        priority: content.priority().as_str().to_owned(),
        protocol: content.protocol().as_str().to_owned(),
        deadline: content.deadline(),
        department_id: task.department_id().into_inner(),
        assigned_to: task.assigned_to().into_inner(),
        created_by: task.created_by().into_inner(),
        status: task.status().as_str().to_owned(),
        is_new: task.is_new(),
        history,
        overdue_waiver: task.overdue_waiver(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn to_changeset(task: &Task) -> TaskRepositoryResult<TaskChangeset> {
    let history = serde_json::to_value(task.history()).map_err(TaskRepositoryError::persistence)?;
    let content = task.content();

    Ok(TaskChangeset {
        title: content.title().to_owned(),
        description: content.description().to_owned(),
        priority: content.priority().as_str().to_owned(),
        protocol: content.protocol().as_str().to_owned(),
        deadline: content.deadline(),
        department_id: task.department_id().into_inner(),
        assigned_to: task.assigned_to().into_inner(),
        status: task.status().as_str().to_owned(),
        is_new: task.is_new(),
        history,
        overdue_waiver: task.overdue_waiver(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        parent_id,
        title,
        description,
        priority: persisted_priority,
        protocol: persisted_protocol,
        deadline,
        department_id,
        assigned_to,
        created_by,
        status: persisted_status,
        is_new,
        history: persisted_history,
        overdue_waiver,
        created_at,
        updated_at,
    } = row;

    let status = TaskStatus::try_from(persisted_status.as_str())
        .map_err(TaskRepositoryError::invalid_persisted_data)?;
    let priority = Priority::try_from(persisted_priority.as_str())
        .map_err(TaskRepositoryError::invalid_persisted_data)?;
    let protocol = ProtocolFlag::try_from(persisted_protocol.as_str())
        .map_err(TaskRepositoryError::invalid_persisted_data)?;
    let history = serde_json::from_value::<Vec<StatusChange>>(persisted_history)
        .map_err(TaskRepositoryError::invalid_persisted_data)?;
    let content = TaskContent::new(title, description, deadline)
        .map_err(TaskRepositoryError::invalid_persisted_data)?
        .with_priority(priority)
        .with_protocol(protocol);

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        parent_id: parent_id.map(TaskId::from_uuid),
        content,
        assignment: Assignment::new(
            DepartmentId::from_uuid(department_id),
            UserId::from_uuid(assigned_to),
        ),
        created_by: UserId::from_uuid(created_by),
        status,
        is_new,
        history,
        overdue_waiver,
        created_at,
        updated_at,
    }))
}
