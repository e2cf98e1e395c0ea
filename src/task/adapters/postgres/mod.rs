//! `PostgreSQL` adapters for task lifecycle persistence.

mod messages;
mod models;
mod repository;
mod schema;

pub use messages::PostgresMessageRepository;
pub use repository::{PostgresTaskRepository, TaskPgPool};
