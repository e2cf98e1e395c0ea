//! `PostgreSQL` adapter for the organisation directory.

mod models;
mod repository;
pub(crate) mod schema;

pub use repository::{DirectoryPgPool, PostgresDirectory};
