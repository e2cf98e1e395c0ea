//! Port contracts for task lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod messages;
pub mod repository;

pub use messages::{MessageRepositoryError, MessageRepositoryResult, TaskMessageRepository};
pub use repository::{TaskFilter, TaskRepository, TaskRepositoryError, TaskRepositoryResult};
