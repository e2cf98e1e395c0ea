//! Poruchenie: task assignment lifecycle engine.
//!
//! Tracks tasks ("поручения") that users in an organisation assign to one
//! another: who may move a task through its statuses, how tasks are
//! duplicated across departments or reassigned to colleagues, and how tasks
//! past their deadline are swept into `overdue`.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure decision logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence and lookups
//! - **Adapters**: In-memory and `PostgreSQL` implementations of ports
//! - **Services**: Orchestration that validates, then writes
//!
//! # Modules
//!
//! - [`organization`]: Users, departments, and the directory port
//! - [`task`]: Task lifecycle, messages, queries, and the overdue sweep
//! - [`config`]: Runtime configuration
//! - [`telemetry`]: Structured logging setup

pub mod config;
pub mod organization;
pub mod task;
pub mod telemetry;
