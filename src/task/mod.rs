//! Task lifecycle management.
//!
//! Covers the status state machine and its authorization rules, task
//! creation and duplication, reassignment into linked child tasks, per-task
//! messages, the day-granular overdue sweep, and the role and status views
//! derived from a loaded task collection. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
