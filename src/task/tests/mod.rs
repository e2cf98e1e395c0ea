//! Unit tests for the task module.
//!
//! Domain decisions are tested as pure functions; services run against the
//! in-memory adapters, with `mockall` doubles for collaborator failures.

mod support;
