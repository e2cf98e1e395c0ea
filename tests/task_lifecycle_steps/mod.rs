//! Step definitions for task lifecycle BDD scenarios.

pub mod world;

mod given;
mod then;
mod when;
