//! Organisation directory: users, departments, and reporting lines.
//!
//! Tasks are assigned within departments and authorised against who
//! manages or created a department, so the task context reads this
//! directory but never writes to it. Registration and department
//! administration live outside this crate; the in-memory adapter exposes
//! seeding helpers in their place.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
