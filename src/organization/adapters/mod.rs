//! Adapter implementations for the organisation directory.

pub mod memory;
pub mod postgres;
