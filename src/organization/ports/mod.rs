//! Port contracts for the organisation directory.

pub mod directory;

pub use directory::{DepartmentFilter, DirectoryError, DirectoryRepository, DirectoryResult};
