//! Domain model for the organisation directory.

mod department;
mod ids;
mod user;

pub use department::{DEPARTMENT_NOT_FOUND, Department, MANAGER_NOT_ASSIGNED};
pub use ids::{DepartmentId, UserId};
pub use user::User;
