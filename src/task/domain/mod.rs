//! Domain model for task lifecycle management.
//!
//! Everything here is pure: decisions take the loaded state as input and
//! return new state or a rejection, leaving persistence to the services.

mod draft;
mod error;
mod ids;
mod lifecycle;
mod message;
mod overdue;
pub mod query;
mod reassignment;
mod status;
mod task;

pub use draft::{ExecutorCandidate, TaskDraft, executor_pool, plan_duplication};
pub use error::{MissingFields, ParseValueError, TaskDomainError, TaskField};
pub use ids::{MessageId, TaskId};
pub use lifecycle::{Advance, decide_advance};
pub use message::{OVERDUE_NOTICE, PersistedMessageData, TaskMessage};
pub use overdue::{
    OverdueMark, OverdueReentryPolicy, is_overdue_candidate, start_of_day, start_of_today,
    sweep_overdue,
};
pub use reassignment::{
    REASSIGNED_TITLE_PREFIX, ReassignmentGrant, ReassignmentRule, authorize_reassignment,
    reassign, reassigned_title,
};
pub use status::{Priority, ProtocolFlag, TaskStatus};
pub use task::{
    Assignment, PersistedTaskData, StatusChange, Task, TaskContent, TransitionActor,
};
