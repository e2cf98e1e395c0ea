//! Application services for task lifecycle orchestration and the overdue
//! sweep.

mod lifecycle;
mod sweep;

pub use lifecycle::{
    CreateTaskRequest, CreationTarget, ReassignTaskRequest, TaskLifecycleError,
    TaskLifecycleResult, TaskLifecycleService, ViewReceipt,
};
pub use sweep::{
    DEFAULT_SWEEP_INTERVAL, OverdueSweeper, RefreshedTasks, SweepError, SweepReport, SweepResult,
};
