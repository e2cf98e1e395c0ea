//! Shared fixtures for task unit tests.

use crate::organization::domain::{DepartmentId, UserId};
use crate::task::domain::{
    Assignment, PersistedTaskData, Task, TaskContent, TaskId, TaskStatus,
};
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct FixedClock(pub(super) DateTime<Utc>);

impl FixedClock {
    /// Pins the clock to a wall-clock time in the local zone.
    pub(super) fn at_local(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Self {
        Self(local_time(year, month, day, hour, minute))
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Converts a local wall-clock time to UTC.
pub(super) fn local_time(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Local
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("unambiguous local time")
        .with_timezone(&Utc)
}

/// The users and department most tests need.
#[derive(Debug, Clone, Copy)]
pub(super) struct Cast {
    pub(super) creator: UserId,
    pub(super) assignee: UserId,
    pub(super) outsider: UserId,
    pub(super) department: DepartmentId,
}

#[fixture]
pub(super) fn cast() -> Cast {
    Cast {
        creator: UserId::new(),
        assignee: UserId::new(),
        outsider: UserId::new(),
        department: DepartmentId::new(),
    }
}

#[fixture]
pub(super) fn clock() -> FixedClock {
    FixedClock::at_local(2026, 6, 15, 15, 0)
}

/// Builds content due at `deadline`.
pub(super) fn content_due(title: &str, deadline: DateTime<Utc>) -> TaskContent {
    TaskContent::new(title, "Подготовить материалы", deadline).expect("valid content")
}

/// Builds a fresh task from `cast.creator` to `cast.assignee`.
pub(super) fn new_task(cast: Cast, deadline: DateTime<Utc>, clock: &FixedClock) -> Task {
    Task::new(
        content_due("Отчёт за квартал", deadline),
        Assignment::new(cast.department, cast.assignee),
        cast.creator,
        clock,
    )
}

/// Reconstructs a task already in `status`.
pub(super) fn task_in(
    status: TaskStatus,
    cast: Cast,
    deadline: DateTime<Utc>,
    clock: &FixedClock,
) -> Task {
    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        parent_id: None,
        content: content_due("Отчёт за квартал", deadline),
        assignment: Assignment::new(cast.department, cast.assignee),
        created_by: cast.creator,
        status,
        is_new: true,
        history: Vec::new(),
        overdue_waiver: None,
        created_at: clock.utc(),
        updated_at: clock.utc(),
    })
}
