//! Overdue detection.
//!
//! Deadlines are compared at day granularity: a task due at any time today
//! is not overdue until the local day rolls over.

use super::{OVERDUE_NOTICE, ParseValueError, Task, TaskMessage, TaskStatus};
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the sweep treats a task the creator reopened after it went overdue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverdueReentryPolicy {
    /// Any task past its deadline is marked again on the next sweep. The
    /// creator has to move the deadline to keep it out of `overdue`.
    #[default]
    Resweep,
    /// A reopened task stays out of `overdue` until its deadline changes.
    RespectManualOverride,
}

impl OverdueReentryPolicy {
    /// Returns the canonical configuration representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resweep => "resweep",
            Self::RespectManualOverride => "respect_manual_override",
        }
    }
}

impl fmt::Display for OverdueReentryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for OverdueReentryPolicy {
    type Error = ParseValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "resweep" => Ok(Self::Resweep),
            "respect_manual_override" => Ok(Self::RespectManualOverride),
            _ => Err(ParseValueError::new("overdue re-entry policy", value)),
        }
    }
}

/// Returns midnight of the day containing `now`, in `now`'s time zone.
///
/// When local midnight falls in a DST gap, the day starts at the first
/// local minute after midnight that exists.
#[must_use]
pub fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let zone = now.timezone();
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    (0..MINUTES_PER_DAY)
        .map(|minute| midnight + Duration::minutes(minute))
        .find_map(|local| zone.from_local_datetime(&local).earliest())
        .map_or_else(|| midnight.and_utc(), |local| local.with_timezone(&Utc))
}

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Returns midnight of the current local day according to `clock`.
#[must_use]
pub fn start_of_today(clock: &impl Clock) -> DateTime<Utc> {
    start_of_day(&clock.local())
}

/// Returns `true` when the sweep must move `task` to `overdue`.
#[must_use]
pub fn is_overdue_candidate(
    task: &Task,
    start_of_today: DateTime<Utc>,
    policy: OverdueReentryPolicy,
) -> bool {
    if task.deadline() >= start_of_today {
        return false;
    }
    if matches!(task.status(), TaskStatus::Completed | TaskStatus::Overdue) {
        return false;
    }
    match policy {
        OverdueReentryPolicy::Resweep => true,
        OverdueReentryPolicy::RespectManualOverride => {
            task.overdue_waiver() != Some(task.deadline())
        }
    }
}

/// A task moved to `overdue` together with the notice to post on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverdueMark {
    /// The task in its new `overdue` state.
    pub task: Task,
    /// System message announcing the change, attributed to the creator.
    pub notice: TaskMessage,
}

/// Computes the overdue marks for a task collection.
///
/// The input is not modified. Rerunning against the returned tasks yields
/// no marks, since they are already `overdue`.
#[must_use]
pub fn sweep_overdue(
    tasks: &[Task],
    start_of_today: DateTime<Utc>,
    policy: OverdueReentryPolicy,
    clock: &impl Clock,
) -> Vec<OverdueMark> {
    tasks
        .iter()
        .filter(|task| is_overdue_candidate(task, start_of_today, policy))
        .map(|task| {
            let mut marked = task.clone();
            marked.mark_overdue(clock);
            let notice = TaskMessage::system(marked.id(), marked.created_by(), OVERDUE_NOTICE, clock);
            OverdueMark {
                task: marked,
                notice,
            }
        })
        .collect()
}
