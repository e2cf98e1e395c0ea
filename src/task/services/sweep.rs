//! Overdue sweep orchestration: load, mark, persist, notify.

use crate::task::{
    domain::{OverdueMark, OverdueReentryPolicy, Task, start_of_today, sweep_overdue},
    ports::{TaskFilter, TaskMessageRepository, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Default pause between periodic sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// Counts produced by one sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Tasks moved to `overdue` and persisted.
    pub marked: usize,
    /// Tasks whose update failed and were left as loaded.
    pub failed: usize,
}

/// Post-sweep task list returned by [`OverdueSweeper::refresh`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshedTasks {
    /// Tasks in repository order, with persisted overdue marks applied.
    pub tasks: Vec<Task>,
    /// Counts for the sweep that ran during the refresh.
    pub report: SweepReport,
}

/// Errors that abort a sweep pass.
///
/// Failures on individual tasks never abort a pass; they are counted in
/// [`SweepReport::failed`].
#[derive(Debug, Error)]
pub enum SweepError {
    /// Loading tasks failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for sweep operations.
pub type SweepResult<T> = Result<T, SweepError>;

/// Reclassifies tasks whose deadline passed before the current local day.
#[derive(Clone)]
pub struct OverdueSweeper<R, M, C>
where
    R: TaskRepository,
    M: TaskMessageRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    messages: Arc<M>,
    clock: Arc<C>,
    policy: OverdueReentryPolicy,
    interval: Duration,
}

impl<R, M, C> OverdueSweeper<R, M, C>
where
    R: TaskRepository,
    M: TaskMessageRepository,
    C: Clock + Send + Sync,
{
    /// Creates a sweeper with the default policy and interval.
    #[must_use]
    pub fn new(repository: Arc<R>, messages: Arc<M>, clock: Arc<C>) -> Self {
        Self {
            repository,
            messages,
            clock,
            policy: OverdueReentryPolicy::default(),
            interval: DEFAULT_SWEEP_INTERVAL,
        }
    }

    /// Sets the re-entry policy for reopened overdue tasks.
    #[must_use]
    pub const fn with_policy(mut self, policy: OverdueReentryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the pause between periodic sweeps.
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Returns the configured re-entry policy.
    #[must_use]
    pub const fn policy(&self) -> OverdueReentryPolicy {
        self.policy
    }

    /// Sweeps every stored task once.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::Repository`] when the task list cannot be
    /// loaded.
    pub async fn run_once(&self) -> SweepResult<SweepReport> {
        Ok(self.refresh(&TaskFilter::all()).await?.report)
    }

    /// Loads the filtered task list, sweeps it, and returns the result.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::Repository`] when the task list cannot be
    /// loaded.
    pub async fn refresh(&self, filter: &TaskFilter) -> SweepResult<RefreshedTasks> {
        let mut tasks = self.repository.list(filter).await?;
        let start = start_of_today(&*self.clock);
        let marks = sweep_overdue(&tasks, start, self.policy, &*self.clock);

        let mut report = SweepReport::default();
        for mark in marks {
            let OverdueMark { task, notice } = mark;
            let task_id = task.id();
            if let Err(err) = self.repository.update(&task).await {
                error!(%task_id, %err, "failed to mark task overdue; skipping");
                report.failed += 1;
                continue;
            }
            if let Err(err) = self.messages.append(&notice).await {
                error!(%task_id, %err, "failed to post overdue notice");
            }
            info!(%task_id, deadline = %task.deadline(), "task marked overdue");
            if let Some(slot) = tasks.iter_mut().find(|loaded| loaded.id() == task_id) {
                *slot = task;
            }
            report.marked += 1;
        }

        debug!(marked = report.marked, failed = report.failed, "overdue sweep finished");
        Ok(RefreshedTasks { tasks, report })
    }

    /// Sweeps on every interval tick until `shutdown` resolves.
    ///
    /// The first sweep runs immediately. A pass that cannot load tasks is
    /// logged and retried on the next tick.
    pub async fn run_periodic<F>(&self, shutdown: F)
    where
        F: Future<Output = ()> + Send,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("overdue sweeper stopping");
                    break;
                }
                _ = ticker.tick() => {
                    match self.run_once().await {
                        Ok(report) if report.failed > 0 => {
                            warn!(marked = report.marked, failed = report.failed, "overdue sweep incomplete");
                        }
                        Ok(_) => {}
                        Err(err) => error!(%err, "overdue sweep failed"),
                    }
                }
            }
        }
    }
}
