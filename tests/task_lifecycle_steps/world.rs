//! Shared world state for task lifecycle BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use poruchenie::organization::{
    adapters::memory::InMemoryDirectory,
    domain::{DepartmentId, UserId},
};
use poruchenie::task::{
    adapters::memory::{InMemoryMessageRepository, InMemoryTaskRepository},
    domain::{OverdueReentryPolicy, Task},
    services::{
        OverdueSweeper, SweepReport, TaskLifecycleError, TaskLifecycleService,
    },
};
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestTaskService = TaskLifecycleService<
    InMemoryTaskRepository,
    InMemoryMessageRepository,
    InMemoryDirectory,
    DefaultClock,
>;

/// Scenario world for task lifecycle behaviour tests.
pub struct LifecycleWorld {
    pub service: TestTaskService,
    pub directory: Arc<InMemoryDirectory>,
    pub tasks: Arc<InMemoryTaskRepository>,
    pub messages: Arc<InMemoryMessageRepository>,
    pub policy: OverdueReentryPolicy,
    pub department: DepartmentId,
    pub creator: UserId,
    pub assignee: UserId,
    pub colleague: UserId,
    pub outsider: UserId,
    pub current_task: Option<Task>,
    pub reassigned_task: Option<Task>,
    pub last_result: Option<Result<Task, TaskLifecycleError>>,
    pub last_sweep: Option<SweepReport>,
}

impl LifecycleWorld {
    /// Creates a world with an empty directory and fresh identities.
    #[must_use]
    pub fn new() -> Self {
        let directory = Arc::new(InMemoryDirectory::new());
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let messages = Arc::new(InMemoryMessageRepository::new());
        let service = TaskLifecycleService::new(
            Arc::clone(&tasks),
            Arc::clone(&messages),
            Arc::clone(&directory),
            Arc::new(DefaultClock),
        );

        Self {
            service,
            directory,
            tasks,
            messages,
            policy: OverdueReentryPolicy::default(),
            department: DepartmentId::new(),
            creator: UserId::new(),
            assignee: UserId::new(),
            colleague: UserId::new(),
            outsider: UserId::new(),
            current_task: None,
            reassigned_task: None,
            last_result: None,
            last_sweep: None,
        }
    }

    /// Resolves a scenario role name to its user.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown role names.
    pub fn user(&self, role: &str) -> Result<UserId, eyre::Report> {
        match role {
            "creator" => Ok(self.creator),
            "assignee" => Ok(self.assignee),
            "colleague" => Ok(self.colleague),
            "outsider" => Ok(self.outsider),
            other => Err(eyre::eyre!("unknown scenario role: {other}")),
        }
    }

    /// Returns the task the scenario is working on.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has been created yet.
    pub fn current_task(&self) -> Result<&Task, eyre::Report> {
        self.current_task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing current task in scenario world"))
    }

    /// Builds a sweeper over the world's repositories.
    #[must_use]
    pub fn sweeper(
        &self,
    ) -> OverdueSweeper<InMemoryTaskRepository, InMemoryMessageRepository, DefaultClock> {
        OverdueSweeper::new(
            Arc::clone(&self.tasks),
            Arc::clone(&self.messages),
            Arc::new(DefaultClock),
        )
        .with_policy(self.policy)
    }
}

impl Default for LifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> LifecycleWorld {
    LifecycleWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
