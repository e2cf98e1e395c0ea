//! Shared test helpers for in-memory task integration tests.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::DefaultClock;
use poruchenie::organization::{
    adapters::memory::InMemoryDirectory,
    domain::{Department, DepartmentId, User, UserId},
};
use poruchenie::task::{
    adapters::memory::{InMemoryMessageRepository, InMemoryTaskRepository},
    domain::{Task, TaskDraft},
    services::{CreateTaskRequest, OverdueSweeper, TaskLifecycleService},
};
use rstest::fixture;

/// Lifecycle service wired to in-memory adapters.
pub type TestService = TaskLifecycleService<
    InMemoryTaskRepository,
    InMemoryMessageRepository,
    InMemoryDirectory,
    DefaultClock,
>;

/// Overdue sweeper wired to in-memory adapters.
pub type TestSweeper =
    OverdueSweeper<InMemoryTaskRepository, InMemoryMessageRepository, DefaultClock>;

/// One department and the people around it.
///
/// `director` created the department, `head` manages it, `clerk` and
/// `colleague` are members, and `outsider` belongs nowhere.
pub struct Office {
    pub director: User,
    pub head: User,
    pub clerk: User,
    pub colleague: User,
    pub outsider: User,
    pub department: Department,
}

/// Services and repositories sharing one in-memory store.
pub struct Tracker {
    pub office: Office,
    pub tasks: Arc<InMemoryTaskRepository>,
    pub messages: Arc<InMemoryMessageRepository>,
    pub service: TestService,
}

impl Tracker {
    /// Builds a sweeper over the tracker's repositories.
    #[must_use]
    pub fn sweeper(&self) -> TestSweeper {
        OverdueSweeper::new(
            Arc::clone(&self.tasks),
            Arc::clone(&self.messages),
            Arc::new(DefaultClock),
        )
    }

    /// Creates a task from the director to the clerk.
    ///
    /// # Panics
    ///
    /// Panics when creation fails.
    pub async fn assign_to_clerk(&self, title: &str, deadline: DateTime<Utc>) -> Task {
        let request = CreateTaskRequest::single(
            self.office.director.id,
            draft_due(title, deadline),
            Some(self.office.department.id),
            Some(self.office.clerk.id),
        );
        self.service
            .create_task(request)
            .await
            .expect("task creation should succeed")
            .into_iter()
            .next()
            .expect("one task created")
    }
}

/// Provides the seeded office.
#[fixture]
pub fn office() -> Office {
    let director = User::new(UserId::new(), "Анна Руденко", "rudenko@example.org");
    let head = User::new(UserId::new(), "Борис Кравец", "kravets@example.org");
    let department =
        Department::new(DepartmentId::new(), "Канцелярия", director.id).managed_by(head.id);
    let head = head.in_department(department.id);
    let clerk = User::new(UserId::new(), "Вера Ильина", "ilina@example.org")
        .in_department(department.id)
        .reporting_to(head.id);
    let colleague = User::new(UserId::new(), "Григорий Лунин", "lunin@example.org")
        .in_department(department.id);
    let outsider = User::new(UserId::new(), "Дарья Мухина", "mukhina@example.org");
    Office {
        director,
        head,
        clerk,
        colleague,
        outsider,
        department,
    }
}

/// Provides a tracker whose directory holds the office.
#[fixture]
pub fn tracker(office: Office) -> Tracker {
    let directory = InMemoryDirectory::new();
    for user in [
        &office.director,
        &office.head,
        &office.clerk,
        &office.colleague,
        &office.outsider,
    ] {
        directory.insert_user(user.clone()).expect("seed user");
    }
    directory
        .insert_department(office.department.clone())
        .expect("seed department");

    let tasks = Arc::new(InMemoryTaskRepository::new());
    let messages = Arc::new(InMemoryMessageRepository::new());
    let service = TaskLifecycleService::new(
        Arc::clone(&tasks),
        Arc::clone(&messages),
        Arc::new(directory),
        Arc::new(DefaultClock),
    );
    Tracker {
        office,
        tasks,
        messages,
        service,
    }
}

/// Builds a complete draft due at `deadline`.
#[must_use]
pub fn draft_due(title: &str, deadline: DateTime<Utc>) -> TaskDraft {
    TaskDraft::new(title, "Подготовить и согласовать документы").with_deadline(deadline)
}
