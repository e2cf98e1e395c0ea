//! In-memory integration tests for task lifecycle operations.

use super::helpers::{Tracker, draft_due, tracker};
use chrono::{Duration, Utc};
use poruchenie::task::{
    domain::{TaskDomainError, TaskStatus, TransitionActor},
    ports::{TaskFilter, TaskRepository},
    services::{CreateTaskRequest, ReassignTaskRequest, TaskLifecycleError, ViewReceipt},
};
use rstest::rstest;

fn next_week() -> chrono::DateTime<Utc> {
    Utc::now() + Duration::days(7)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_walks_from_new_to_completed(tracker: Tracker) {
    let office = &tracker.office;
    let task = tracker.assign_to_clerk("Годовой отчёт", next_week()).await;

    tracker
        .service
        .advance_task(task.id(), office.clerk.id)
        .await
        .expect("clerk starts");
    tracker
        .service
        .advance_task(task.id(), office.clerk.id)
        .await
        .expect("clerk submits");
    let done = tracker
        .service
        .advance_task(task.id(), office.director.id)
        .await
        .expect("director accepts");

    assert_eq!(done.status(), TaskStatus::Completed);
    let actors: Vec<_> = done.history().iter().map(|change| change.actor).collect();
    assert_eq!(
        actors,
        [
            TransitionActor::Assignee,
            TransitionActor::Assignee,
            TransitionActor::Creator,
        ]
    );
    let stored = tracker
        .service
        .find_task(task.id())
        .await
        .expect("lookup")
        .expect("task exists");
    assert_eq!(stored, done);
    let messages = tracker
        .service
        .list_messages(task.id())
        .await
        .expect("list messages");
    assert!(messages.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assignee_cannot_accept_own_submission(tracker: Tracker) {
    let clerk = tracker.office.clerk.id;
    let task = tracker.assign_to_clerk("Сверка кассы", next_week()).await;
    for _ in 0..2 {
        tracker
            .service
            .advance_task(task.id(), clerk)
            .await
            .expect("clerk advances");
    }

    let result = tracker.service.advance_task(task.id(), clerk).await;

    assert!(matches!(
        result,
        Err(TaskLifecycleError::Domain(
            TaskDomainError::InsufficientPrivileges(_)
        ))
    ));
    let stored = tracker
        .tasks
        .find_by_id(task.id())
        .await
        .expect("lookup")
        .expect("task exists");
    assert_eq!(stored.status(), TaskStatus::OnVerification);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn only_the_assignee_may_start(tracker: Tracker) {
    let task = tracker.assign_to_clerk("Опись архива", next_week()).await;

    let err = tracker
        .service
        .advance_task(task.id(), tracker.office.outsider.id)
        .await
        .expect_err("outsider rejected");

    assert_eq!(err.to_string(), "only the assignee may start a task");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn creation_without_assignee_stores_nothing(tracker: Tracker) {
    let request = CreateTaskRequest::single(
        tracker.office.director.id,
        draft_due("Без исполнителя", next_week()),
        Some(tracker.office.department.id),
        None,
    );

    let err = tracker
        .service
        .create_task(request)
        .await
        .expect_err("assignee required");

    assert_eq!(err.to_string(), "missing required fields: assignee");
    let all = tracker
        .service
        .list_tasks(&TaskFilter::all())
        .await
        .expect("list");
    assert!(all.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplication_creates_one_task_per_department_member(tracker: Tracker) {
    let office = &tracker.office;
    let request = CreateTaskRequest::duplicate(
        office.director.id,
        draft_due("Инструктаж по охране труда", next_week()),
        [office.department.id],
        [office.clerk.id, office.colleague.id, office.head.id],
    );

    let created = tracker
        .service
        .create_task(request)
        .await
        .expect("duplication succeeds");

    let assignees: Vec<_> = created.iter().map(|task| task.assigned_to()).collect();
    assert_eq!(assignees, [office.clerk.id, office.colleague.id, office.head.id]);
    assert!(
        created
            .iter()
            .all(|task| task.department_id() == office.department.id)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn manager_reassignment_spawns_child_task(tracker: Tracker) {
    let office = &tracker.office;
    let task = tracker.assign_to_clerk("Проверка договоров", next_week()).await;

    let child = tracker
        .service
        .reassign_task(ReassignTaskRequest::new(
            task.id(),
            office.head.id,
            office.colleague.id,
        ))
        .await
        .expect("manager may reassign");

    assert_eq!(child.parent_id(), Some(task.id()));
    assert_eq!(child.assigned_to(), office.colleague.id);
    assert_eq!(child.title(), "[Переназначено] Проверка договоров");
    let original = tracker
        .service
        .find_task(task.id())
        .await
        .expect("lookup")
        .expect("original kept");
    assert_eq!(original, task);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn outsider_reassignment_is_rejected(tracker: Tracker) {
    let office = &tracker.office;
    let task = tracker.assign_to_clerk("Проверка договоров", next_week()).await;

    let err = tracker
        .service
        .reassign_task(ReassignTaskRequest::new(
            task.id(),
            office.outsider.id,
            office.colleague.id,
        ))
        .await
        .expect_err("outsider rejected");

    assert_eq!(
        err.to_string(),
        "insufficient privileges to reassign to the selected employee"
    );
    let all = tracker
        .service
        .list_tasks(&TaskFilter::all())
        .await
        .expect("list");
    assert_eq!(all.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn viewing_clears_unread_task_and_messages_once(tracker: Tracker) {
    let office = &tracker.office;
    let task = tracker.assign_to_clerk("Подписать акты", next_week()).await;
    tracker
        .service
        .post_message(task.id(), office.director.id, "Акты в приёмной")
        .await
        .expect("director posts");

    let first = tracker
        .service
        .mark_viewed(task.id(), office.clerk.id)
        .await
        .expect("clerk views");
    let second = tracker
        .service
        .mark_viewed(task.id(), office.clerk.id)
        .await
        .expect("clerk views again");

    assert_eq!(
        first,
        ViewReceipt {
            task_cleared: true,
            messages_read: 1,
        }
    );
    assert_eq!(second, ViewReceipt::default());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn outsider_cannot_post_messages(tracker: Tracker) {
    let task = tracker.assign_to_clerk("Подписать акты", next_week()).await;

    let result = tracker
        .service
        .post_message(task.id(), tracker.office.outsider.id, "Можно мне?")
        .await;

    assert!(matches!(
        result,
        Err(TaskLifecycleError::Domain(TaskDomainError::NotAParticipant(_)))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_task_removes_its_messages(tracker: Tracker) {
    let office = &tracker.office;
    let task = tracker.assign_to_clerk("Черновик приказа", next_week()).await;
    tracker
        .service
        .post_message(task.id(), office.clerk.id, "Черновик готов")
        .await
        .expect("clerk posts");

    tracker
        .service
        .delete_task(task.id())
        .await
        .expect("delete succeeds");

    assert_eq!(
        tracker.service.find_task(task.id()).await.expect("lookup"),
        None
    );
    let messages = tracker
        .service
        .list_messages(task.id())
        .await
        .expect("list messages");
    assert!(messages.is_empty());
    assert!(matches!(
        tracker.service.delete_task(task.id()).await,
        Err(TaskLifecycleError::TaskNotFound(_))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_by_participant_excludes_unrelated_users(tracker: Tracker) {
    let office = &tracker.office;
    let task = tracker.assign_to_clerk("График отпусков", next_week()).await;

    let for_clerk = tracker
        .service
        .list_tasks(&TaskFilter::all().involving(office.clerk.id))
        .await
        .expect("list");
    let for_outsider = tracker
        .service
        .list_tasks(&TaskFilter::all().involving(office.outsider.id))
        .await
        .expect("list");

    assert_eq!(for_clerk, [task]);
    assert!(for_outsider.is_empty());
}
