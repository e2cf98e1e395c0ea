//! In-memory integration tests for the overdue sweep.

use super::helpers::{Tracker, tracker};
use chrono::{Duration, Utc};
use mockable::DefaultClock;
use poruchenie::task::{
    domain::{OVERDUE_NOTICE, OverdueReentryPolicy, TaskStatus, TransitionActor, start_of_today},
    ports::TaskFilter,
    services::SweepReport,
};
use rstest::rstest;

fn two_days_ago() -> chrono::DateTime<Utc> {
    Utc::now() - Duration::days(2)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sweep_marks_stale_task_and_notifies_the_creator(tracker: Tracker) {
    let office = &tracker.office;
    let task = tracker.assign_to_clerk("Квартальная сверка", two_days_ago()).await;
    tracker
        .service
        .advance_task(task.id(), office.clerk.id)
        .await
        .expect("clerk starts");

    let report = tracker.sweeper().run_once().await.expect("sweep succeeds");

    assert_eq!(report, SweepReport { marked: 1, failed: 0 });
    let swept = tracker
        .service
        .find_task(task.id())
        .await
        .expect("lookup")
        .expect("task exists");
    assert_eq!(swept.status(), TaskStatus::Overdue);
    assert_eq!(
        swept.history().last().map(|change| change.actor),
        Some(TransitionActor::Sweep)
    );
    let notices = tracker
        .service
        .list_messages(task.id())
        .await
        .expect("list messages");
    assert_eq!(notices.len(), 1);
    let notice = notices.first().expect("one notice");
    assert!(notice.is_system());
    assert_eq!(notice.content(), OVERDUE_NOTICE);
    assert_eq!(notice.sender_id(), office.director.id);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_due_today_and_completed_tasks_are_left_alone(tracker: Tracker) {
    let office = &tracker.office;
    let due_today = tracker
        .assign_to_clerk("Сдать табель", start_of_today(&DefaultClock))
        .await;
    let finished = tracker.assign_to_clerk("Закрыть месяц", two_days_ago()).await;
    for actor in [office.clerk.id, office.clerk.id, office.director.id] {
        tracker
            .service
            .advance_task(finished.id(), actor)
            .await
            .expect("advance");
    }

    let report = tracker.sweeper().run_once().await.expect("sweep succeeds");

    assert_eq!(report, SweepReport::default());
    let statuses: Vec<_> = tracker
        .service
        .list_tasks(&TaskFilter::all())
        .await
        .expect("list")
        .into_iter()
        .map(|task| (task.id(), task.status()))
        .collect();
    assert!(statuses.contains(&(due_today.id(), TaskStatus::New)));
    assert!(statuses.contains(&(finished.id(), TaskStatus::Completed)));
}

#[rstest]
#[case(OverdueReentryPolicy::Resweep, TaskStatus::Overdue, 2)]
#[case(OverdueReentryPolicy::RespectManualOverride, TaskStatus::InProgress, 1)]
#[tokio::test(flavor = "multi_thread")]
async fn reopened_task_follows_reentry_policy(
    tracker: Tracker,
    #[case] policy: OverdueReentryPolicy,
    #[case] expected: TaskStatus,
    #[case] notices: usize,
) {
    let office = &tracker.office;
    let task = tracker.assign_to_clerk("Инвентаризация", two_days_ago()).await;
    let sweeper = tracker.sweeper().with_policy(policy);
    sweeper.run_once().await.expect("first sweep");
    tracker
        .service
        .advance_task(task.id(), office.director.id)
        .await
        .expect("creator reopens");

    sweeper.run_once().await.expect("second sweep");

    let stored = tracker
        .service
        .find_task(task.id())
        .await
        .expect("lookup")
        .expect("task exists");
    assert_eq!(stored.status(), expected);
    let posted = tracker
        .service
        .list_messages(task.id())
        .await
        .expect("list messages");
    assert_eq!(posted.len(), notices);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moving_the_deadline_keeps_a_resumed_task_out_of_overdue(tracker: Tracker) {
    let office = &tracker.office;
    let task = tracker.assign_to_clerk("Отчёт в налоговую", two_days_ago()).await;
    let sweeper = tracker.sweeper();
    sweeper.run_once().await.expect("first sweep");
    tracker
        .service
        .update_deadline(task.id(), office.director.id, Utc::now() + Duration::days(3))
        .await
        .expect("creator moves deadline");
    let overdue = tracker
        .service
        .find_task(task.id())
        .await
        .expect("lookup")
        .expect("task exists");
    assert_eq!(overdue.status(), TaskStatus::Overdue);
    tracker
        .service
        .advance_task(task.id(), office.director.id)
        .await
        .expect("creator resumes");

    let report = sweeper.run_once().await.expect("second sweep");

    assert_eq!(report.marked, 0);
    let stored = tracker
        .service
        .find_task(task.id())
        .await
        .expect("lookup")
        .expect("task exists");
    assert_eq!(stored.status(), TaskStatus::InProgress);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn refresh_sweeps_then_returns_the_users_tasks(tracker: Tracker) {
    let office = &tracker.office;
    let task = tracker.assign_to_clerk("Сверка с банком", two_days_ago()).await;

    let refreshed = tracker
        .sweeper()
        .refresh(&TaskFilter::all().involving(office.clerk.id))
        .await
        .expect("refresh succeeds");

    assert_eq!(refreshed.report.marked, 1);
    let listed: Vec<_> = refreshed
        .tasks
        .iter()
        .map(|listed| (listed.id(), listed.status()))
        .collect();
    assert_eq!(listed, [(task.id(), TaskStatus::Overdue)]);
}
