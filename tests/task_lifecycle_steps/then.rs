//! Then steps for task lifecycle BDD scenarios.

use super::world::{LifecycleWorld, run_async};
use eyre::WrapErr;
use poruchenie::task::{
    domain::{TaskStatus, TransitionActor},
    ports::TaskFilter,
};
use rstest_bdd_macros::then;

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &LifecycleWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task_id = world.current_task()?.id();

    let stored = run_async(world.service.find_task(task_id))
        .wrap_err("look up task")?
        .ok_or_else(|| eyre::eyre!("task {task_id} missing from repository"))?;

    if stored.status() != expected {
        return Err(eyre::eyre!(
            "expected status {}, found {}",
            expected.as_str(),
            stored.status().as_str()
        ));
    }
    Ok(())
}

#[then("the history records {assignee:usize} assignee and {creator:usize} creator transitions")]
fn history_counts(
    world: &LifecycleWorld,
    assignee: usize,
    creator: usize,
) -> Result<(), eyre::Report> {
    let history = world.current_task()?.history();
    let count = |actor: TransitionActor| {
        history
            .iter()
            .filter(|change| change.actor == actor)
            .count()
    };

    eyre::ensure!(
        count(TransitionActor::Assignee) == assignee,
        "expected {assignee} assignee transitions in {history:?}"
    );
    eyre::ensure!(
        count(TransitionActor::Creator) == creator,
        "expected {creator} creator transitions in {history:?}"
    );
    Ok(())
}

#[then("the task has {expected:usize} system messages")]
fn system_message_count(world: &LifecycleWorld, expected: usize) -> Result<(), eyre::Report> {
    let task_id = world.current_task()?.id();
    let messages =
        run_async(world.service.list_messages(task_id)).wrap_err("list task messages")?;
    let system = messages.iter().filter(|message| message.is_system()).count();

    eyre::ensure!(
        system == expected,
        "expected {expected} system messages, found {system}"
    );
    Ok(())
}

#[then(r#"the request is rejected with "{reason}""#)]
fn request_rejected(world: &LifecycleWorld, reason: String) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing request result"))?;

    match result {
        Err(err) if err.to_string() == reason => Ok(()),
        other => Err(eyre::eyre!("expected rejection \"{reason}\", got {other:?}")),
    }
}

#[then("the sweep marked {expected:usize} tasks")]
fn sweep_marked(world: &LifecycleWorld, expected: usize) -> Result<(), eyre::Report> {
    let report = world
        .last_sweep
        .ok_or_else(|| eyre::eyre!("missing sweep report"))?;

    eyre::ensure!(
        report.marked == expected,
        "expected {expected} marked tasks, got {report:?}"
    );
    Ok(())
}

#[then("the department has {expected:usize} tasks")]
fn department_task_count(world: &LifecycleWorld, expected: usize) -> Result<(), eyre::Report> {
    let listed = run_async(
        world
            .service
            .list_tasks(&TaskFilter::all().in_departments([world.department])),
    )
    .wrap_err("list department tasks")?;

    eyre::ensure!(
        listed.len() == expected,
        "expected {expected} tasks, found {}",
        listed.len()
    );
    Ok(())
}

#[then("the new task is assigned to the {role}")]
fn new_task_assignee(world: &LifecycleWorld, role: String) -> Result<(), eyre::Report> {
    let expected = world.user(&role)?;
    let child = world
        .reassigned_task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing reassigned task"))?;

    eyre::ensure!(child.assigned_to() == expected, "unexpected assignee");
    eyre::ensure!(
        child.parent_id() == Some(world.current_task()?.id()),
        "reassigned task is not linked to its parent"
    );
    Ok(())
}
