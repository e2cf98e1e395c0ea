//! Given steps for task lifecycle BDD scenarios.

use super::world::{LifecycleWorld, run_async};
use chrono::{Duration, Utc};
use eyre::WrapErr;
use poruchenie::organization::domain::{Department, User};
use poruchenie::task::{
    domain::{OverdueReentryPolicy, TaskDraft},
    services::CreateTaskRequest,
};
use rstest_bdd_macros::given;

#[given("a department with a creator, an assignee, a colleague, and an outsider")]
fn seeded_department(world: &mut LifecycleWorld) -> Result<(), eyre::Report> {
    let department = Department::new(world.department, "Секретариат", world.creator);
    let users = [
        User::new(world.creator, "Елена Громова", "gromova@example.org"),
        User::new(world.assignee, "Жанна Титова", "titova@example.org")
            .in_department(world.department),
        User::new(world.colleague, "Захар Носов", "nosov@example.org")
            .in_department(world.department),
        User::new(world.outsider, "Илья Фролов", "frolov@example.org"),
    ];
    world
        .directory
        .insert_department(department)
        .wrap_err("seed department")?;
    for user in users {
        world.directory.insert_user(user).wrap_err("seed user")?;
    }
    Ok(())
}

#[given(r#"the overdue re-entry policy is "{policy}""#)]
fn reentry_policy(world: &mut LifecycleWorld, policy: String) -> Result<(), eyre::Report> {
    world.policy = OverdueReentryPolicy::try_from(policy.as_str())
        .map_err(|err| eyre::eyre!("invalid policy in scenario: {err}"))?;
    Ok(())
}

fn assign_task(world: &mut LifecycleWorld, offset: Duration) -> Result<(), eyre::Report> {
    let draft = TaskDraft::new("Подготовить протокол", "Разослать участникам совещания")
        .with_deadline(Utc::now() + offset);
    let request = CreateTaskRequest::single(
        world.creator,
        draft,
        Some(world.department),
        Some(world.assignee),
    );
    let created = run_async(world.service.create_task(request))
        .wrap_err("create task for lifecycle scenario")?;
    world.current_task = created.into_iter().next();
    Ok(())
}

#[given("the creator assigns a task due in {days:i64} days")]
fn task_due_in(world: &mut LifecycleWorld, days: i64) -> Result<(), eyre::Report> {
    assign_task(world, Duration::days(days))
}

#[given("the creator assigns a task due {days:i64} days ago")]
fn task_due_ago(world: &mut LifecycleWorld, days: i64) -> Result<(), eyre::Report> {
    assign_task(world, -Duration::days(days))
}

#[given("the {role} advances the task")]
fn task_already_advanced(world: &mut LifecycleWorld, role: String) -> Result<(), eyre::Report> {
    let actor = world.user(&role)?;
    let task_id = world.current_task()?.id();
    let advanced = run_async(world.service.advance_task(task_id, actor))
        .wrap_err("advance task in scenario setup")?;
    world.current_task = Some(advanced);
    Ok(())
}
