//! When steps for task lifecycle BDD scenarios.

use super::world::{LifecycleWorld, run_async};
use eyre::WrapErr;
use poruchenie::task::services::ReassignTaskRequest;
use rstest_bdd_macros::when;

#[when("the {role} advances the task")]
fn advance_task(world: &mut LifecycleWorld, role: String) -> Result<(), eyre::Report> {
    let actor = world.user(&role)?;
    let task_id = world.current_task()?.id();

    let result = run_async(world.service.advance_task(task_id, actor));
    if let Ok(ref updated) = result {
        world.current_task = Some(updated.clone());
    }
    world.last_result = Some(result);
    Ok(())
}

#[when("the overdue sweep runs")]
fn run_sweep(world: &mut LifecycleWorld) -> Result<(), eyre::Report> {
    let report = run_async(world.sweeper().run_once()).wrap_err("run overdue sweep")?;
    world.last_sweep = Some(report);
    Ok(())
}

#[when("the {role} reassigns the task to the {target}")]
fn reassign_task(
    world: &mut LifecycleWorld,
    role: String,
    target: String,
) -> Result<(), eyre::Report> {
    let actor = world.user(&role)?;
    let new_assignee = world.user(&target)?;
    let task_id = world.current_task()?.id();

    let result = run_async(
        world
            .service
            .reassign_task(ReassignTaskRequest::new(task_id, actor, new_assignee)),
    );
    if let Ok(ref child) = result {
        world.reassigned_task = Some(child.clone());
    }
    world.last_result = Some(result);
    Ok(())
}
