//! Given steps for sync run BDD scenarios.

use super::world::SyncWorld;
use eyre::WrapErr;
use habitifocus::sync::{
    domain::{ActionKind, Alias, LocalTask, RemoteTask},
    ports::RemoteTaskStoreError,
};
use rstest_bdd_macros::given;

fn parse_alias(raw: String) -> Result<Alias, eyre::Report> {
    Alias::new(raw).wrap_err("construct scenario alias")
}

fn parse_state(state: &str, done_word: &str) -> Result<bool, eyre::Report> {
    match state {
        "open" => Ok(false),
        other if other == done_word => Ok(true),
        other => Err(eyre::eyre!("unknown task state {other:?}")),
    }
}

#[given(r#"a local task "{alias}" that is {state}"#)]
fn local_task(world: &mut SyncWorld, alias: String, state: String) -> Result<(), eyre::Report> {
    let done = parse_state(&state, "done")?;
    let task = LocalTask::new(parse_alias(alias)?, "scenario task", done);
    world.local_tasks.push(task);
    world.local.replace_tasks(world.local_tasks.clone());
    Ok(())
}

#[given(r#"a repeating local task "{alias}""#)]
fn repeating_local_task(world: &mut SyncWorld, alias: String) -> Result<(), eyre::Report> {
    let task = LocalTask::new(parse_alias(alias)?, "repeating task", false).with_repeating(true);
    world.local_tasks.push(task);
    world.local.replace_tasks(world.local_tasks.clone());
    Ok(())
}

#[given(r#"a remote todo "{alias}" that is {state}"#)]
fn remote_todo(world: &mut SyncWorld, alias: String, state: String) -> Result<(), eyre::Report> {
    let completed = parse_state(&state, "completed")?;
    let todo = RemoteTask::new(parse_alias(alias)?, "scenario todo", completed);
    world.remote_todos.push(todo);
    world.remote.replace_todos(world.remote_todos.clone());
    Ok(())
}

#[given(r#"the remote store rejects {action} for "{alias}""#)]
fn remote_rejects(world: &mut SyncWorld, action: String, alias: String) -> Result<(), eyre::Report> {
    let kind = ActionKind::PASS_ORDER
        .into_iter()
        .find(|candidate| candidate.as_str() == action)
        .ok_or_else(|| eyre::eyre!("unknown action {action:?}"))?;
    world.remote.fail_on(
        kind,
        parse_alias(alias)?,
        RemoteTaskStoreError::Status {
            status: 500,
            body: "scenario failure".to_owned(),
        },
    );
    Ok(())
}
