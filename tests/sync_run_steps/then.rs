//! Then steps for sync run BDD scenarios.

use super::world::SyncWorld;
use habitifocus::sync::{domain::AliasedTask, services::SyncError};
use rstest_bdd_macros::then;

#[then("the sync succeeds")]
fn sync_succeeds(world: &SyncWorld) -> Result<(), eyre::Report> {
    for (index, run) in world.runs.iter().enumerate() {
        if let Err(err) = run {
            return Err(eyre::eyre!("run {} failed: {err}", index + 1));
        }
    }
    eyre::ensure!(!world.runs.is_empty(), "no sync run recorded");
    Ok(())
}

#[then(r#"the sync fails on {action} for "{alias}""#)]
fn sync_fails_on(world: &SyncWorld, action: String, alias: String) -> Result<(), eyre::Report> {
    let Err(SyncError::Action(failure)) = world.last_run()? else {
        return Err(eyre::eyre!("expected the last run to stop on an action failure"));
    };
    eyre::ensure!(
        failure.action().as_str() == action,
        "expected {action} failure, found {}",
        failure.action()
    );
    eyre::ensure!(
        failure.alias().as_str() == alias,
        "expected failure for {alias}, found {}",
        failure.alias()
    );
    Ok(())
}

#[then(r#"the remote todo "{alias}" is {state}"#)]
fn remote_todo_state(world: &SyncWorld, alias: String, state: String) -> Result<(), eyre::Report> {
    let expected = match state.as_str() {
        "open" => false,
        "completed" => true,
        other => return Err(eyre::eyre!("unknown todo state {other:?}")),
    };
    let todo = world
        .remote
        .todos()
        .into_iter()
        .find(|todo| todo.alias().as_str() == alias)
        .ok_or_else(|| eyre::eyre!("no remote todo {alias}"))?;
    eyre::ensure!(
        todo.is_completed() == expected,
        "remote todo {alias} is not {state}"
    );
    Ok(())
}

#[then(r#"there is no remote todo "{alias}""#)]
fn no_remote_todo(world: &SyncWorld, alias: String) -> Result<(), eyre::Report> {
    let present = world
        .remote
        .todos()
        .iter()
        .any(|todo| todo.alias().as_str() == alias);
    eyre::ensure!(!present, "remote todo {alias} should not exist");
    Ok(())
}

#[then("the remote store received {count:usize} calls")]
fn remote_call_count(world: &SyncWorld, count: usize) -> Result<(), eyre::Report> {
    let calls = world.remote.calls();
    eyre::ensure!(
        calls.len() == count,
        "expected {count} remote calls, found {}",
        calls.len()
    );
    Ok(())
}

#[then("the last run planned {count:usize} actions")]
fn last_run_planned(world: &SyncWorld, count: usize) -> Result<(), eyre::Report> {
    let report = world
        .last_run()?
        .as_ref()
        .map_err(|err| eyre::eyre!("last run failed: {err}"))?;
    eyre::ensure!(
        report.planned() == count,
        "expected {count} planned actions, found {}",
        report.planned()
    );
    Ok(())
}
