//! Fail-stop tests: a failure at any position halts the run there.

use crate::in_memory::helpers::{Fixture, alias, runtime};
use habitifocus::sync::{
    domain::{ActionKind, AliasedTask, LocalTask, RemoteTask, SyncAction},
    ports::RemoteTaskStoreError,
    services::SyncError,
};
use rstest::rstest;
use std::io;
use tokio::runtime::Runtime;

/// Two creates, two completes and two deletes, in that execution order.
fn six_action_fixture() -> eyre::Result<Fixture> {
    let local_tasks = vec![
        LocalTask::new(alias("c1")?, "create one", false),
        LocalTask::new(alias("c2")?, "create two", false),
        LocalTask::new(alias("k1")?, "complete one", true),
        LocalTask::new(alias("k2")?, "complete two", true),
    ];
    let remote_todos = vec![
        RemoteTask::new(alias("k1")?, "complete one", false),
        RemoteTask::new(alias("k2")?, "complete two", false),
        RemoteTask::new(alias("x1")?, "delete one", false),
        RemoteTask::new(alias("x2")?, "delete two", true),
    ];
    Ok(Fixture::new(local_tasks, remote_todos))
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(4)]
#[case(5)]
fn failure_at_position_k_stops_after_k(
    runtime: io::Result<Runtime>,
    #[case] k: usize,
) -> eyre::Result<()> {
    let rt = runtime?;
    let fixture = six_action_fixture()?;
    let plan = rt.block_on(fixture.reconciler.plan())?;
    let actions = plan.actions();
    eyre::ensure!(actions.len() == 6, "expected six actions, got {actions:?}");
    let target = actions
        .get(k)
        .ok_or_else(|| eyre::eyre!("no action at position {k}"))?
        .clone();
    fixture.remote.fail_on(
        target.kind(),
        target.alias().clone(),
        RemoteTaskStoreError::Status {
            status: 429,
            body: "rate limited".to_owned(),
        },
    );

    let result = rt.block_on(fixture.reconciler.run());

    let Err(SyncError::Action(failure)) = result else {
        return Err(eyre::eyre!("expected action failure, got {result:?}"));
    };
    eyre::ensure!(failure.alias() == target.alias(), "wrong alias {}", failure.alias());
    eyre::ensure!(failure.action() == target.kind(), "wrong action {}", failure.action());
    let calls = fixture.remote.calls();
    eyre::ensure!(
        calls == actions.iter().take(k + 1).cloned().collect::<Vec<SyncAction>>(),
        "calls after failure at {k}: {calls:?}"
    );
    Ok(())
}

#[rstest]
fn applied_actions_are_not_rolled_back(runtime: io::Result<Runtime>) -> eyre::Result<()> {
    let rt = runtime?;
    let fixture = six_action_fixture()?;
    fixture.remote.fail_on(
        ActionKind::Delete,
        alias("x1")?,
        RemoteTaskStoreError::NotFound(alias("x1")?),
    );

    let result = rt.block_on(fixture.reconciler.run());
    eyre::ensure!(matches!(result, Err(SyncError::Action(_))), "run should fail");

    let todos = fixture.remote.todos();
    for id in ["c1", "c2"] {
        eyre::ensure!(
            todos.iter().any(|todo| todo.alias().as_str() == id),
            "{id} should have been created"
        );
    }
    for id in ["k1", "k2"] {
        eyre::ensure!(
            todos
                .iter()
                .any(|todo| todo.alias().as_str() == id && todo.is_completed()),
            "{id} should have been completed"
        );
    }
    eyre::ensure!(
        todos.iter().any(|todo| todo.alias().as_str() == "x2"),
        "x2 should not be attempted after x1 failed"
    );
    Ok(())
}

#[rstest]
fn fresh_run_after_failure_finishes_the_job(runtime: io::Result<Runtime>) -> eyre::Result<()> {
    let rt = runtime?;
    let failing = six_action_fixture()?;
    failing.remote.fail_on(
        ActionKind::Complete,
        alias("k1")?,
        RemoteTaskStoreError::Status {
            status: 502,
            body: "bad gateway".to_owned(),
        },
    );
    let first = rt.block_on(failing.reconciler.run());
    eyre::ensure!(first.is_err(), "first run should fail");

    let local_tasks = vec![
        LocalTask::new(alias("c1")?, "create one", false),
        LocalTask::new(alias("c2")?, "create two", false),
        LocalTask::new(alias("k1")?, "complete one", true),
        LocalTask::new(alias("k2")?, "complete two", true),
    ];
    let recovered = Fixture::new(local_tasks, failing.remote.todos());
    let report = rt.block_on(recovered.reconciler.run())?;

    eyre::ensure!(
        report.succeeded(ActionKind::Create) == 0,
        "creates already applied"
    );
    eyre::ensure!(report.succeeded(ActionKind::Complete) == 2, "completes pending");
    eyre::ensure!(report.succeeded(ActionKind::Delete) == 2, "deletes pending");
    let replan = rt.block_on(recovered.reconciler.plan())?;
    eyre::ensure!(replan.is_empty(), "remaining actions: {:?}", replan.actions());
    Ok(())
}
