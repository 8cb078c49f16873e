//! Convergence and idempotence tests over every per-alias state pairing.
//!
//! Each alias in a scenario takes one local state and one remote state, so
//! a single run covers all twelve pairings at once.

use crate::in_memory::helpers::{
    Fixture, LocalState, RemoteState, local_task, remote_todo, runtime,
};
use habitifocus::sync::{
    domain::{ActionKind, AliasedTask, SyncAction},
    ports::LocalTaskSource,
};
use rstest::rstest;
use std::io;
use tokio::runtime::Runtime;

struct Pairing {
    id: String,
    local: LocalState,
    remote: RemoteState,
}

fn all_pairings() -> Vec<Pairing> {
    LocalState::ALL
        .into_iter()
        .flat_map(|local| {
            RemoteState::ALL.into_iter().map(move |remote| Pairing {
                id: format!("{local:?}-{remote:?}").to_lowercase(),
                local,
                remote,
            })
        })
        .collect()
}

fn fixture_for(pairings: &[Pairing]) -> eyre::Result<Fixture> {
    let mut local_tasks = Vec::new();
    let mut remote_todos = Vec::new();
    for pairing in pairings {
        local_tasks.extend(local_task(&pairing.id, pairing.local)?);
        remote_todos.extend(remote_todo(&pairing.id, pairing.remote)?);
    }
    Ok(Fixture::new(local_tasks, remote_todos))
}

/// The single action each pairing calls for, if any.
const fn expected_action(local: LocalState, remote: RemoteState) -> Option<ActionKind> {
    match (local, remote) {
        (LocalState::Open, RemoteState::Absent) => Some(ActionKind::Create),
        (LocalState::Done, RemoteState::Open) => Some(ActionKind::Complete),
        (LocalState::Absent | LocalState::Repeating, RemoteState::Open | RemoteState::Completed) => {
            Some(ActionKind::Delete)
        }
        _ => None,
    }
}

#[rstest]
fn each_pairing_yields_its_expected_action(runtime: io::Result<Runtime>) -> eyre::Result<()> {
    let rt = runtime?;
    let pairings = all_pairings();
    let fixture = fixture_for(&pairings)?;

    let plan = rt.block_on(fixture.reconciler.plan())?;
    let actions = plan.actions();

    for pairing in &pairings {
        let found: Vec<&SyncAction> = actions
            .iter()
            .filter(|action| action.alias().as_str() == pairing.id)
            .collect();
        let expected = expected_action(pairing.local, pairing.remote);
        eyre::ensure!(
            found.iter().map(|action| action.kind()).collect::<Vec<_>>()
                == expected.into_iter().collect::<Vec<_>>(),
            "{}: expected {expected:?}, planned {found:?}",
            pairing.id
        );
    }
    Ok(())
}

#[rstest]
fn successful_run_mirrors_local_state(runtime: io::Result<Runtime>) -> eyre::Result<()> {
    let rt = runtime?;
    let pairings = all_pairings();
    let fixture = fixture_for(&pairings)?;

    rt.block_on(fixture.reconciler.run())?;
    let todos = fixture.remote.todos();

    for pairing in &pairings {
        let todo = todos
            .iter()
            .find(|candidate| candidate.alias().as_str() == pairing.id);
        match (pairing.local, pairing.remote, todo) {
            (LocalState::Absent | LocalState::Repeating, _, found) => {
                eyre::ensure!(found.is_none(), "{} should be deleted", pairing.id);
            }
            (LocalState::Open, _, found) => {
                eyre::ensure!(found.is_some(), "{} should exist remotely", pairing.id);
            }
            (LocalState::Done, RemoteState::Absent, found) => {
                eyre::ensure!(found.is_none(), "{} should not be created", pairing.id);
            }
            (LocalState::Done, _, found) => {
                eyre::ensure!(
                    found.is_some_and(|completed| completed.is_completed()),
                    "{} should be completed",
                    pairing.id
                );
            }
        }
    }
    Ok(())
}

#[rstest]
fn second_run_plans_nothing(runtime: io::Result<Runtime>) -> eyre::Result<()> {
    let rt = runtime?;
    let fixture = fixture_for(&all_pairings())?;

    let first = rt.block_on(fixture.reconciler.run())?;
    let calls_after_first = fixture.remote.calls().len();
    let second = rt.block_on(fixture.reconciler.run())?;

    eyre::ensure!(first.planned() > 0, "first run should have work to do");
    eyre::ensure!(second.planned() == 0, "second run planned {}", second.planned());
    eyre::ensure!(
        fixture.remote.calls().len() == calls_after_first,
        "second run issued remote calls"
    );
    Ok(())
}

#[rstest]
fn run_never_mutates_local_tasks(runtime: io::Result<Runtime>) -> eyre::Result<()> {
    let rt = runtime?;
    let fixture = fixture_for(&all_pairings())?;
    let before = rt.block_on(fixture.local.fetch_tasks())?;

    rt.block_on(fixture.reconciler.run())?;

    let after = rt.block_on(fixture.local.fetch_tasks())?;
    eyre::ensure!(before == after, "local snapshot changed during the run");
    Ok(())
}
