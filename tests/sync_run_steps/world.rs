//! Shared world state for sync run BDD scenarios.

use std::sync::Arc;

use habitifocus::sync::{
    adapters::memory::{InMemoryLocalTaskSource, InMemoryRemoteTaskStore},
    domain::{LocalTask, RemoteTask},
    services::{Reconciler, SyncReport, SyncResult},
};
use rstest::fixture;

/// Reconciler type used by the BDD world.
pub type TestReconciler = Reconciler<InMemoryLocalTaskSource, InMemoryRemoteTaskStore>;

/// Scenario world for sync run behaviour tests.
pub struct SyncWorld {
    pub local: Arc<InMemoryLocalTaskSource>,
    pub remote: Arc<InMemoryRemoteTaskStore>,
    pub reconciler: TestReconciler,
    pub local_tasks: Vec<LocalTask>,
    pub remote_todos: Vec<RemoteTask>,
    pub runs: Vec<SyncResult<SyncReport>>,
}

impl SyncWorld {
    /// Creates a world with empty task lists.
    #[must_use]
    pub fn new() -> Self {
        let local = Arc::new(InMemoryLocalTaskSource::new());
        let remote = Arc::new(InMemoryRemoteTaskStore::new());
        let reconciler = Reconciler::new(Arc::clone(&local), Arc::clone(&remote));
        Self {
            local,
            remote,
            reconciler,
            local_tasks: Vec::new(),
            remote_todos: Vec::new(),
            runs: Vec::new(),
        }
    }

    /// Returns the most recent run outcome.
    pub fn last_run(&self) -> Result<&SyncResult<SyncReport>, eyre::Report> {
        self.runs
            .last()
            .ok_or_else(|| eyre::eyre!("no sync run recorded in scenario world"))
    }
}

impl Default for SyncWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> SyncWorld {
    SyncWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
