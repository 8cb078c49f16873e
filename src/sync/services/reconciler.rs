//! Service that converges the remote todo list onto the local task list.

use super::report::{ActionError, SyncError, SyncReport, SyncResult};
use crate::sync::{
    domain::{ActionKind, LocalTask, RemoteTask, SyncAction, SyncPlan, TaskSet},
    ports::{LocalTaskSource, RemoteTaskStore},
};
use futures::stream::{self, TryStreamExt};
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info};

/// Tuning for action dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcilerConfig {
    concurrency: NonZeroUsize,
}

impl ReconcilerConfig {
    /// Creates a configuration dispatching at most `concurrency` actions of a
    /// pass at once.
    #[must_use]
    pub const fn new(concurrency: NonZeroUsize) -> Self {
        Self { concurrency }
    }

    /// Returns the per-pass fan-out limit.
    #[must_use]
    pub const fn concurrency(&self) -> NonZeroUsize {
        self.concurrency
    }
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self::new(NonZeroUsize::MIN)
    }
}

/// Reconciliation service.
///
/// One call to [`Reconciler::run`] is one convergence attempt: both snapshots
/// are fetched once, the plan is computed, and the create, complete and
/// delete passes are executed in that order. The first failing action stops
/// the run. Dropping the returned future cancels the run; actions already
/// issued are not rolled back.
pub struct Reconciler<L, R>
where
    L: LocalTaskSource,
    R: RemoteTaskStore,
{
    local: Arc<L>,
    remote: Arc<R>,
    config: ReconcilerConfig,
}

impl<L, R> Clone for Reconciler<L, R>
where
    L: LocalTaskSource,
    R: RemoteTaskStore,
{
    fn clone(&self) -> Self {
        Self {
            local: Arc::clone(&self.local),
            remote: Arc::clone(&self.remote),
            config: self.config,
        }
    }
}

impl<L, R> Reconciler<L, R>
where
    L: LocalTaskSource,
    R: RemoteTaskStore,
{
    /// Creates a reconciler with sequential dispatch.
    #[must_use]
    pub fn new(local: Arc<L>, remote: Arc<R>) -> Self {
        Self {
            local,
            remote,
            config: ReconcilerConfig::default(),
        }
    }

    /// Replaces the dispatch configuration.
    #[must_use]
    pub const fn with_config(mut self, config: ReconcilerConfig) -> Self {
        self.config = config;
        self
    }

    /// Fetches the local and remote snapshots.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::LocalFetch`] or [`SyncError::RemoteFetch`] when a
    /// snapshot cannot be read.
    pub async fn fetch_snapshots(
        &self,
    ) -> SyncResult<(TaskSet<LocalTask>, TaskSet<RemoteTask>)> {
        let local = self
            .local
            .fetch_tasks()
            .await
            .map_err(SyncError::LocalFetch)?;
        info!(tasks = local.len(), "fetched local tasks");

        let remote = self
            .remote
            .fetch_tasks()
            .await
            .map_err(SyncError::RemoteFetch)?;
        info!(tasks = remote.len(), "fetched remote tasks");

        Ok((local, remote))
    }

    /// Fetches both snapshots and returns the plan without applying it.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] when a snapshot cannot be read.
    pub async fn plan(&self) -> SyncResult<SyncPlan> {
        let (local, remote) = self.fetch_snapshots().await?;
        Ok(SyncPlan::compute(&local, &remote))
    }

    /// Runs one full sync.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] when a snapshot cannot be read or when an
    /// action fails.
    pub async fn run(&self) -> SyncResult<SyncReport> {
        let (local, remote) = self.fetch_snapshots().await?;
        self.reconcile(&local, &remote).await.into_result()
    }

    /// Converges the remote store onto `local`, given both snapshots.
    ///
    /// The returned report carries the touched aliases and, when the run
    /// stopped early, the first failing action.
    pub async fn reconcile(
        &self,
        local: &TaskSet<LocalTask>,
        remote: &TaskSet<RemoteTask>,
    ) -> SyncReport {
        let plan = SyncPlan::compute(local, remote);
        info!(
            create = plan.creations().len(),
            complete = plan.completions().len(),
            delete = plan.deletions().len(),
            "computed sync plan"
        );
        self.execute(&plan).await
    }

    /// Applies a plan pass by pass, stopping at the first failure.
    pub async fn execute(&self, plan: &SyncPlan) -> SyncReport {
        let ledger = Mutex::new(SyncReport::new(plan.len()));

        for kind in ActionKind::PASS_ORDER {
            let actions = plan.pass(kind);
            if actions.is_empty() {
                continue;
            }
            debug!(pass = %kind, actions = actions.len(), "starting pass");

            let outcome = stream::iter(actions.into_iter().map(Ok::<_, ActionError>))
                .try_for_each_concurrent(self.config.concurrency.get(), |action| {
                    self.apply(action, &ledger)
                })
                .await;

            if let Err(failure) = outcome {
                lock(&ledger).record_failure(failure);
                break;
            }
        }

        ledger.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    async fn apply(
        &self,
        action: SyncAction,
        ledger: &Mutex<SyncReport>,
    ) -> Result<(), ActionError> {
        lock(ledger).record_attempt(&action);

        let result = match &action {
            SyncAction::Create(task) => self.remote.create_task(task).await,
            SyncAction::Complete(alias) => self.remote.complete_task(alias).await,
            SyncAction::Delete(alias) => self.remote.delete_task(alias).await,
        };

        let alias = action.alias();
        match result {
            Ok(()) => {
                match action.kind() {
                    ActionKind::Create => info!(alias = %alias, "created"),
                    ActionKind::Complete => info!(alias = %alias, "completed"),
                    ActionKind::Delete => info!(alias = %alias, "deleted"),
                }
                lock(ledger).record_success(action.kind());
                Ok(())
            }
            Err(source) => {
                error!(
                    alias = %alias,
                    action = %action.kind(),
                    error = %source,
                    "remote action failed"
                );
                Err(ActionError::new(alias.clone(), action.kind(), source))
            }
        }
    }
}

fn lock(ledger: &Mutex<SyncReport>) -> MutexGuard<'_, SyncReport> {
    ledger.lock().unwrap_or_else(PoisonError::into_inner)
}
