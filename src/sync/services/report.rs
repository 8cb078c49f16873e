//! Run outcome and error types for the reconciler.

use crate::sync::{
    domain::{ActionKind, Alias, SyncAction},
    ports::{LocalTaskSourceError, RemoteTaskStoreError},
};
use std::collections::BTreeSet;
use thiserror::Error;

/// A remote action that failed, with the alias and action it was issued for.
#[derive(Debug, Clone, Error)]
#[error("{action} failed for task {alias}: {source}")]
pub struct ActionError {
    alias: Alias,
    action: ActionKind,
    #[source]
    source: RemoteTaskStoreError,
}

impl ActionError {
    /// Creates an action error.
    #[must_use]
    pub const fn new(alias: Alias, action: ActionKind, source: RemoteTaskStoreError) -> Self {
        Self {
            alias,
            action,
            source,
        }
    }

    /// Returns the alias the failed action targeted.
    #[must_use]
    pub const fn alias(&self) -> &Alias {
        &self.alias
    }

    /// Returns the failed action kind.
    #[must_use]
    pub const fn action(&self) -> ActionKind {
        self.action
    }

    /// Returns the store error that caused the failure.
    #[must_use]
    pub const fn cause(&self) -> &RemoteTaskStoreError {
        &self.source
    }
}

/// Errors that end a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The local snapshot could not be fetched. No action was attempted.
    #[error("failed to fetch local tasks: {0}")]
    LocalFetch(#[source] LocalTaskSourceError),

    /// The remote snapshot could not be fetched. No action was attempted.
    #[error("failed to fetch remote tasks: {0}")]
    RemoteFetch(#[source] RemoteTaskStoreError),

    /// A remote action failed and the run stopped.
    #[error(transparent)]
    Action(#[from] ActionError),
}

/// Result type for sync runs.
pub type SyncResult<T> = Result<T, SyncError>;

/// What a reconciliation pass did.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    planned: usize,
    touched: BTreeSet<Alias>,
    deletion_targets: BTreeSet<Alias>,
    created: usize,
    completed: usize,
    deleted: usize,
    failure: Option<ActionError>,
}

impl SyncReport {
    /// Creates an empty report for a plan of `planned` actions.
    #[must_use]
    pub fn new(planned: usize) -> Self {
        Self {
            planned,
            ..Self::default()
        }
    }

    pub(crate) fn record_attempt(&mut self, action: &SyncAction) {
        let alias = action.alias().clone();
        match action.kind() {
            ActionKind::Create | ActionKind::Complete => {
                self.touched.insert(alias);
            }
            ActionKind::Delete => {
                self.deletion_targets.insert(alias);
            }
        }
    }

    pub(crate) const fn record_success(&mut self, kind: ActionKind) {
        match kind {
            ActionKind::Create => self.created += 1,
            ActionKind::Complete => self.completed += 1,
            ActionKind::Delete => self.deleted += 1,
        }
    }

    pub(crate) fn record_failure(&mut self, error: ActionError) {
        if self.failure.is_none() {
            self.failure = Some(error);
        }
    }

    /// Returns the number of actions the plan contained.
    #[must_use]
    pub const fn planned(&self) -> usize {
        self.planned
    }

    /// Returns local aliases a create or complete action was attempted for.
    #[must_use]
    pub const fn touched(&self) -> &BTreeSet<Alias> {
        &self.touched
    }

    /// Returns remote aliases a delete action was attempted for.
    #[must_use]
    pub const fn deletion_targets(&self) -> &BTreeSet<Alias> {
        &self.deletion_targets
    }

    /// Returns how many actions of `kind` succeeded.
    #[must_use]
    pub const fn succeeded(&self, kind: ActionKind) -> usize {
        match kind {
            ActionKind::Create => self.created,
            ActionKind::Complete => self.completed,
            ActionKind::Delete => self.deleted,
        }
    }

    /// Returns how many actions succeeded in total.
    #[must_use]
    pub const fn applied(&self) -> usize {
        self.created + self.completed + self.deleted
    }

    /// Returns the first action failure, if the run stopped early.
    #[must_use]
    pub const fn first_error(&self) -> Option<&ActionError> {
        self.failure.as_ref()
    }

    /// Returns whether every planned action was applied.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Converts the report into a `Result`, surfacing the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Action`] when an action failed.
    pub fn into_result(mut self) -> SyncResult<Self> {
        if let Some(error) = self.failure.take() {
            return Err(SyncError::Action(error));
        }
        Ok(self)
    }
}
