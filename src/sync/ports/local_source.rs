//! Port for reading the local task snapshot.

use crate::sync::domain::{LocalTask, SyncDomainError, TaskSet};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for local task source operations.
pub type LocalTaskSourceResult<T> = Result<T, LocalTaskSourceError>;

/// Source of the local task snapshot.
#[async_trait]
pub trait LocalTaskSource: Send + Sync {
    /// Fetches every local task that takes part in sync.
    ///
    /// Implementations exclude tasks governed by an active repetition rule.
    ///
    /// # Errors
    ///
    /// Returns [`LocalTaskSourceError`] when the snapshot cannot be read in
    /// full. A partial snapshot is never returned.
    async fn fetch_tasks(&self) -> LocalTaskSourceResult<TaskSet<LocalTask>>;
}

/// Errors returned by local task source implementations.
#[derive(Debug, Clone, Error)]
pub enum LocalTaskSourceError {
    /// The source could not be reached or started.
    #[error("local task source unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),

    /// The bridge process exited unsuccessfully.
    #[error("local task bridge exited with {status}: {stderr}")]
    Process {
        /// Exit status description.
        status: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// The bridge produced output that could not be decoded.
    #[error("malformed local task listing: {0}")]
    Malformed(Arc<dyn std::error::Error + Send + Sync>),

    /// The bridge did not answer in time.
    #[error("local task source timed out after {0:?}")]
    TimedOut(Duration),

    /// The listing violated a domain invariant.
    #[error(transparent)]
    Domain(#[from] SyncDomainError),
}

impl LocalTaskSourceError {
    /// Wraps a failure to reach the source.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }

    /// Wraps a decoding failure.
    pub fn malformed(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Malformed(Arc::new(err))
    }
}
