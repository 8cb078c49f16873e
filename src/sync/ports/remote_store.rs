//! Port for reading and mutating remote todos.

use crate::sync::domain::{Alias, NewRemoteTask, RemoteTask, SyncDomainError, TaskSet};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for remote task store operations.
pub type RemoteTaskStoreResult<T> = Result<T, RemoteTaskStoreError>;

/// Remote task store contract, keyed by alias.
#[async_trait]
pub trait RemoteTaskStore: Send + Sync {
    /// Fetches every remote todo that carries an alias.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteTaskStoreError`] when the listing cannot be fetched or
    /// decoded, or when two todos share an alias.
    async fn fetch_tasks(&self) -> RemoteTaskStoreResult<TaskSet<RemoteTask>>;

    /// Creates a remote todo.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteTaskStoreError`] when the store rejects the request.
    async fn create_task(&self, task: &NewRemoteTask) -> RemoteTaskStoreResult<()>;

    /// Marks the remote todo with `alias` as done.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteTaskStoreError::NotFound`] when no todo has the alias.
    async fn complete_task(&self, alias: &Alias) -> RemoteTaskStoreResult<()>;

    /// Removes the remote todo with `alias`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteTaskStoreError::NotFound`] when no todo has the alias.
    async fn delete_task(&self, alias: &Alias) -> RemoteTaskStoreResult<()>;
}

/// Errors returned by remote task store implementations.
#[derive(Debug, Clone, Error)]
pub enum RemoteTaskStoreError {
    /// No remote todo has the alias.
    #[error("remote task not found: {0}")]
    NotFound(Alias),

    /// The store answered with a non-success status.
    #[error("remote store returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// The request did not complete (connection, timeout).
    #[error("remote store transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// A request or response body could not be encoded or decoded.
    #[error("malformed remote payload: {0}")]
    Malformed(Arc<dyn std::error::Error + Send + Sync>),

    /// The listing violated a domain invariant.
    #[error(transparent)]
    Domain(#[from] SyncDomainError),

    /// Store-internal failure.
    #[error("remote store unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl RemoteTaskStoreError {
    /// Wraps a transport failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Wraps an encoding or decoding failure.
    pub fn malformed(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Malformed(Arc::new(err))
    }

    /// Wraps a store-internal failure.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
