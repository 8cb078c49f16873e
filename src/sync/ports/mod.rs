//! Port contracts for the sync collaborators.
//!
//! Ports define infrastructure-agnostic interfaces used by the reconciler.

pub mod local_source;
pub mod remote_store;

pub use local_source::{LocalTaskSource, LocalTaskSourceError, LocalTaskSourceResult};
pub use remote_store::{RemoteTaskStore, RemoteTaskStoreError, RemoteTaskStoreResult};
