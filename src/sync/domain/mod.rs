//! Domain model for local-to-remote task sync.
//!
//! Tasks from both systems are joined by [`Alias`]. The domain owns the pure
//! planning step; fetching and mutating tasks stays behind the ports.

mod alias;
mod error;
mod plan;
mod task;
mod task_set;

pub use alias::Alias;
pub use error::SyncDomainError;
pub use plan::{ActionKind, SyncAction, SyncPlan};
pub use task::{AliasedTask, LocalTask, NewRemoteTask, RemoteTask, RemoteTaskType};
pub use task_set::TaskSet;
