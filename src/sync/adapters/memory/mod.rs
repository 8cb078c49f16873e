//! In-memory adapter implementations for testing.
//!
//! These adapters provide simple, thread-safe implementations of the sync
//! ports that need neither the scripting bridge nor network access.

mod local_source;
mod remote_store;

pub use local_source::InMemoryLocalTaskSource;
pub use remote_store::InMemoryRemoteTaskStore;
