//! Habitifocus: one-way sync of `OmniFocus` tasks into Habitica todos.
//!
//! Each run reads the local task list through the `osascript` scripting
//! bridge, reads the Habitica todo list, and applies the create, complete and
//! delete actions needed to make the todos mirror the local tasks. The run
//! stops at the first failed action; running again converges.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: aliases, task snapshots and the sync plan
//! - **Ports**: the local task source and remote task store traits
//! - **Adapters**: the `osascript` bridge, the Habitica HTTP client, and
//!   in-memory doubles
//!
//! # Modules
//!
//! - [`sync`]: reconciliation of local tasks into remote todos
//! - [`config`]: layered run configuration

pub mod config;
pub mod sync;
