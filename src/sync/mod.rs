//! One-way sync of local tasks into a remote todo list.
//!
//! The local task list is the source of truth for which tasks exist and
//! whether they are done. A run fetches both lists once, plans the create,
//! complete and delete actions that make the remote list mirror the local
//! one, and applies them, stopping at the first failure. Re-running after a
//! failure converges because every action is keyed by alias. The module
//! follows hexagonal architecture:
//!
//! - Domain types and planning in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The reconciler in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
