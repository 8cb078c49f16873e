//! Habitica adapter for the remote task store port.
//!
//! Todos created by the sync carry the local task identifier in their
//! `alias` field; todos without an alias are left alone.

mod client;
mod models;

pub use client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HabiticaClient, HabiticaConfig};
