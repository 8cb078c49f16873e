//! Adapters implementing the sync ports.
//!
//! # Available Adapters
//!
//! - [`omnifocus::OmniFocusTaskSource`]: local tasks read through the
//!   `osascript` scripting bridge
//! - [`habitica::HabiticaClient`]: remote todos on the Habitica v3 API
//! - [`memory`]: thread-safe in-memory implementations of both ports for
//!   tests

pub mod habitica;
pub mod memory;
pub mod omnifocus;
