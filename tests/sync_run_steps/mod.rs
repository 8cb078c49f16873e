//! Step definitions for sync run BDD scenarios.

pub mod given;
pub mod then;
pub mod world;
