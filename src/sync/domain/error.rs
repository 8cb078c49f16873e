//! Error types for sync domain validation.

use super::Alias;
use thiserror::Error;

/// Errors returned while constructing sync domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncDomainError {
    /// The alias is empty.
    #[error("task alias must not be empty")]
    EmptyAlias,

    /// Two tasks in the same fetched set share an alias.
    #[error("duplicate task alias: {0}")]
    DuplicateAlias(Alias),
}
