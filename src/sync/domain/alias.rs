//! The join key shared by local and remote tasks.

use super::SyncDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable key identifying the same logical task in both systems.
///
/// Local tasks use their OmniFocus identifier; remote todos carry the same
/// value in their Habitica `alias` field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Alias(String);

impl Alias {
    /// Creates a validated alias.
    ///
    /// # Errors
    ///
    /// Returns [`SyncDomainError::EmptyAlias`] when the value is empty or
    /// whitespace-only.
    pub fn new(value: impl Into<String>) -> Result<Self, SyncDomainError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(SyncDomainError::EmptyAlias);
        }
        Ok(Self(raw))
    }

    /// Returns the alias as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Alias {
    type Error = SyncDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Alias> for String {
    fn from(alias: Alias) -> Self {
        alias.0
    }
}

impl AsRef<str> for Alias {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
