//! In-memory local task source for sync tests.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::sync::{
    domain::{LocalTask, TaskSet},
    ports::{LocalTaskSource, LocalTaskSourceError, LocalTaskSourceResult},
};

/// Thread-safe in-memory local task source.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLocalTaskSource {
    state: Arc<RwLock<InMemoryLocalState>>,
}

#[derive(Debug, Default)]
struct InMemoryLocalState {
    tasks: Vec<LocalTask>,
    failure: Option<LocalTaskSourceError>,
}

impl InMemoryLocalTaskSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source listing `tasks`, repeating tasks included.
    #[must_use]
    pub fn with_tasks(tasks: impl IntoIterator<Item = LocalTask>) -> Self {
        let source = Self::new();
        source.replace_tasks(tasks);
        source
    }

    /// Replaces the listed tasks.
    pub fn replace_tasks(&self, tasks: impl IntoIterator<Item = LocalTask>) {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        state.tasks = tasks.into_iter().collect();
    }

    /// Makes subsequent fetches fail with `error`.
    pub fn fail_with(&self, error: LocalTaskSourceError) {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        state.failure = Some(error);
    }
}

#[async_trait]
impl LocalTaskSource for InMemoryLocalTaskSource {
    async fn fetch_tasks(&self) -> LocalTaskSourceResult<TaskSet<LocalTask>> {
        let state = self.state.read().map_err(|err| {
            LocalTaskSourceError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        if let Some(error) = &state.failure {
            return Err(error.clone());
        }
        Ok(TaskSet::from_local_tasks(state.tasks.iter().cloned())?)
    }
}
