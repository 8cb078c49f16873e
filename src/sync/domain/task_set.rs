//! Alias-keyed task snapshots.

use super::{Alias, AliasedTask, LocalTask, SyncDomainError};
use std::collections::BTreeMap;

/// Immutable mapping from alias to task, fetched once per run.
///
/// Iteration is ordered by alias so that plans and logs are stable between
/// runs; reconciliation results do not depend on that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSet<T> {
    tasks: BTreeMap<Alias, T>,
}

impl<T> Default for TaskSet<T> {
    fn default() -> Self {
        Self {
            tasks: BTreeMap::new(),
        }
    }
}

impl<T: AliasedTask> TaskSet<T> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from fetched tasks.
    ///
    /// # Errors
    ///
    /// Returns [`SyncDomainError::DuplicateAlias`] when two tasks share an
    /// alias.
    pub fn from_tasks(tasks: impl IntoIterator<Item = T>) -> Result<Self, SyncDomainError> {
        let mut set = Self::new();
        for task in tasks {
            let alias = task.alias().clone();
            if set.tasks.contains_key(&alias) {
                return Err(SyncDomainError::DuplicateAlias(alias));
            }
            set.tasks.insert(alias, task);
        }
        Ok(set)
    }

    /// Returns the task for `alias`, if present.
    #[must_use]
    pub fn get(&self, alias: &Alias) -> Option<&T> {
        self.tasks.get(alias)
    }

    /// Returns whether `alias` is present.
    #[must_use]
    pub fn contains(&self, alias: &Alias) -> bool {
        self.tasks.contains_key(alias)
    }

    /// Returns the number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns whether the set holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Iterates tasks in alias order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.tasks.values()
    }

    /// Iterates aliases in order.
    pub fn aliases(&self) -> impl Iterator<Item = &Alias> {
        self.tasks.keys()
    }
}

impl TaskSet<LocalTask> {
    /// Builds a local set, dropping tasks governed by a repetition rule.
    ///
    /// # Errors
    ///
    /// Returns [`SyncDomainError::DuplicateAlias`] when two non-repeating
    /// tasks share an alias.
    pub fn from_local_tasks(
        tasks: impl IntoIterator<Item = LocalTask>,
    ) -> Result<Self, SyncDomainError> {
        Self::from_tasks(tasks.into_iter().filter(|task| !task.is_repeating()))
    }
}

impl<'a, T> IntoIterator for &'a TaskSet<T> {
    type Item = &'a T;
    type IntoIter = std::collections::btree_map::Values<'a, Alias, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.values()
    }
}
