//! Action planning: the three-way comparison between local and remote tasks.

use super::{Alias, AliasedTask, LocalTask, NewRemoteTask, RemoteTask, TaskSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of remote mutation requested by the reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Create a remote todo for a new local task.
    Create,
    /// Mark an existing remote todo as done.
    Complete,
    /// Remove a remote todo whose local task no longer exists.
    Delete,
}

impl ActionKind {
    /// Execution order of the passes within a run.
    pub const PASS_ORDER: [Self; 3] = [Self::Create, Self::Complete, Self::Delete];

    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Complete => "complete",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single remote mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// Create a remote todo.
    Create(NewRemoteTask),
    /// Complete the remote todo with this alias.
    Complete(Alias),
    /// Delete the remote todo with this alias.
    Delete(Alias),
}

impl SyncAction {
    /// Returns the action kind.
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::Create(_) => ActionKind::Create,
            Self::Complete(_) => ActionKind::Complete,
            Self::Delete(_) => ActionKind::Delete,
        }
    }

    /// Returns the alias the action targets.
    #[must_use]
    pub const fn alias(&self) -> &Alias {
        match self {
            Self::Create(task) => task.alias(),
            Self::Complete(alias) | Self::Delete(alias) => alias,
        }
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind(), self.alias())
    }
}

/// The actions needed to make the remote snapshot mirror the local one.
///
/// Each pass targets distinct aliases, so actions within a pass are
/// independent of each other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    creations: Vec<NewRemoteTask>,
    completions: Vec<Alias>,
    deletions: Vec<Alias>,
}

impl SyncPlan {
    /// Compares two snapshots and returns the converging actions.
    ///
    /// - a local task that is not done and has no remote counterpart is
    ///   created;
    /// - a done local task whose remote counterpart is incomplete is
    ///   completed;
    /// - a remote task with no local counterpart is deleted.
    ///
    /// A done local task with no remote counterpart produces no action.
    #[must_use]
    pub fn compute(local: &TaskSet<LocalTask>, remote: &TaskSet<RemoteTask>) -> Self {
        let creations = local
            .iter()
            .filter(|task| !task.is_done() && !remote.contains(task.alias()))
            .map(NewRemoteTask::from_local)
            .collect();

        let completions = local
            .iter()
            .filter(|task| task.is_done())
            .filter(|task| {
                remote
                    .get(task.alias())
                    .is_some_and(|remote_task| !remote_task.is_completed())
            })
            .map(|task| task.alias().clone())
            .collect();

        let deletions = remote
            .aliases()
            .filter(|alias| !local.contains(alias))
            .cloned()
            .collect();

        Self {
            creations,
            completions,
            deletions,
        }
    }

    /// Returns the creation payloads.
    #[must_use]
    pub fn creations(&self) -> &[NewRemoteTask] {
        &self.creations
    }

    /// Returns the aliases to complete.
    #[must_use]
    pub fn completions(&self) -> &[Alias] {
        &self.completions
    }

    /// Returns the aliases to delete.
    #[must_use]
    pub fn deletions(&self) -> &[Alias] {
        &self.deletions
    }

    /// Returns the actions of a single pass.
    #[must_use]
    pub fn pass(&self, kind: ActionKind) -> Vec<SyncAction> {
        match kind {
            ActionKind::Create => self
                .creations
                .iter()
                .cloned()
                .map(SyncAction::Create)
                .collect(),
            ActionKind::Complete => self
                .completions
                .iter()
                .cloned()
                .map(SyncAction::Complete)
                .collect(),
            ActionKind::Delete => self
                .deletions
                .iter()
                .cloned()
                .map(SyncAction::Delete)
                .collect(),
        }
    }

    /// Returns every action in execution order.
    #[must_use]
    pub fn actions(&self) -> Vec<SyncAction> {
        ActionKind::PASS_ORDER
            .into_iter()
            .flat_map(|kind| self.pass(kind))
            .collect()
    }

    /// Returns the total number of actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.creations.len() + self.completions.len() + self.deletions.len()
    }

    /// Returns whether the snapshots are already converged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
