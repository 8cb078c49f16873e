//! Local and remote task snapshots.

use super::Alias;
use serde::{Deserialize, Serialize};

/// A value keyed by a task alias.
pub trait AliasedTask {
    /// Returns the join key for this task.
    fn alias(&self) -> &Alias;
}

/// A task read from the local task manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalTask {
    alias: Alias,
    name: String,
    done: bool,
    repeating: bool,
}

impl LocalTask {
    /// Creates a non-repeating local task.
    #[must_use]
    pub fn new(alias: Alias, name: impl Into<String>, done: bool) -> Self {
        Self {
            alias,
            name: name.into(),
            done,
            repeating: false,
        }
    }

    /// Marks whether the task is governed by an active repetition rule.
    #[must_use]
    pub const fn with_repeating(mut self, repeating: bool) -> Self {
        self.repeating = repeating;
        self
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether the task is completed locally.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.done
    }

    /// Returns whether the task repeats. Repeating tasks never take part in
    /// reconciliation.
    #[must_use]
    pub const fn is_repeating(&self) -> bool {
        self.repeating
    }
}

impl AliasedTask for LocalTask {
    fn alias(&self) -> &Alias {
        &self.alias
    }
}

/// A todo read from the remote task store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTask {
    alias: Alias,
    text: String,
    completed: bool,
}

impl RemoteTask {
    /// Creates a remote task snapshot.
    #[must_use]
    pub fn new(alias: Alias, text: impl Into<String>, completed: bool) -> Self {
        Self {
            alias,
            text: text.into(),
            completed,
        }
    }

    /// Returns the display text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether the remote store considers the todo completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }
}

impl AliasedTask for RemoteTask {
    fn alias(&self) -> &Alias {
        &self.alias
    }
}

/// Kind of remote task created by the sync. Only todos are ever created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteTaskType {
    /// A one-off todo.
    Todo,
}

impl RemoteTaskType {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
        }
    }
}

/// Payload for creating a remote todo from a local task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRemoteTask {
    alias: Alias,
    text: String,
    #[serde(rename = "type")]
    task_type: RemoteTaskType,
    completed: bool,
}

impl NewRemoteTask {
    /// Builds the creation payload for a local task. New remote todos always
    /// start incomplete.
    #[must_use]
    pub fn from_local(task: &LocalTask) -> Self {
        Self {
            alias: task.alias().clone(),
            text: task.name().to_owned(),
            task_type: RemoteTaskType::Todo,
            completed: false,
        }
    }

    /// Returns the alias the remote todo will be keyed by.
    #[must_use]
    pub const fn alias(&self) -> &Alias {
        &self.alias
    }

    /// Returns the display text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the remote task type.
    #[must_use]
    pub const fn task_type(&self) -> RemoteTaskType {
        self.task_type
    }

    /// Returns the initial completion state.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns the remote snapshot this payload produces once stored.
    #[must_use]
    pub fn to_remote(&self) -> RemoteTask {
        RemoteTask::new(self.alias.clone(), self.text.clone(), self.completed)
    }
}
