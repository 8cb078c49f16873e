//! Wire types for the Habitica v3 task endpoints.

use serde::{Deserialize, Serialize};

use crate::sync::domain::NewRemoteTask;

/// Response envelope wrapping every Habitica payload.
#[derive(Debug, Deserialize)]
pub(super) struct Envelope<T> {
    pub(super) data: T,
}

/// A todo as listed by `GET /tasks/user?type=todos`.
#[derive(Debug, Deserialize)]
pub(super) struct TodoRecord {
    #[serde(default)]
    pub(super) alias: Option<String>,
    #[serde(default)]
    pub(super) text: String,
    #[serde(default)]
    pub(super) completed: bool,
}

/// Body of `POST /tasks/user`.
#[derive(Debug, Serialize)]
pub(super) struct CreateTodoBody<'a> {
    alias: &'a str,
    text: &'a str,
    #[serde(rename = "type")]
    task_type: &'static str,
    #[serde(skip_serializing_if = "is_false")]
    completed: bool,
}

impl<'a> From<&'a NewRemoteTask> for CreateTodoBody<'a> {
    fn from(task: &'a NewRemoteTask) -> Self {
        Self {
            alias: task.alias().as_str(),
            text: task.text(),
            task_type: task.task_type().as_str(),
            completed: task.is_completed(),
        }
    }
}

const fn is_false(value: &bool) -> bool {
    !*value
}
