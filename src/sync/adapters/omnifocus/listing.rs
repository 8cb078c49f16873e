//! Decoding of the task listing printed by the automation script.

use serde::Deserialize;

use crate::sync::{
    domain::{Alias, LocalTask, TaskSet},
    ports::{LocalTaskSourceError, LocalTaskSourceResult},
};

/// JavaScript for Automation program listing every OmniFocus task as JSON.
pub const LIST_TASKS_SCRIPT: &str = r#"
var omnifocus = Application("OmniFocus");

function listTasks() {
    return omnifocus.defaultDocument.flattenedTasks().map(function (task) {
        return {
            id: task.id(),
            name: task.name(),
            done: task.completed(),
            repeating: task.repetitionRule() !== null
        };
    });
}

JSON.stringify(listTasks());
"#;

#[derive(Debug, Deserialize)]
struct ListedTask {
    id: String,
    name: String,
    done: bool,
    #[serde(default)]
    repeating: bool,
}

/// Decodes the script output into the local snapshot.
///
/// Repeating tasks are dropped.
///
/// # Errors
///
/// Returns [`LocalTaskSourceError::Malformed`] when the output is not the
/// expected JSON array, and [`LocalTaskSourceError::Domain`] for empty or
/// duplicate task identifiers.
pub fn parse_listing(output: &[u8]) -> LocalTaskSourceResult<TaskSet<LocalTask>> {
    let listed: Vec<ListedTask> =
        serde_json::from_slice(output).map_err(LocalTaskSourceError::malformed)?;

    let tasks = listed
        .into_iter()
        .map(|task| -> LocalTaskSourceResult<LocalTask> {
            let alias = Alias::new(task.id)?;
            Ok(LocalTask::new(alias, task.name, task.done).with_repeating(task.repeating))
        })
        .collect::<LocalTaskSourceResult<Vec<_>>>()?;

    Ok(TaskSet::from_local_tasks(tasks)?)
}
