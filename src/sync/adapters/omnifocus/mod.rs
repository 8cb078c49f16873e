//! OmniFocus adapter reading tasks through `osascript`.
//!
//! The adapter runs a JavaScript for Automation program that prints every
//! task as a JSON array of `{"id", "name", "done", "repeating"}` objects. The
//! OmniFocus task identifier becomes the sync alias.

mod listing;

pub use listing::{LIST_TASKS_SCRIPT, parse_listing};

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use crate::sync::{
    domain::{LocalTask, TaskSet},
    ports::{LocalTaskSource, LocalTaskSourceError, LocalTaskSourceResult},
};

/// Default location of the macOS scripting bridge.
pub const DEFAULT_OSASCRIPT: &str = "/usr/bin/osascript";

/// Default upper bound on a single listing.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Settings for invoking the scripting bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OmniFocusConfig {
    osascript: Utf8PathBuf,
    timeout: Duration,
}

impl OmniFocusConfig {
    /// Creates settings using the given `osascript` executable.
    #[must_use]
    pub fn new(osascript: impl Into<Utf8PathBuf>) -> Self {
        Self {
            osascript: osascript.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the listing timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the bridge executable path.
    #[must_use]
    pub fn osascript(&self) -> &Utf8Path {
        &self.osascript
    }

    /// Returns the listing timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for OmniFocusConfig {
    fn default() -> Self {
        Self::new(DEFAULT_OSASCRIPT)
    }
}

/// Local task source backed by OmniFocus.
#[derive(Debug, Clone, Default)]
pub struct OmniFocusTaskSource {
    config: OmniFocusConfig,
}

impl OmniFocusTaskSource {
    /// Creates a source with the given bridge settings.
    #[must_use]
    pub const fn new(config: OmniFocusConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl LocalTaskSource for OmniFocusTaskSource {
    async fn fetch_tasks(&self) -> LocalTaskSourceResult<TaskSet<LocalTask>> {
        let mut command = Command::new(self.config.osascript.as_std_path());
        command
            .args(["-l", "JavaScript", "-e", LIST_TASKS_SCRIPT])
            .kill_on_drop(true);

        debug!(program = %self.config.osascript, "listing OmniFocus tasks");
        let output = tokio::time::timeout(self.config.timeout, command.output())
            .await
            .map_err(|_| LocalTaskSourceError::TimedOut(self.config.timeout))?
            .map_err(LocalTaskSourceError::unavailable)?;

        if !output.status.success() {
            return Err(LocalTaskSourceError::Process {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        parse_listing(&output.stdout)
    }
}
