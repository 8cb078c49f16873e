//! Layered run configuration.
//!
//! Values are resolved in this order, later sources winning:
//!
//! 1. built-in defaults
//! 2. a TOML file (`--config`, else `~/.habitifocus.toml` when present)
//! 3. `HABITIFOCUS_USERID` / `HABITIFOCUS_APIKEY` environment variables
//! 4. command-line overrides
//!
//! ```toml
//! [habitica]
//! user_id = "00000000-0000-0000-0000-000000000000"
//! api_key = "..."
//!
//! [omnifocus]
//! timeout_secs = 60
//!
//! [sync]
//! concurrency = 2
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::Deserialize;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::sync::{
    adapters::{
        habitica::{self, HabiticaConfig},
        omnifocus::{self, OmniFocusConfig},
    },
    services::ReconcilerConfig,
};

/// File name looked up in the home directory.
pub const DEFAULT_CONFIG_FILE: &str = ".habitifocus.toml";

/// Environment variable holding the Habitica user ID.
pub const USER_ID_ENV: &str = "HABITIFOCUS_USERID";

/// Environment variable holding the Habitica API key.
pub const API_KEY_ENV: &str = "HABITIFOCUS_APIKEY";

/// Errors raised while resolving configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// File path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },

    /// The configuration file is not valid TOML for [`AppConfig`].
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// File path, or `<inline>` for string input.
        path: Utf8PathBuf,
        /// Underlying decode error.
        #[source]
        source: Arc<toml::de::Error>,
    },

    /// A required value was not provided by any source.
    #[error("missing required setting {0}")]
    Missing(&'static str),

    /// A value is present but unusable.
    #[error("invalid setting {field}: {reason}")]
    Invalid {
        /// Setting name.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// A secret string that is never printed.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    /// Wraps a secret value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the secret value.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Habitica credentials and endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HabiticaSettings {
    /// Habitica user ID.
    #[serde(alias = "userid")]
    pub user_id: Option<String>,
    /// Habitica API token.
    #[serde(alias = "apikey")]
    pub api_key: Option<Secret>,
    /// API root override.
    pub base_url: Option<String>,
    /// `x-client` header override.
    pub client_id: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// Scripting bridge settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OmniFocusSettings {
    /// Path to the `osascript` executable.
    pub osascript: Option<Utf8PathBuf>,
    /// Listing timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// Reconciler settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncSettings {
    /// Maximum actions of one pass dispatched at once.
    pub concurrency: Option<usize>,
}

/// Complete run configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Remote store settings.
    pub habitica: HabiticaSettings,
    /// Local source settings.
    pub omnifocus: OmniFocusSettings,
    /// Reconciler settings.
    pub sync: SyncSettings,
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Habitica user ID.
    pub user_id: Option<String>,
    /// Habitica API token.
    pub api_key: Option<Secret>,
    /// Dispatch concurrency.
    pub concurrency: Option<usize>,
}

/// Read access to environment variables.
pub trait EnvSource {
    /// Returns the value of `key`, if set and valid UTF-8.
    fn var(&self, key: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl AppConfig {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for invalid TOML or unknown keys.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        Self::parse(contents, Utf8Path::new("<inline>"))
    }

    fn parse(contents: &str, path: &Utf8Path) -> ConfigResult<Self> {
        toml::from_str(contents).map_err(|err| ConfigError::Parse {
            path: path.to_owned(),
            source: Arc::new(err),
        })
    }

    /// Reads configuration from `path`.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] for other I/O failures and
    /// [`ConfigError::Parse`] for invalid contents.
    pub fn read_file(path: &Utf8Path) -> ConfigResult<Option<Self>> {
        let read_error = |err: std::io::Error| ConfigError::Read {
            path: path.to_owned(),
            source: Arc::new(err),
        };
        let file_name = path.file_name().ok_or_else(|| {
            read_error(std::io::Error::other("path must include a file name"))
        })?;
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };

        let dir = match Dir::open_ambient_dir(parent, ambient_authority()) {
            Ok(dir) => dir,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(read_error(err)),
        };
        let contents = match dir.read_to_string(file_name) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(read_error(err)),
        };
        Self::parse(&contents, path).map(Some)
    }

    /// Loads the file layer.
    ///
    /// An explicit path must exist. Without one, `~/.habitifocus.toml` is
    /// used when present and defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed.
    pub fn load(explicit: Option<&Utf8Path>) -> ConfigResult<Self> {
        if let Some(path) = explicit {
            let config = Self::read_file(path)?.ok_or_else(|| ConfigError::Read {
                path: path.to_owned(),
                source: Arc::new(std::io::Error::from(std::io::ErrorKind::NotFound)),
            })?;
            info!(file = %path, "using values from config file");
            return Ok(config);
        }

        let Some(path) = default_config_path() else {
            return Ok(Self::default());
        };
        let found = Self::read_file(&path)?;
        if found.is_some() {
            info!(file = %path, "using values from config file");
        }
        Ok(found.unwrap_or_default())
    }

    /// Applies credentials found in the environment.
    #[must_use]
    pub fn with_env(mut self, env: &impl EnvSource) -> Self {
        if let Some(user_id) = env.var(USER_ID_ENV) {
            self.habitica.user_id = Some(user_id);
        }
        if let Some(api_key) = env.var(API_KEY_ENV) {
            self.habitica.api_key = Some(Secret::new(api_key));
        }
        self
    }

    /// Applies command-line overrides.
    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        let ConfigOverrides {
            user_id,
            api_key,
            concurrency,
        } = overrides;
        if user_id.is_some() {
            self.habitica.user_id = user_id;
        }
        if api_key.is_some() {
            self.habitica.api_key = api_key;
        }
        if concurrency.is_some() {
            self.sync.concurrency = concurrency;
        }
        self
    }

    /// Builds the Habitica client configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when credentials are absent and
    /// [`ConfigError::Invalid`] for a zero timeout.
    pub fn habitica_config(&self) -> ConfigResult<HabiticaConfig> {
        let settings = &self.habitica;
        let user_id = settings
            .user_id
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing("habitica.user_id"))?;
        let api_key = settings
            .api_key
            .as_ref()
            .map(|key| key.expose().trim())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing("habitica.api_key"))?;

        let mut config = HabiticaConfig::new(user_id, api_key).with_timeout(positive_secs(
            "habitica.timeout_secs",
            settings.timeout_secs,
            habitica::DEFAULT_TIMEOUT,
        )?);
        if let Some(base_url) = &settings.base_url {
            config = config.with_base_url(base_url.clone());
        }
        if let Some(client_id) = &settings.client_id {
            config = config.with_client_id(client_id.clone());
        }
        Ok(config)
    }

    /// Builds the scripting bridge configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero timeout.
    pub fn omnifocus_config(&self) -> ConfigResult<OmniFocusConfig> {
        let settings = &self.omnifocus;
        let osascript = settings
            .osascript
            .clone()
            .unwrap_or_else(|| Utf8PathBuf::from(omnifocus::DEFAULT_OSASCRIPT));
        let timeout = positive_secs(
            "omnifocus.timeout_secs",
            settings.timeout_secs,
            omnifocus::DEFAULT_TIMEOUT,
        )?;
        Ok(OmniFocusConfig::new(osascript).with_timeout(timeout))
    }

    /// Builds the reconciler configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when concurrency is zero.
    pub fn reconciler_config(&self) -> ConfigResult<ReconcilerConfig> {
        let Some(value) = self.sync.concurrency else {
            return Ok(ReconcilerConfig::default());
        };
        NonZeroUsize::new(value)
            .map(ReconcilerConfig::new)
            .ok_or_else(|| ConfigError::Invalid {
                field: "sync.concurrency",
                reason: "must be at least 1".to_owned(),
            })
    }

    /// Checks that every adapter configuration can be built.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> ConfigResult<()> {
        self.habitica_config()?;
        self.omnifocus_config()?;
        self.reconciler_config()?;
        Ok(())
    }
}

fn positive_secs(
    field: &'static str,
    value: Option<u64>,
    default: Duration,
) -> ConfigResult<Duration> {
    match value {
        None => Ok(default),
        Some(0) => Err(ConfigError::Invalid {
            field,
            reason: "must be greater than 0".to_owned(),
        }),
        Some(secs) => Ok(Duration::from_secs(secs)),
    }
}

/// Returns `~/.habitifocus.toml`, when the home directory is known.
#[must_use]
pub fn default_config_path() -> Option<Utf8PathBuf> {
    let home = Utf8PathBuf::from_path_buf(dirs::home_dir()?).ok()?;
    Some(home.join(DEFAULT_CONFIG_FILE))
}
