//! HTTP client for the Habitica v3 API.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use std::fmt;
use std::time::Duration;
use tracing::debug;

use super::models::{CreateTodoBody, Envelope, TodoRecord};
use crate::sync::{
    domain::{Alias, NewRemoteTask, RemoteTask, TaskSet},
    ports::{RemoteTaskStore, RemoteTaskStoreError, RemoteTaskStoreResult},
};

/// Public Habitica API root.
pub const DEFAULT_BASE_URL: &str = "https://habitica.com/api/v3";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const APP_NAME: &str = "habitifocus";

/// Credentials and endpoint for the Habitica API.
///
/// The API key is never printed by the `Debug` implementation.
#[derive(Clone, PartialEq, Eq)]
pub struct HabiticaConfig {
    base_url: String,
    user_id: String,
    api_key: String,
    client_id: Option<String>,
    timeout: Duration,
}

impl HabiticaConfig {
    /// Creates a configuration for the public API.
    #[must_use]
    pub fn new(user_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            user_id: user_id.into(),
            api_key: api_key.into(),
            client_id: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the API root, e.g. for a self-hosted server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the `x-client` header value.
    #[must_use]
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the API root.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the Habitica user identifier.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Returns the `x-client` header value, `<user id>-habitifocus` unless
    /// overridden.
    #[must_use]
    pub fn client_id(&self) -> String {
        self.client_id
            .clone()
            .unwrap_or_else(|| format!("{}-{APP_NAME}", self.user_id))
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Debug for HabiticaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HabiticaConfig")
            .field("base_url", &self.base_url)
            .field("user_id", &self.user_id)
            .field("api_key", &"<redacted>")
            .field("client_id", &self.client_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Remote task store backed by the Habitica todo list.
#[derive(Debug, Clone)]
pub struct HabiticaClient {
    http: reqwest::Client,
    base_url: Url,
    config: HabiticaConfig,
}

impl HabiticaClient {
    /// Builds a client from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteTaskStoreError::Malformed`] when the base URL cannot
    /// be parsed, and [`RemoteTaskStoreError::Transport`] when the HTTP
    /// client cannot be constructed.
    pub fn new(config: HabiticaConfig) -> RemoteTaskStoreResult<Self> {
        let base_url = Url::parse(config.base_url()).map_err(RemoteTaskStoreError::malformed)?;
        if base_url.cannot_be_a_base() {
            return Err(RemoteTaskStoreError::malformed(std::io::Error::other(
                format!("base URL {base_url} cannot carry a path"),
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("habitifocus/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(RemoteTaskStoreError::transport)?;

        Ok(Self {
            http,
            base_url,
            config,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("x-api-user", self.config.user_id())
            .header("x-api-key", &self.config.api_key)
            .header("x-client", self.config.client_id())
    }

    async fn send(
        &self,
        request: RequestBuilder,
        alias: Option<&Alias>,
    ) -> RemoteTaskStoreResult<String> {
        let response = request
            .send()
            .await
            .map_err(RemoteTaskStoreError::transport)?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(RemoteTaskStoreError::transport)?;

        if status == StatusCode::NOT_FOUND {
            if let Some(missing) = alias {
                return Err(RemoteTaskStoreError::NotFound(missing.clone()));
            }
        }
        if !status.is_success() {
            return Err(RemoteTaskStoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

fn into_remote_tasks(records: Vec<TodoRecord>) -> RemoteTaskStoreResult<TaskSet<RemoteTask>> {
    let mut tasks = Vec::with_capacity(records.len());
    for record in records {
        let Some(alias) = record.alias.filter(|alias| !alias.trim().is_empty()) else {
            debug!(text = %record.text, "skipping todo without alias");
            continue;
        };
        tasks.push(RemoteTask::new(
            Alias::new(alias)?,
            record.text,
            record.completed,
        ));
    }
    Ok(TaskSet::from_tasks(tasks)?)
}

#[async_trait]
impl RemoteTaskStore for HabiticaClient {
    async fn fetch_tasks(&self) -> RemoteTaskStoreResult<TaskSet<RemoteTask>> {
        let mut url = self.endpoint(&["tasks", "user"]);
        url.query_pairs_mut().append_pair("type", "todos");

        let body = self.send(self.request(Method::GET, url), None).await?;
        let envelope: Envelope<Vec<TodoRecord>> =
            serde_json::from_str(&body).map_err(RemoteTaskStoreError::malformed)?;
        into_remote_tasks(envelope.data)
    }

    async fn create_task(&self, task: &NewRemoteTask) -> RemoteTaskStoreResult<()> {
        let url = self.endpoint(&["tasks", "user"]);
        let request = self
            .request(Method::POST, url)
            .json(&CreateTodoBody::from(task));
        self.send(request, None).await?;
        Ok(())
    }

    async fn complete_task(&self, alias: &Alias) -> RemoteTaskStoreResult<()> {
        let url = self.endpoint(&["tasks", alias.as_str(), "score", "up"]);
        self.send(self.request(Method::POST, url), Some(alias))
            .await?;
        Ok(())
    }

    async fn delete_task(&self, alias: &Alias) -> RemoteTaskStoreResult<()> {
        let url = self.endpoint(&["tasks", alias.as_str()]);
        self.send(self.request(Method::DELETE, url), Some(alias))
            .await?;
        Ok(())
    }
}
