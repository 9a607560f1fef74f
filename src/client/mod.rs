//! Task lifecycle client split into focused submodules.
//!
//! The `DocTaskClient` struct and its methods are organized by step:
//! - [`submit`] - Input upload and task creation
//! - [`poll`] - Status queries and the polling state machine
//! - [`download`] - Artifact retrieval
//! - [`workflow`] - Submit → poll → download sequencing
//! - [`response`] - Typed response envelopes

mod download;
mod poll;
mod response;
mod submit;
mod workflow;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

pub use poll::PollState;

use crate::config::{Config, Credentials};
use crate::error::{Error, Result};
use crate::signature::{self, SIGNATURE_PARAM, Signature, SigningParams};
use crate::types::Event;
use std::sync::Arc;

/// Name of the query parameter that carries the client identifier
pub(crate) const CLIENT_ID_PARAM: &str = "clientId";

/// Capacity of the event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Client for the document-processing service (cloneable - all fields are shared)
///
/// A client holds no per-run state, so one instance can drive any number of
/// sequential or independent workflow runs.
#[derive(Clone)]
pub struct DocTaskClient {
    /// HTTP client (connection pool shared across clones)
    pub(crate) http: reqwest::Client,
    /// Parsed service root
    pub(crate) base_url: url::Url,
    /// Credentials (read-only)
    pub(crate) credentials: Arc<Credentials>,
    /// Configuration (read-only)
    pub(crate) config: Arc<Config>,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: tokio::sync::broadcast::Sender<Event>,
}

impl DocTaskClient {
    /// Create a new client
    ///
    /// Validates the configuration and builds the HTTP client. No request is
    /// sent until a task is submitted.
    pub fn new(config: Config, credentials: Credentials) -> Result<Self> {
        config.validate()?;

        let base_url = url::Url::parse(&config.base_url).map_err(|e| Error::Config {
            message: format!("invalid base URL '{}': {}", config.base_url, e),
            key: Some("base_url".to_string()),
        })?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to create HTTP client: {}", e),
                key: None,
            })?;

        let (event_tx, _rx) = tokio::sync::broadcast::channel(EVENT_CHANNEL_CAPACITY);

        tracing::debug!(
            base_url = %base_url,
            client_id = %credentials.client_id,
            "Document task client created"
        );

        Ok(Self {
            http,
            base_url,
            credentials: Arc::new(credentials),
            config: Arc::new(config),
            event_tx,
        })
    }

    /// Subscribe to workflow events
    ///
    /// Multiple subscribers are supported. Each subscriber receives all events
    /// independently. A subscriber that falls more than 256 events behind
    /// receives `RecvError::Lagged`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use doctask::{Config, Credentials, DocTaskClient, Event};
    ///
    /// # fn example() -> doctask::Result<()> {
    /// let client = DocTaskClient::new(Config::default(), Credentials::new("id", "secret"))?;
    /// let mut events = client.subscribe();
    /// tokio::spawn(async move {
    ///     while let Ok(event) = events.recv().await {
    ///         if let Event::TaskProgress { percentage, .. } = event {
    ///             println!("Task process is: {}", percentage);
    ///         }
    ///     }
    /// });
    /// # Ok(())
    /// # }
    /// ```
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Get the current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Client identifier requests are sent under
    pub fn client_id(&self) -> &str {
        &self.credentials.client_id
    }

    /// Send an event; having no subscribers is not an error
    pub(crate) fn emit(&self, event: Event) {
        self.event_tx.send(event).ok();
    }

    /// Fresh signing parameters, seeded with the client identifier
    pub(crate) fn signing_params(&self) -> SigningParams {
        let mut params = SigningParams::new();
        params.insert(CLIENT_ID_PARAM, self.credentials.client_id.as_str());
        params
    }

    /// Sign a parameter set with this client's secret
    pub(crate) fn sign(&self, params: &SigningParams) -> Signature {
        signature::sign(params, &self.credentials.secret_key)
    }

    /// Query string for a GET request: the signature plus every signed parameter
    pub(crate) fn signed_query(&self, params: &SigningParams) -> Vec<(String, String)> {
        let sn = self.sign(params);
        std::iter::once((SIGNATURE_PARAM.to_string(), sn.to_string()))
            .chain(params.iter().map(|(k, v)| (k.to_string(), v.to_string())))
            .collect()
    }

    /// Absolute URL of an endpoint path such as `document/extract`
    pub(crate) fn endpoint_url(&self, endpoint: &str) -> Result<url::Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config {
                message: format!("base URL '{}' cannot have path segments", self.base_url),
                key: Some("base_url".to_string()),
            })?
            .pop_if_empty()
            .extend(endpoint.split('/'));
        Ok(url)
    }
}
