//! Configuration types for doctask

use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

use crate::error::{Error, Result};

/// Service credentials
///
/// Read-only for the lifetime of a client. `Debug` output never shows the
/// secret, and the type cannot be serialized back out:
///
/// ```compile_fail
/// let credentials = doctask::Credentials::new("abc", "s3cret");
/// let _ = serde_json::to_string(&credentials);
/// ```
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    /// Client identifier, sent in clear as `clientId`
    pub client_id: String,
    /// Shared secret, used only as signing input and never sent
    #[serde(rename = "secret_id")]
    pub secret_key: String,
}

/// On-disk credential file layout: `{"client_credentials": {"client_id", "secret_id"}}`
#[derive(Deserialize)]
struct CredentialsFile {
    client_credentials: Credentials,
}

impl Credentials {
    /// Create credentials from their two parts
    pub fn new(client_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Parse the service's credential document
    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: CredentialsFile = serde_json::from_str(content)
            .map_err(|e| Error::validation(format!("invalid credentials document: {}", e)))?;
        let credentials = file.client_credentials;
        if credentials.client_id.is_empty() {
            return Err(Error::validation("credentials are missing client_id"));
        }
        Ok(credentials)
    }

    /// Load the service's credential file
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::validation(format!(
                "failed to read credentials file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&content)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Status polling behavior
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Delay between status queries (default: 2000 ms)
    #[serde(default = "default_poll_interval", with = "duration_ms_serde")]
    pub interval: Duration,

    /// Stop after this many status queries (default: unlimited)
    ///
    /// The service defines no ceiling; polling normally runs until the task
    /// completes or fails.
    #[serde(default)]
    pub max_attempts: Option<u32>,

    /// Stop after polling for this long (default: unlimited)
    #[serde(default, with = "optional_duration_serde")]
    pub timeout: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: default_poll_interval(),
            max_attempts: None,
            timeout: None,
        }
    }
}

/// Artifact download behavior
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// What to do when the output file already exists (default: overwrite)
    #[serde(default)]
    pub file_collision: FileCollisionAction,

    /// Send the output file name as `fileName` with the download request (default: true)
    #[serde(default = "default_true")]
    pub send_file_name: bool,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            file_collision: FileCollisionAction::default(),
            send_file_name: true,
        }
    }
}

/// File collision handling strategy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCollisionAction {
    /// Replace the existing file (default)
    #[default]
    Overwrite,
    /// Append (1), (2), etc. to the file name
    Rename,
}

/// Main configuration for [`DocTaskClient`](crate::DocTaskClient)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Service base URL; endpoints are appended as path segments
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (default: 60 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Status polling behavior
    #[serde(default)]
    pub poll: PollConfig,

    /// Artifact download behavior
    #[serde(default)]
    pub download: DownloadConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: default_request_timeout(),
            user_agent: default_user_agent(),
            poll: PollConfig::default(),
            download: DownloadConfig::default(),
        }
    }
}

impl Config {
    /// Config pointing at a different service root, all else default
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Load a JSON configuration file
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::Config {
                message: format!("failed to read config '{}': {}", path.display(), e),
                key: None,
            })?;
        let config: Config = serde_json::from_str(&content).map_err(|e| Error::Config {
            message: format!("invalid config '{}': {}", path.display(), e),
            key: None,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that would otherwise fail at request time
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.base_url).map_err(|e| Error::Config {
            message: format!("invalid base URL '{}': {}", self.base_url, e),
            key: Some("base_url".to_string()),
        })?;
        if url.cannot_be_a_base() {
            return Err(Error::Config {
                message: format!("base URL '{}' cannot have path segments", self.base_url),
                key: Some("base_url".to_string()),
            });
        }
        if self.poll.interval.is_zero() {
            return Err(Error::Config {
                message: "poll interval must be greater than zero".to_string(),
                key: Some("poll.interval".to_string()),
            });
        }
        if self.poll.max_attempts == Some(0) {
            return Err(Error::Config {
                message: "poll max_attempts must be at least 1 when set".to_string(),
                key: Some("poll.max_attempts".to_string()),
            });
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    "https://servicesapi.foxitsoftware.cn/api".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_user_agent() -> String {
    format!("doctask/{}", env!("CARGO_PKG_VERSION"))
}

fn default_poll_interval() -> Duration {
    Duration::from_millis(2000)
}

fn default_true() -> bool {
    true
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

mod duration_ms_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
