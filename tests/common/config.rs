//! Test configuration helpers for loading .env credentials and creating test clients

use doctask::{Config, Credentials, DocTaskClient};

/// Error type for test configuration
#[derive(Debug)]
pub struct ConfigError(pub String);

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Config error: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Load service credentials from environment variables
///
/// Required environment variables:
/// - `DOCTASK_CLIENT_ID` - Client identifier
/// - `DOCTASK_SECRET_KEY` - Signing secret
pub fn load_live_credentials() -> Result<Credentials, ConfigError> {
    dotenvy::dotenv().ok();

    let client_id = std::env::var("DOCTASK_CLIENT_ID")
        .map_err(|_| ConfigError("DOCTASK_CLIENT_ID not set in environment".to_string()))?;

    let secret_key = std::env::var("DOCTASK_SECRET_KEY")
        .map_err(|_| ConfigError("DOCTASK_SECRET_KEY not set in environment".to_string()))?;

    Ok(Credentials::new(client_id, secret_key))
}

/// Client configuration for live service testing
///
/// Optional environment variables:
/// - `DOCTASK_BASE_URL` - Service root (default: the public service)
pub fn live_config() -> Config {
    match std::env::var("DOCTASK_BASE_URL") {
        Ok(base_url) => Config::with_base_url(base_url),
        Err(_) => Config::default(),
    }
}

/// Create a DocTaskClient configured for live service testing
pub fn create_live_client() -> Result<DocTaskClient, ConfigError> {
    create_live_client_with(load_live_credentials()?)
}

/// Create a live DocTaskClient with explicit credentials (for auth failure tests)
pub fn create_live_client_with(credentials: Credentials) -> Result<DocTaskClient, ConfigError> {
    DocTaskClient::new(live_config(), credentials)
        .map_err(|e| ConfigError(format!("Failed to create client: {}", e)))
}

/// Check if live test credentials are available
pub fn has_live_credentials() -> bool {
    dotenvy::dotenv().ok();
    std::env::var("DOCTASK_CLIENT_ID").is_ok() && std::env::var("DOCTASK_SECRET_KEY").is_ok()
}

/// Skip test if credentials are not available
#[macro_export]
macro_rules! skip_if_no_credentials {
    () => {
        if !$crate::common::has_live_credentials() {
            eprintln!("Skipping test: service credentials not found in .env");
            return;
        }
    };
}
