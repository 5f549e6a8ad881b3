use crate::error::ApiError;
use config::{Config as Cfg, Environment};
use serde::Deserialize;

/// Runtime configuration for the client, sourced from the environment
/// (prefix `COUNSELOR`, e.g. `COUNSELOR_API_BASE_URL`). A `.env` file is
/// honored for local development.
#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_base_url() -> String {
    "http://127.0.0.1:8000/api".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            log_level: default_log_level(),
        }
    }
}

impl ClientConfig {
    pub fn load() -> Result<Self, ApiError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(Environment::with_prefix("COUNSELOR").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
