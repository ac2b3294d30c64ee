//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Production API used when `MENTO_API_BASE_URL` is not set.
pub const DEFAULT_API_BASE_URL: &str = "https://api.mentoservices.com/api/v1";

/// Backend client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST backend, without a trailing slash.
    pub api_base_url: String,
    /// Bearer token sent on every authorized request.
    pub access_token: Option<SecretString>,
    /// Token exchanged for a new access token on 401/403.
    pub refresh_token: Option<SecretString>,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            access_token: None,
            refresh_token: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Build config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_base_url = lookup("MENTO_API_BASE_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.api_base_url);

        let access_token = non_empty(lookup("MENTO_ACCESS_TOKEN")).map(SecretString::from);
        let refresh_token = non_empty(lookup("MENTO_REFRESH_TOKEN")).map(SecretString::from);

        let request_timeout = match lookup("MENTO_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: "MENTO_REQUEST_TIMEOUT_SECS".to_string(),
                    message: format!("expected whole seconds, got {raw:?}"),
                })?;
                Duration::from_secs(secs)
            }
            None => defaults.request_timeout,
        };

        Ok(Self {
            api_base_url,
            access_token,
            refresh_token,
            request_timeout,
        })
    }
}

/// HTTP server configuration for the status routes.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Serve a profile from this JSON file instead of the backend.
    pub profile_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            profile_file: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("MENTO_ONBOARDING_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "MENTO_ONBOARDING_PORT".to_string(),
                message: format!("expected a port number, got {raw:?}"),
            })?,
            None => Self::default().port,
        };

        let profile_file = non_empty(lookup("MENTO_PROFILE_FILE")).map(PathBuf::from);

        Ok(Self { port, profile_file })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
