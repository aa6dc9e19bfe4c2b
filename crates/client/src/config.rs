//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `GLC_API_BASE_URL` - Backend origin (default: `http://localhost:8080`)
//! - `GLC_STATE_FILE` - Path of the local key/value store (default: `.glc-state.json`)
//! - `GLC_HTTP_TIMEOUT_SECS` - Per-request timeout in seconds (default: 30)
//! - `GLC_AUTH_TOKEN` - Bearer token sent with every request; overrides the stored token
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_STATE_FILE: &str = ".glc-state.json";
const DEFAULT_TIMEOUT_SECS: &str = "30";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin; request paths such as `/api/services` are appended to it
    pub api_base_url: Url,
    /// Location of the persisted session and cart
    pub state_file: PathBuf,
    /// Timeout applied to each HTTP request
    pub http_timeout: Duration,
    /// Bearer token from the environment, if any
    pub auth_token: Option<SecretString>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or_default = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let api_base_url = parse_base_url(&get_or_default("GLC_API_BASE_URL", DEFAULT_API_BASE_URL))?;
        let state_file = PathBuf::from(get_or_default("GLC_STATE_FILE", DEFAULT_STATE_FILE));
        let timeout_secs = get_or_default("GLC_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)
            .trim()
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("GLC_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "GLC_HTTP_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            api_base_url,
            state_file,
            http_timeout: Duration::from_secs(timeout_secs),
            auth_token: lookup("GLC_AUTH_TOKEN")
                .filter(|v| !v.trim().is_empty())
                .map(SecretString::from),
            sentry_dsn: lookup("SENTRY_DSN").filter(|v| !v.trim().is_empty()),
        })
    }

    /// Configuration pointing at `base_url` with every other value defaulted.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not an http(s) URL.
    pub fn for_base_url(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = base_url.to_string();
        Self::from_lookup(move |key| (key == "GLC_API_BASE_URL").then(|| base_url.clone()))
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar("GLC_API_BASE_URL".to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "GLC_API_BASE_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.api_base_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.state_file, PathBuf::from(".glc-state.json"));
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert!(config.auth_token.is_none());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("GLC_API_BASE_URL", "https://glc.example.com"),
            ("GLC_STATE_FILE", "/tmp/glc.json"),
            ("GLC_HTTP_TIMEOUT_SECS", "5"),
            ("GLC_AUTH_TOKEN", "tok-123"),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url.host_str(), Some("glc.example.com"));
        assert_eq!(config.state_file, PathBuf::from("/tmp/glc.json"));
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.auth_token.unwrap().expose_secret(), "tok-123");
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config =
            ClientConfig::from_lookup(lookup_from(&[("GLC_AUTH_TOKEN", "  "), ("SENTRY_DSN", "")]))
                .unwrap();
        assert!(config.auth_token.is_none());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_invalid_timeout() {
        let err = ClientConfig::from_lookup(lookup_from(&[("GLC_HTTP_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == "GLC_HTTP_TIMEOUT_SECS"));

        let err = ClientConfig::from_lookup(lookup_from(&[("GLC_HTTP_TIMEOUT_SECS", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(ClientConfig::for_base_url("not a url").is_err());
        assert!(ClientConfig::for_base_url("ftp://files.example.com").is_err());
        assert!(ClientConfig::for_base_url("http://127.0.0.1:9000").is_ok());
    }
}
