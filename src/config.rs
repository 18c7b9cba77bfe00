//! Prediction service configuration.
//!
//! The base address is the only externally configurable value. It is read
//! from `LOAN_API_URL` (a `.env` file is honoured) and falls back to the
//! local development server.

use std::env;
use std::time::Duration;

use thiserror::Error;

pub const API_URL_ENV: &str = "LOAN_API_URL";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
/// Upper bound on a single prediction request, connect included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid service address '{value}': expected an http:// or https:// URL")]
    InvalidBaseUrl { value: String },
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ServiceConfig {
    /// Load from the environment, letting `override_url` (the `--api-url`
    /// flag) take precedence.
    pub fn load(override_url: Option<&str>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let from_env = env::var(API_URL_ENV).ok();
        let override_url = override_url.filter(|url| !url.trim().is_empty());
        Self::resolve(override_url.or(from_env.as_deref()))
    }

    /// Build from an optional raw address; blank or missing means default.
    pub fn resolve(raw: Option<&str>) -> Result<Self, ConfigError> {
        let base_url = match raw.map(str::trim) {
            None | Some("") => DEFAULT_BASE_URL.to_string(),
            Some(value) => {
                let host = value
                    .strip_prefix("http://")
                    .or_else(|| value.strip_prefix("https://"))
                    .map(|rest| rest.trim_start_matches('/'));
                match host {
                    Some(host) if !host.is_empty() => value.trim_end_matches('/').to_string(),
                    _ => {
                        return Err(ConfigError::InvalidBaseUrl {
                            value: value.to_string(),
                        });
                    }
                }
            }
        };

        Ok(Self {
            base_url,
            timeout: REQUEST_TIMEOUT,
        })
    }

    /// Full URL of the prediction endpoint.
    pub fn predict_url(&self) -> String {
        format!("{}/predict", self.base_url)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_blank_uses_loopback_default() {
        assert_eq!(ServiceConfig::resolve(None).unwrap().base_url, DEFAULT_BASE_URL);
        assert_eq!(ServiceConfig::resolve(Some("  ")).unwrap().base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn trailing_slash_does_not_double_up() {
        let cfg = ServiceConfig::resolve(Some("https://loans.example.com/api/")).unwrap();
        assert_eq!(cfg.predict_url(), "https://loans.example.com/api/predict");
    }

    #[test]
    fn scheme_without_host_is_rejected() {
        for raw in ["http://", "https:///", " http:// "] {
            let err = ServiceConfig::resolve(Some(raw)).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }), "{raw}");
        }
    }

    #[test]
    fn blank_override_defers_to_environment() {
        // SAFETY: no other test in this crate touches this variable.
        unsafe { env::set_var(API_URL_ENV, "http://loans.internal:9000") };
        let cfg = ServiceConfig::load(Some("   "));
        unsafe { env::remove_var(API_URL_ENV) };
        assert_eq!(cfg.unwrap().base_url, "http://loans.internal:9000");
    }

    #[test]
    fn rejects_non_http_addresses() {
        let err = ServiceConfig::resolve(Some("localhost:8000")).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidBaseUrl {
                value: "localhost:8000".to_string()
            }
        );
    }
}
