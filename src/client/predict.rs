//! HTTP integration with the loan prediction service.
//!
//! One `POST {base}/predict` per submission, no retries. The response is
//! classified into a [`PredictionOutcome`] or a [`PredictionError`].

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, ServiceConfig};
use crate::domain::{PredictionOutcome, RequestPayload};

/// Anything that can turn a payload into a decision.
///
/// The TUI runs predictions on a worker thread, hence `Send + Sync`.
pub trait Predictor: Send + Sync {
    fn predict(&self, payload: &RequestPayload) -> Result<PredictionOutcome, PredictionError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictionError {
    /// No response: connection refused, DNS failure, timeout.
    #[error("could not reach the prediction service at {endpoint}: {reason}")]
    Network { endpoint: String, reason: String },
    /// The service answered but reported a failure.
    #[error("prediction service error: {detail}")]
    Service { detail: String },
}

impl PredictionError {
    /// Text shown to the user.
    pub fn notice_message(&self) -> String {
        match self {
            PredictionError::Network { endpoint, .. } => format!(
                "Could not reach the prediction service at {endpoint}. Check that it is running."
            ),
            PredictionError::Service { detail } => detail.clone(),
        }
    }

    fn service(detail: impl Into<String>) -> Self {
        PredictionError::Service {
            detail: detail.into(),
        }
    }
}

pub struct HttpPredictor {
    client: Client,
    endpoint: String,
}

impl HttpPredictor {
    pub fn new(config: &ServiceConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: config.predict_url(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Predictor for HttpPredictor {
    fn predict(&self, payload: &RequestPayload) -> Result<PredictionOutcome, PredictionError> {
        debug!(endpoint = %self.endpoint, "sending prediction request");

        let network = |e: reqwest::Error| PredictionError::Network {
            endpoint: self.endpoint.clone(),
            reason: e.to_string(),
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .map_err(network)?;

        let status = resp.status();
        let body = resp.text().map_err(network)?;

        let result = if status.is_success() {
            parse_success(&body)
        } else {
            Err(PredictionError::service(error_detail(&body, status)))
        };

        match &result {
            Ok(outcome) => info!(?outcome, "prediction received"),
            Err(err) => warn!(%status, error = %err, "prediction service reported a failure"),
        }
        result
    }
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    status: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    detail: Option<Value>,
}

fn parse_success(body: &str) -> Result<PredictionOutcome, PredictionError> {
    let parsed: PredictResponse = serde_json::from_str(body).map_err(|e| {
        PredictionError::service(format!("Malformed response from the prediction service: {e}"))
    })?;

    // The service answers 200 with an `error` field when its model is unavailable.
    if let Some(error) = parsed.error.filter(|e| !e.trim().is_empty()) {
        return Err(PredictionError::service(error));
    }

    match parsed.status {
        Some(status) => PredictionOutcome::from_status(&status).ok_or_else(|| {
            PredictionError::service(format!("Unexpected prediction status '{status}'."))
        }),
        None => Err(PredictionError::service(
            "The prediction service response did not include a status.",
        )),
    }
}

/// Pull a human-readable detail out of an error body.
///
/// `detail` is either a plain string or a list of validation records with a
/// `msg` each; anything else falls back to a generic message.
fn error_detail(body: &str, status: StatusCode) -> String {
    let generic = || format!("The prediction service reported an error (HTTP {status}).");

    let Ok(parsed) = serde_json::from_str::<ErrorResponse>(body) else {
        return generic();
    };

    match parsed.detail {
        Some(Value::String(detail)) if !detail.trim().is_empty() => detail,
        Some(Value::Array(items)) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if msgs.is_empty() {
                generic()
            } else {
                msgs.join("; ")
            }
        }
        _ => generic(),
    }
}
