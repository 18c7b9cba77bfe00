//! Process-level error type.
//!
//! Domain modules return their own typed errors; everything that reaches
//! `main` is folded into an [`AppError`] carrying the exit code to use.

use crate::client::PredictionError;
use crate::config::ConfigError;
use crate::session::SubmissionError;

/// Bad input: configuration, CLI values, or form validation.
pub const EXIT_USAGE: u8 = 2;
/// The prediction service could not be reached.
pub const EXIT_NETWORK: u8 = 3;
/// The prediction service answered with a failure, or the terminal failed.
pub const EXIT_RUNTIME: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::new(EXIT_USAGE, value.to_string())
    }
}

impl From<SubmissionError> for AppError {
    fn from(value: SubmissionError) -> Self {
        let exit_code = match &value {
            SubmissionError::Validation(_) => EXIT_USAGE,
            SubmissionError::Prediction(PredictionError::Network { .. }) => EXIT_NETWORK,
            SubmissionError::Prediction(PredictionError::Service { .. }) => EXIT_RUNTIME,
        };
        Self::new(exit_code, value.notice_message())
    }
}
