//! External prediction service client.

pub mod predict;

pub use predict::{HttpPredictor, PredictionError, Predictor};
