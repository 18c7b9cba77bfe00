//! Domain types shared by the submission pipeline.
//!
//! This module defines:
//!
//! - categorical form options (`Gender`, `YesNo`, `PropertyArea`, ...)
//! - the editable form (`ApplicationForm`, `NumericInput`)
//! - the wire payload (`RequestPayload`) and the service's answer (`PredictionOutcome`)

pub mod types;

pub use types::*;
