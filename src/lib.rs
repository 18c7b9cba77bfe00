//! `loan-portal` library crate.
//!
//! The binary (`loan`) is a thin wrapper around this library so that:
//!
//! - the submission pipeline is testable without a terminal or a live service
//! - the interactive and one-shot front ends share one state machine

pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod form;
pub mod session;
pub mod telemetry;
pub mod tui;
