//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging and the service configuration
//! - hands off to the TUI or runs a single submission

use clap::Parser;
use serde_json::json;
use tracing::info;

use crate::cli::{Command, PredictArgs, ServiceArgs};
use crate::client::HttpPredictor;
use crate::config::ServiceConfig;
use crate::error::{AppError, EXIT_RUNTIME};
use crate::session::{ResultPresenter, Session, SubmissionController, View};
use crate::telemetry::{self, LogTarget};

/// Entry point for the `loan` binary.
pub fn run() -> Result<(), AppError> {
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Predict(args) => handle_predict(args),
    }
}

fn handle_tui(args: ServiceArgs) -> Result<(), AppError> {
    let log_target = LogTarget::default_file();
    let _telemetry = telemetry::init(&log_target)?;
    let config = ServiceConfig::load(args.api_url.as_deref())?;
    info!(base_url = %config.base_url, "starting interactive portal");
    crate::tui::run(&config)
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    let _telemetry = telemetry::init(&LogTarget::Stderr)?;
    let config = ServiceConfig::load(args.service.api_url.as_deref())?;
    let predictor = HttpPredictor::new(&config)?;

    let mut session = Session::new(args.to_form());
    let mut controller = SubmissionController::new();

    let Some(decision) = controller.submit(&mut session, &predictor)? else {
        return Err(AppError::new(EXIT_RUNTIME, "Submission did not complete."));
    };

    if args.json {
        let out = json!({
            "status": decision.outcome,
            "submission_id": decision.submission_id,
            "decided_at": decision.decided_at.to_rfc3339(),
        });
        println!("{out}");
    } else if let View::Result(screen) = session.view() {
        println!("{}", ResultPresenter::render_text(screen));
    }

    Ok(())
}

/// Rewrite argv so `loan` defaults to `loan tui`.
///
/// Rules:
/// - `loan`                        -> `loan tui`
/// - `loan --api-url URL`          -> `loan tui --api-url URL`
/// - `loan --help/--version/-h`    -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "predict");
    if is_subcommand {
        return argv;
    }

    // A leading flag is a TUI flag.
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_launches_tui() {
        assert_eq!(rewrite_args(argv(&["loan"])), argv(&["loan", "tui"]));
    }

    #[test]
    fn leading_flag_is_routed_to_tui() {
        assert_eq!(
            rewrite_args(argv(&["loan", "--api-url", "http://h:1"])),
            argv(&["loan", "tui", "--api-url", "http://h:1"])
        );
    }

    #[test]
    fn help_and_subcommands_are_untouched() {
        assert_eq!(rewrite_args(argv(&["loan", "--help"])), argv(&["loan", "--help"]));
        assert_eq!(
            rewrite_args(argv(&["loan", "predict", "--loan-amount", "1"])),
            argv(&["loan", "predict", "--loan-amount", "1"])
        );
    }
}
