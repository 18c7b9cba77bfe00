//! Outcome → display mapping for the result view.

use crate::domain::PredictionOutcome;
use crate::session::navigation::ResultScreen;

/// Label of the single action offered by the result view.
pub const BACK_ACTION: &str = "Back to application form";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultDisplay {
    Approved,
    Rejected,
}

impl ResultDisplay {
    pub fn headline(self) -> &'static str {
        match self {
            ResultDisplay::Approved => "APPROVED",
            ResultDisplay::Rejected => "REJECTED",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ResultDisplay::Approved => "✔",
            ResultDisplay::Rejected => "✘",
        }
    }
}

pub struct ResultPresenter;

impl ResultPresenter {
    pub fn present(outcome: PredictionOutcome) -> ResultDisplay {
        match outcome {
            PredictionOutcome::Approved => ResultDisplay::Approved,
            PredictionOutcome::Rejected => ResultDisplay::Rejected,
        }
    }

    /// Plain-text rendering, used by the non-interactive `predict` command.
    pub fn render_text(screen: &ResultScreen) -> String {
        match screen {
            ResultScreen::Decided {
                display,
                submission_id,
                decided_at,
            } => format!(
                "{} {} (submission #{submission_id}, {})",
                display.symbol(),
                display.headline(),
                decided_at.format("%Y-%m-%d %H:%M:%S")
            ),
            ResultScreen::NoResult => "No result yet. Submit an application first.".to_string(),
        }
    }
}
