//! The two views and the rule that gates the result view.
//!
//! The result view is only meaningful with a decision. Reaching it without
//! one (e.g. asking for it before any successful submission) renders a
//! neutral "no result" screen instead of guessing an outcome.

use chrono::{DateTime, Local};

use crate::domain::Decision;
use crate::session::result::{ResultDisplay, ResultPresenter};

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Form,
    Result(ResultScreen),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResultScreen {
    Decided {
        display: ResultDisplay,
        submission_id: u64,
        decided_at: DateTime<Local>,
    },
    NoResult,
}

pub struct NavigationGate;

impl NavigationGate {
    pub fn result_screen(decision: Option<&Decision>) -> ResultScreen {
        match decision {
            Some(decision) => ResultScreen::Decided {
                display: ResultPresenter::present(decision.outcome),
                submission_id: decision.submission_id,
                decided_at: decision.decided_at,
            },
            None => ResultScreen::NoResult,
        }
    }
}
