//! Per-run session state and the submission pipeline that drives it.
//!
//! A [`Session`] owns everything the user can see: the form, the last
//! decision, the current view, and any pending notice. It is passed by
//! reference to the [`SubmissionController`], which is the only code that
//! stores decisions or raises failure notices.

use crate::domain::{ApplicationForm, Decision};

pub mod controller;
pub mod navigation;
pub mod result;

pub use controller::{Begin, Completion, SubmissionController, SubmissionError, SubmissionStatus, Ticket};
pub use navigation::{NavigationGate, ResultScreen, View};
pub use result::{ResultDisplay, ResultPresenter};

/// Failure category of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Validation,
    Network,
    Service,
}

impl NoticeKind {
    pub fn title(self) -> &'static str {
        match self {
            NoticeKind::Validation => "Invalid input",
            NoticeKind::Network => "Service unreachable",
            NoticeKind::Service => "Service error",
        }
    }
}

/// A dismissible message describing why a submission did not go through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl From<&SubmissionError> for Notice {
    fn from(err: &SubmissionError) -> Self {
        Self {
            kind: err.notice_kind(),
            message: err.notice_message(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub form: ApplicationForm,
    decision: Option<Decision>,
    view: View,
    notice: Option<Notice>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ApplicationForm::default())
    }
}

impl Session {
    pub fn new(form: ApplicationForm) -> Self {
        Self {
            form,
            decision: None,
            view: View::Form,
            notice: None,
        }
    }

    pub fn decision(&self) -> Option<&Decision> {
        self.decision.as_ref()
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Direct request for the result view (no transition payload).
    pub fn open_result(&mut self) {
        self.view = View::Result(NavigationGate::result_screen(self.decision.as_ref()));
    }

    /// Leave the result view. The stored decision and form values are kept.
    pub fn back_to_form(&mut self) {
        self.view = View::Form;
    }

    /// Store a fresh decision and move to the result view carrying it.
    fn record_decision(&mut self, decision: Decision) {
        self.view = View::Result(NavigationGate::result_screen(Some(&decision)));
        self.decision = Some(decision);
    }

    fn raise(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }
}
