//! Submission state machine: validate → build → call → outcome.
//!
//! ```text
//! Idle --begin(valid form)--> Submitting{id} --complete(id, Ok)--> Idle (+ decision, result view)
//!                                            --complete(id, Err)-> Idle (+ notice)
//! Idle --begin(invalid form)--> Idle (+ notice, no payload, no request)
//! Submitting --begin--> Submitting (ignored)
//! ```
//!
//! `begin` and `complete` are split so the network call can run off the UI
//! thread; [`SubmissionController::submit`] chains them for callers that can
//! block.

use chrono::Local;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::client::{PredictionError, Predictor};
use crate::domain::{Decision, PredictionOutcome, RequestPayload};
use crate::form::{ValidationError, build_payload, validate_form};
use crate::session::{Notice, NoticeKind, Session};

pub const VALIDATION_NOTICE: &str = "Please enter valid numeric values";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("invalid form input: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
    #[error(transparent)]
    Prediction(#[from] PredictionError),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

impl SubmissionError {
    pub fn notice_kind(&self) -> NoticeKind {
        match self {
            SubmissionError::Validation(_) => NoticeKind::Validation,
            SubmissionError::Prediction(PredictionError::Network { .. }) => NoticeKind::Network,
            SubmissionError::Prediction(PredictionError::Service { .. }) => NoticeKind::Service,
        }
    }

    pub fn notice_message(&self) -> String {
        match self {
            SubmissionError::Validation(errors) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.display_name()).collect();
                format!("{VALIDATION_NOTICE} ({}).", fields.join(", "))
            }
            SubmissionError::Prediction(err) => err.notice_message(),
        }
    }
}

/// Work handed to whoever performs the request.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub id: u64,
    pub payload: RequestPayload,
}

/// Result of a submit trigger.
#[derive(Debug, Clone, PartialEq)]
pub enum Begin {
    /// Form validated; the request described by the ticket must be sent.
    Started(Ticket),
    /// A submission is already in flight.
    Ignored,
    /// Validation failed; a notice was raised and nothing was sent.
    Invalid(SubmissionError),
}

/// Result of delivering a response.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Decided(Decision),
    Failed(SubmissionError),
    /// The response does not belong to the in-flight submission.
    Stale,
}

#[derive(Debug, Default)]
pub struct SubmissionController {
    status: SubmissionStatus,
    in_flight: Option<u64>,
    last_id: u64,
}

impl SubmissionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.status == SubmissionStatus::Submitting
    }

    /// Handle a submit trigger.
    pub fn begin(&mut self, session: &mut Session) -> Begin {
        if self.is_submitting() {
            debug!(in_flight = ?self.in_flight, "submit ignored while a request is in flight");
            return Begin::Ignored;
        }

        let amounts = match validate_form(&mut session.form) {
            Ok(amounts) => amounts,
            Err(errors) => {
                let err = SubmissionError::Validation(errors);
                warn!(error = %err, "submission rejected by validation");
                session.raise(Notice::from(&err));
                return Begin::Invalid(err);
            }
        };

        self.last_id += 1;
        let id = self.last_id;
        self.status = SubmissionStatus::Submitting;
        self.in_flight = Some(id);
        session.dismiss_notice();

        info!(submission_id = id, "submission started");
        Begin::Started(Ticket {
            id,
            payload: build_payload(&session.form, amounts),
        })
    }

    /// Deliver the response for submission `id`.
    pub fn complete(
        &mut self,
        session: &mut Session,
        id: u64,
        result: Result<PredictionOutcome, PredictionError>,
    ) -> Completion {
        if self.in_flight != Some(id) {
            debug!(submission_id = id, in_flight = ?self.in_flight, "discarding stale response");
            return Completion::Stale;
        }
        self.status = SubmissionStatus::Idle;
        self.in_flight = None;

        match result {
            Ok(outcome) => {
                let decision = Decision {
                    submission_id: id,
                    outcome,
                    decided_at: Local::now(),
                };
                info!(submission_id = id, ?outcome, "submission decided");
                session.record_decision(decision.clone());
                Completion::Decided(decision)
            }
            Err(err) => {
                let err = SubmissionError::from(err);
                warn!(submission_id = id, error = %err, "submission failed");
                session.raise(Notice::from(&err));
                Completion::Failed(err)
            }
        }
    }

    /// Run one whole submission on the current thread.
    ///
    /// `Ok(None)` means the trigger was ignored because another submission
    /// is in flight.
    pub fn submit(
        &mut self,
        session: &mut Session,
        predictor: &dyn Predictor,
    ) -> Result<Option<Decision>, SubmissionError> {
        let ticket = match self.begin(session) {
            Begin::Started(ticket) => ticket,
            Begin::Ignored => return Ok(None),
            Begin::Invalid(err) => return Err(err),
        };

        let result = predictor.predict(&ticket.payload);
        match self.complete(session, ticket.id, result) {
            Completion::Decided(decision) => Ok(Some(decision)),
            Completion::Failed(err) => Err(err),
            Completion::Stale => Ok(None),
        }
    }
}
