//! Assembly of the request body from a validated form.

use crate::domain::{ApplicationForm, RequestPayload};
use crate::form::validate::ValidatedAmounts;

/// Build the service payload.
///
/// Takes the [`ValidatedAmounts`] produced by validation rather than
/// re-reading the text inputs, so a payload is never partially populated.
pub fn build_payload(form: &ApplicationForm, amounts: ValidatedAmounts) -> RequestPayload {
    RequestPayload {
        gender: form.gender.code(),
        married: form.married.code(),
        dependents: form.dependents.code(),
        education: form.education.code(),
        self_employed: form.self_employed.code(),
        applicant_income: amounts.applicant_income,
        coapplicant_income: coerce_number(&form.coapplicant_income),
        loan_amount: amounts.loan_amount,
        loan_term: form.loan_term,
        credit_history: form.credit_history.value(),
        property_area: form.property_area.code(),
    }
}

/// Force an optional amount to a number: blank or unusable text becomes `0.0`.
fn coerce_number(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}
