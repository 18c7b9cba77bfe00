//! Parsing of the free-text numeric fields.
//!
//! Categorical fields cannot be invalid, so only `applicant_income` and
//! `loan_amount` pass through here. Parsing is strict: the whole (trimmed)
//! text must be a finite number.

use thiserror::Error;

use crate::domain::{ApplicationForm, FormField, Validity};

pub const NOT_A_NUMBER: &str = "not a number";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {}", .field.display_name(), .reason)]
pub struct ValidationError {
    pub field: FormField,
    pub reason: &'static str,
}

/// Required amounts that parsed successfully. Only obtainable from
/// [`validate_form`], so a payload can never be assembled from a form that
/// failed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedAmounts {
    pub applicant_income: f64,
    pub loan_amount: f64,
}

/// Parse one required numeric field.
///
/// Empty text, anything with trailing or leading garbage, and `NaN`/infinite
/// results are rejected.
pub fn parse_required_number(field: FormField, raw: &str) -> Result<f64, ValidationError> {
    let invalid = || ValidationError {
        field,
        reason: NOT_A_NUMBER,
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }
    let value = trimmed.parse::<f64>().map_err(|_| invalid())?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid())
    }
}

/// Validate every required numeric field, recording the verdict on each
/// input's validity flag. All failures are reported, not just the first.
pub fn validate_form(form: &mut ApplicationForm) -> Result<ValidatedAmounts, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut check = |field: FormField, form: &mut ApplicationForm| -> Option<f64> {
        let input = form.text_input_mut(field)?;
        match parse_required_number(field, input.raw()) {
            Ok(value) => {
                input.set_validity(Validity::Valid);
                Some(value)
            }
            Err(err) => {
                input.set_validity(Validity::Invalid);
                errors.push(err);
                None
            }
        }
    };

    let applicant_income = check(FormField::ApplicantIncome, form);
    let loan_amount = check(FormField::LoanAmount, form);

    match (applicant_income, loan_amount) {
        (Some(applicant_income), Some(loan_amount)) => Ok(ValidatedAmounts {
            applicant_income,
            loan_amount,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_finite_numbers() {
        let field = FormField::ApplicantIncome;
        assert_eq!(parse_required_number(field, "5000").unwrap(), 5000.0);
        assert_eq!(parse_required_number(field, "150.25").unwrap(), 150.25);
        assert_eq!(parse_required_number(field, " 42 ").unwrap(), 42.0);
        assert_eq!(parse_required_number(field, "1e3").unwrap(), 1000.0);
        assert_eq!(parse_required_number(field, "-7").unwrap(), -7.0);
    }

    #[test]
    fn rejects_empty_alphabetic_and_non_finite() {
        for raw in ["", "   ", "abc", "NaN", "nan", "inf", "-infinity", "1e400"] {
            let err = parse_required_number(FormField::LoanAmount, raw).unwrap_err();
            assert_eq!(err.field, FormField::LoanAmount, "input {raw:?}");
            assert_eq!(err.reason, NOT_A_NUMBER);
        }
    }

    #[test]
    fn rejects_extraneous_text_instead_of_truncating() {
        for raw in ["150abc", "12.5.1", "5 000", "$100", "1_000"] {
            assert!(
                parse_required_number(FormField::ApplicantIncome, raw).is_err(),
                "{raw:?} should not parse"
            );
        }
    }

    #[test]
    fn validate_form_reports_every_invalid_field_and_flags_it() {
        let mut form = ApplicationForm::default();
        form.applicant_income.set_raw("abc");
        form.loan_amount.set_raw("");

        let errors = validate_form(&mut form).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec![FormField::ApplicantIncome, FormField::LoanAmount]);
        assert_eq!(form.applicant_income.validity(), Validity::Invalid);
        assert_eq!(form.loan_amount.validity(), Validity::Invalid);
        // Text is left exactly as typed.
        assert_eq!(form.applicant_income.raw(), "abc");
    }

    #[test]
    fn validate_form_returns_parsed_amounts() {
        let mut form = ApplicationForm::default();
        let amounts = validate_form(&mut form).unwrap();
        assert_eq!(amounts.applicant_income, 5000.0);
        assert_eq!(amounts.loan_amount, 150.0);
        assert_eq!(form.loan_amount.validity(), Validity::Valid);
    }

    #[test]
    fn error_message_names_field() {
        let err = parse_required_number(FormField::LoanAmount, "x").unwrap_err();
        assert_eq!(err.to_string(), "Loan Amount: not a number");
    }
}
