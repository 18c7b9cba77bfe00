//! Shared domain types.
//!
//! Categorical fields are closed enums whose integer codes are what the
//! prediction service expects; the form can never hold an out-of-range code.
//! The two free-text numeric fields live in [`NumericInput`] together with a
//! validity flag that the validator updates at submission time.

use chrono::{DateTime, Local};
use clap::ValueEnum;
use serde::Serialize;

/// An enumerated form option that can be cycled through in the UI.
pub trait Choice: Copy + PartialEq + 'static {
    const ALL: &'static [Self];

    /// Human-readable label for terminal output.
    fn label(self) -> &'static str;

    fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub fn code(self) -> u8 {
        match self {
            Gender::Female => 0,
            Gender::Male => 1,
        }
    }
}

impl Choice for Gender {
    const ALL: &'static [Self] = &[Gender::Male, Gender::Female];

    fn label(self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
        }
    }
}

/// Binary answer used by `married` and `self_employed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum YesNo {
    No,
    Yes,
}

impl YesNo {
    pub fn code(self) -> u8 {
        match self {
            YesNo::No => 0,
            YesNo::Yes => 1,
        }
    }
}

impl Choice for YesNo {
    const ALL: &'static [Self] = &[YesNo::Yes, YesNo::No];

    fn label(self) -> &'static str {
        match self {
            YesNo::No => "No",
            YesNo::Yes => "Yes",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Education {
    Graduate,
    Undergraduate,
}

impl Education {
    pub fn code(self) -> u8 {
        match self {
            Education::Graduate => 0,
            Education::Undergraduate => 1,
        }
    }
}

impl Choice for Education {
    const ALL: &'static [Self] = &[Education::Graduate, Education::Undergraduate];

    fn label(self) -> &'static str {
        match self {
            Education::Graduate => "Graduate",
            Education::Undergraduate => "Undergraduate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PropertyArea {
    Rural,
    Urban,
    Semiurban,
}

impl PropertyArea {
    pub fn code(self) -> u8 {
        match self {
            PropertyArea::Rural => 0,
            PropertyArea::Urban => 1,
            PropertyArea::Semiurban => 2,
        }
    }
}

impl Choice for PropertyArea {
    const ALL: &'static [Self] = &[PropertyArea::Rural, PropertyArea::Urban, PropertyArea::Semiurban];

    fn label(self) -> &'static str {
        match self {
            PropertyArea::Rural => "Rural",
            PropertyArea::Urban => "Urban",
            PropertyArea::Semiurban => "Semiurban",
        }
    }
}

/// Number of dependents; everything from three upwards shares one code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Dependents {
    #[value(name = "0")]
    Zero,
    #[value(name = "1")]
    One,
    #[value(name = "2")]
    Two,
    #[value(name = "3+")]
    ThreePlus,
}

impl Dependents {
    pub fn code(self) -> u8 {
        match self {
            Dependents::Zero => 0,
            Dependents::One => 1,
            Dependents::Two => 2,
            Dependents::ThreePlus => 3,
        }
    }
}

impl Choice for Dependents {
    const ALL: &'static [Self] = &[
        Dependents::Zero,
        Dependents::One,
        Dependents::Two,
        Dependents::ThreePlus,
    ];

    fn label(self) -> &'static str {
        match self {
            Dependents::Zero => "0",
            Dependents::One => "1",
            Dependents::Two => "2",
            Dependents::ThreePlus => "3+",
        }
    }
}

/// Prior repayment standing. Sent to the service as `1.0` / `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CreditHistory {
    Good,
    Bad,
}

impl CreditHistory {
    pub fn value(self) -> f64 {
        match self {
            CreditHistory::Good => 1.0,
            CreditHistory::Bad => 0.0,
        }
    }
}

impl Choice for CreditHistory {
    const ALL: &'static [Self] = &[CreditHistory::Good, CreditHistory::Bad];

    fn label(self) -> &'static str {
        match self {
            CreditHistory::Good => "Good (1.0)",
            CreditHistory::Bad => "Bad (0.0)",
        }
    }
}

/// Every field of the application form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Married,
    Education,
    Gender,
    PropertyArea,
    ApplicantIncome,
    CreditHistory,
    LoanAmount,
    Dependents,
    SelfEmployed,
    CoapplicantIncome,
    LoanTerm,
}

impl FormField {
    pub const ALL: [FormField; 11] = [
        FormField::Married,
        FormField::Education,
        FormField::Gender,
        FormField::PropertyArea,
        FormField::ApplicantIncome,
        FormField::CreditHistory,
        FormField::LoanAmount,
        FormField::Dependents,
        FormField::SelfEmployed,
        FormField::CoapplicantIncome,
        FormField::LoanTerm,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            FormField::Married => "Married",
            FormField::Education => "Education",
            FormField::Gender => "Gender",
            FormField::PropertyArea => "Property Area",
            FormField::ApplicantIncome => "Applicant Income",
            FormField::CreditHistory => "Credit History",
            FormField::LoanAmount => "Loan Amount",
            FormField::Dependents => "Dependents",
            FormField::SelfEmployed => "Self Employed",
            FormField::CoapplicantIncome => "Coapplicant Income",
            FormField::LoanTerm => "Loan Term",
        }
    }

    /// Fields the user types into rather than picks from a list.
    pub fn is_text(self) -> bool {
        matches!(self, FormField::ApplicantIncome | FormField::LoanAmount)
    }

    /// Fields shown in the form but fixed for this portal.
    pub fn is_read_only(self) -> bool {
        matches!(self, FormField::CoapplicantIncome | FormField::LoanTerm)
    }
}

/// Outcome of the last parse attempt on a [`NumericInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validity {
    /// Not checked since the last edit.
    #[default]
    Unchecked,
    Valid,
    Invalid,
}

/// Uncommitted free text for a numeric field plus its validity flag.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericInput {
    raw: String,
    validity: Validity,
}

impl NumericInput {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            validity: Validity::Unchecked,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn validity(&self) -> Validity {
        self.validity
    }

    pub fn set_validity(&mut self, validity: Validity) {
        self.validity = validity;
    }

    /// Replace the text. Any previous verdict no longer applies.
    pub fn set_raw(&mut self, raw: impl Into<String>) {
        self.raw = raw.into();
        self.validity = Validity::Unchecked;
    }

    pub fn push(&mut self, c: char) {
        self.raw.push(c);
        self.validity = Validity::Unchecked;
    }

    pub fn pop(&mut self) {
        self.raw.pop();
        self.validity = Validity::Unchecked;
    }
}

/// The applicant attributes collected by the form. Every field always holds
/// a value; defaults pre-populate it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationForm {
    pub gender: Gender,
    pub married: YesNo,
    pub dependents: Dependents,
    pub education: Education,
    pub self_employed: YesNo,
    pub applicant_income: NumericInput,
    /// Kept as text: the service receives whatever number it coerces to.
    pub coapplicant_income: String,
    pub loan_amount: NumericInput,
    pub loan_term: u32,
    pub credit_history: CreditHistory,
    pub property_area: PropertyArea,
}

pub const DEFAULT_LOAN_TERM: u32 = 360;

impl Default for ApplicationForm {
    fn default() -> Self {
        Self {
            gender: Gender::Male,
            married: YesNo::Yes,
            dependents: Dependents::Zero,
            education: Education::Graduate,
            self_employed: YesNo::No,
            applicant_income: NumericInput::new("5000"),
            coapplicant_income: "0".to_string(),
            loan_amount: NumericInput::new("150"),
            loan_term: DEFAULT_LOAN_TERM,
            credit_history: CreditHistory::Good,
            property_area: PropertyArea::Urban,
        }
    }
}

impl ApplicationForm {
    /// The text input backing a typed field, if `field` is one.
    pub fn text_input_mut(&mut self, field: FormField) -> Option<&mut NumericInput> {
        match field {
            FormField::ApplicantIncome => Some(&mut self.applicant_income),
            FormField::LoanAmount => Some(&mut self.loan_amount),
            _ => None,
        }
    }

    pub fn text_input(&self, field: FormField) -> Option<&NumericInput> {
        match field {
            FormField::ApplicantIncome => Some(&self.applicant_income),
            FormField::LoanAmount => Some(&self.loan_amount),
            _ => None,
        }
    }

    /// Cycle a categorical field. Text and read-only fields are left alone.
    pub fn cycle(&mut self, field: FormField, forward: bool) {
        fn step<C: Choice>(value: &mut C, forward: bool) {
            *value = if forward { value.next() } else { value.prev() };
        }

        match field {
            FormField::Married => step(&mut self.married, forward),
            FormField::Education => step(&mut self.education, forward),
            FormField::Gender => step(&mut self.gender, forward),
            FormField::PropertyArea => step(&mut self.property_area, forward),
            FormField::CreditHistory => step(&mut self.credit_history, forward),
            FormField::Dependents => step(&mut self.dependents, forward),
            FormField::SelfEmployed => step(&mut self.self_employed, forward),
            FormField::ApplicantIncome
            | FormField::LoanAmount
            | FormField::CoapplicantIncome
            | FormField::LoanTerm => {}
        }
    }

    /// Current value of a field as shown in the form.
    pub fn display_value(&self, field: FormField) -> String {
        match field {
            FormField::Married => self.married.label().to_string(),
            FormField::Education => self.education.label().to_string(),
            FormField::Gender => self.gender.label().to_string(),
            FormField::PropertyArea => self.property_area.label().to_string(),
            FormField::ApplicantIncome => format!("$ {}", self.applicant_income.raw()),
            FormField::CreditHistory => self.credit_history.label().to_string(),
            FormField::LoanAmount => format!("$ {}", self.loan_amount.raw()),
            FormField::Dependents => self.dependents.label().to_string(),
            FormField::SelfEmployed => self.self_employed.label().to_string(),
            FormField::CoapplicantIncome => format!("$ {}", self.coapplicant_income),
            FormField::LoanTerm => format!("{} months", self.loan_term),
        }
    }
}

/// Flat request body for `POST {base}/predict`.
///
/// Only built from a form whose required numeric fields all parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestPayload {
    pub gender: u8,
    pub married: u8,
    pub dependents: u8,
    pub education: u8,
    pub self_employed: u8,
    pub applicant_income: f64,
    pub coapplicant_income: f64,
    pub loan_amount: f64,
    pub loan_term: u32,
    pub credit_history: f64,
    pub property_area: u8,
}

/// The service's categorical decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PredictionOutcome {
    Approved,
    Rejected,
}

impl PredictionOutcome {
    /// Parse the literal `status` string returned by the service.
    pub fn from_status(status: &str) -> Option<Self> {
        match status {
            "Approved" => Some(PredictionOutcome::Approved),
            "Rejected" => Some(PredictionOutcome::Rejected),
            _ => None,
        }
    }
}

/// A stored outcome together with the submission that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub submission_id: u64,
    pub outcome: PredictionOutcome,
    pub decided_at: DateTime<Local>,
}
