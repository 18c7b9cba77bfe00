//! Command-line parsing for the loan application portal.
//!
//! Argument parsing and command dispatch are kept apart from the submission
//! pipeline; this module only describes the surface.

use clap::{Args, Parser, Subcommand};

use crate::domain::{
    ApplicationForm, CreditHistory, DEFAULT_LOAN_TERM, Dependents, Education, Gender, NumericInput,
    PropertyArea, YesNo,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "loan", version, about = "Loan application portal for a remote approval model")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive form (default).
    Tui(ServiceArgs),
    /// Submit one application from flags and print the decision.
    Predict(PredictArgs),
}

#[derive(Debug, Args, Clone, Default)]
pub struct ServiceArgs {
    /// Prediction service base address (overrides LOAN_API_URL).
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub service: ServiceArgs,

    /// Declared monthly income of the applicant.
    #[arg(long, value_name = "AMOUNT", allow_hyphen_values = true)]
    pub applicant_income: String,

    /// Requested loan amount.
    #[arg(long, value_name = "AMOUNT", allow_hyphen_values = true)]
    pub loan_amount: String,

    /// Declared monthly income of the co-applicant.
    #[arg(long, value_name = "AMOUNT", default_value = "0", allow_hyphen_values = true)]
    pub coapplicant_income: String,

    #[arg(long, value_enum, default_value_t = Gender::Male)]
    pub gender: Gender,

    #[arg(long, value_enum, default_value_t = YesNo::Yes)]
    pub married: YesNo,

    #[arg(long, value_enum, default_value_t = Dependents::Zero)]
    pub dependents: Dependents,

    #[arg(long, value_enum, default_value_t = Education::Graduate)]
    pub education: Education,

    #[arg(long, value_enum, default_value_t = YesNo::No)]
    pub self_employed: YesNo,

    #[arg(long, value_enum, default_value_t = PropertyArea::Urban)]
    pub property_area: PropertyArea,

    #[arg(long, value_enum, default_value_t = CreditHistory::Good)]
    pub credit_history: CreditHistory,

    /// Loan term in months.
    #[arg(long, default_value_t = DEFAULT_LOAN_TERM)]
    pub loan_term: u32,

    /// Print the decision as JSON.
    #[arg(long)]
    pub json: bool,
}

impl PredictArgs {
    /// Form state equivalent to these flags. Amounts stay raw text so they
    /// go through the same validation as the interactive form.
    pub fn to_form(&self) -> ApplicationForm {
        ApplicationForm {
            gender: self.gender,
            married: self.married,
            dependents: self.dependents,
            education: self.education,
            self_employed: self.self_employed,
            applicant_income: NumericInput::new(self.applicant_income.clone()),
            coapplicant_income: self.coapplicant_income.clone(),
            loan_amount: NumericInput::new(self.loan_amount.clone()),
            loan_term: self.loan_term,
            credit_history: self.credit_history,
            property_area: self.property_area,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_defaults_match_form_defaults() {
        let cli = Cli::parse_from([
            "loan",
            "predict",
            "--applicant-income",
            "5000",
            "--loan-amount",
            "150",
        ]);
        let Command::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        assert_eq!(args.to_form(), ApplicationForm::default());
        assert!(args.service.api_url.is_none());
    }

    #[test]
    fn dependents_accept_three_plus() {
        let cli = Cli::parse_from([
            "loan",
            "predict",
            "--applicant-income",
            "1",
            "--loan-amount",
            "abc",
            "--dependents",
            "3+",
            "--property-area",
            "semiurban",
            "--api-url",
            "http://10.0.0.5:8000",
        ]);
        let Command::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        assert_eq!(args.dependents, Dependents::ThreePlus);
        assert_eq!(args.property_area, PropertyArea::Semiurban);
        assert_eq!(args.loan_amount, "abc");
        assert_eq!(args.service.api_url.as_deref(), Some("http://10.0.0.5:8000"));
    }
}
