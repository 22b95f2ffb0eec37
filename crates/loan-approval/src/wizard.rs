//! Three-step application form. The caller owns the stepper and moves it
//! forward or back explicitly; nothing is shared between sessions.

use serde::{Deserialize, Serialize};

use crate::encoding::{
    ApplicantInput, EmploymentSector, EmploymentStatus, Lender, LoanReason, ValidationError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStep {
    ApplicantInfo,
    FinancialDetails,
    Prediction,
}

impl FormStep {
    pub const fn title(self) -> &'static str {
        match self {
            FormStep::ApplicantInfo => "Applicant Information",
            FormStep::FinancialDetails => "Financial Details",
            FormStep::Prediction => "Prediction",
        }
    }

    const fn previous(self) -> Option<FormStep> {
        match self {
            FormStep::ApplicantInfo => None,
            FormStep::FinancialDetails => Some(FormStep::ApplicantInfo),
            FormStep::Prediction => Some(FormStep::FinancialDetails),
        }
    }
}

/// Categorical answers collected on the first step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantInfo {
    pub reason: LoanReason,
    pub employment_status: EmploymentStatus,
    pub employment_sector: EmploymentSector,
    pub lender: Lender,
}

/// Amounts and credit history collected on the second step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialDetails {
    pub requested_loan_amount: f64,
    pub fico_score: u16,
    pub monthly_gross_income: f64,
    pub monthly_housing_payment: f64,
    #[serde(default, deserialize_with = "crate::encoding::deserialize_flag")]
    pub ever_bankrupt_or_foreclosed: bool,
}

#[derive(Debug, Clone)]
pub struct FormStepper {
    step: FormStep,
    applicant: Option<ApplicantInfo>,
    financial: Option<FinancialDetails>,
}

impl Default for FormStepper {
    fn default() -> Self {
        Self::new()
    }
}

impl FormStepper {
    pub fn new() -> Self {
        Self {
            step: FormStep::ApplicantInfo,
            applicant: None,
            financial: None,
        }
    }

    pub fn step(&self) -> FormStep {
        self.step
    }

    pub fn applicant(&self) -> Option<&ApplicantInfo> {
        self.applicant.as_ref()
    }

    pub fn financial(&self) -> Option<&FinancialDetails> {
        self.financial.as_ref()
    }

    /// Records the first step and moves to financial details.
    pub fn submit_applicant(&mut self, info: ApplicantInfo) -> Result<FormStep, StepError> {
        self.expect_step(FormStep::ApplicantInfo)?;
        self.applicant = Some(info);
        self.step = FormStep::FinancialDetails;
        Ok(self.step)
    }

    /// Records the second step and moves to prediction. Values that can never
    /// be valid are rejected here; the loan amount range is left to the schema.
    pub fn submit_financials(&mut self, details: FinancialDetails) -> Result<FormStep, StepError> {
        self.expect_step(FormStep::FinancialDetails)?;
        let applicant = self
            .applicant
            .as_ref()
            .ok_or(StepError::Incomplete(FormStep::ApplicantInfo))?;

        compose(applicant, &details).validate()?;

        self.financial = Some(details);
        self.step = FormStep::Prediction;
        Ok(self.step)
    }

    /// Returns to the previous step. Answers already given are kept.
    pub fn back(&mut self) -> Result<FormStep, StepError> {
        let previous = self.step.previous().ok_or(StepError::AtFirstStep)?;
        self.step = previous;
        Ok(previous)
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// The completed form, available once the stepper reaches `Prediction`.
    pub fn submission(&self) -> Result<ApplicantInput, StepError> {
        self.expect_step(FormStep::Prediction)?;
        let applicant = self
            .applicant
            .as_ref()
            .ok_or(StepError::Incomplete(FormStep::ApplicantInfo))?;
        let financial = self
            .financial
            .as_ref()
            .ok_or(StepError::Incomplete(FormStep::FinancialDetails))?;

        Ok(compose(applicant, financial))
    }

    fn expect_step(&self, expected: FormStep) -> Result<(), StepError> {
        if self.step != expected {
            return Err(StepError::WrongStep {
                expected,
                current: self.step,
            });
        }
        Ok(())
    }
}

fn compose(applicant: &ApplicantInfo, financial: &FinancialDetails) -> ApplicantInput {
    ApplicantInput {
        requested_loan_amount: financial.requested_loan_amount,
        fico_score: financial.fico_score,
        monthly_gross_income: financial.monthly_gross_income,
        monthly_housing_payment: financial.monthly_housing_payment,
        ever_bankrupt_or_foreclosed: financial.ever_bankrupt_or_foreclosed,
        reason: applicant.reason,
        employment_status: applicant.employment_status,
        employment_sector: applicant.employment_sector,
        lender: applicant.lender,
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StepError {
    #[error("form is on step '{}', not '{}'", .current.title(), .expected.title())]
    WrongStep { expected: FormStep, current: FormStep },
    #[error("already on the first step")]
    AtFirstStep,
    #[error("step '{}' has not been completed", .0.title())]
    Incomplete(FormStep),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
