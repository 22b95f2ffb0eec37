use serde::{Deserialize, Serialize};

use super::decision::LoanDecision;
use crate::encoding::derived::{debt_to_income, loan_to_income};
use crate::encoding::{ApplicantInput, EmploymentStatus, FicoBand, Lender};

const DTI_WARNING: f64 = 0.43;
const DTI_HEALTHY: f64 = 0.36;
const LTI_WARNING: f64 = 3.0;
const LTI_HEALTHY: f64 = 2.0;
const FICO_STRONG: u16 = 700;
const FICO_WEAK: u16 = 640;

/// Explanation shown next to a decision: affordability ratios, the factors that
/// pushed the result either way, and what the applicant should do next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub fico_band: FicoBand,
    pub debt_to_income: f64,
    pub loan_to_income: f64,
    pub warnings: Vec<String>,
    pub positive_factors: Vec<String>,
    pub risk_factors: Vec<String>,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    Improve {
        steps: Vec<String>,
    },
    NextSteps {
        lender: Lender,
        expected_payout: u32,
        steps: Vec<String>,
    },
}

impl Assessment {
    pub fn new(input: &ApplicantInput, decision: &LoanDecision) -> Self {
        let dti = debt_to_income(input.monthly_housing_payment, input.monthly_gross_income);
        let lti = loan_to_income(input.requested_loan_amount, input.monthly_gross_income);

        Self {
            fico_band: input.fico_band(),
            debt_to_income: dti,
            loan_to_income: lti,
            warnings: warnings(input, dti, lti),
            positive_factors: positive_factors(input, dti, lti),
            risk_factors: risk_factors(input, dti, lti),
            recommendation: recommendation(input, decision),
        }
    }
}

fn warnings(input: &ApplicantInput, dti: f64, lti: f64) -> Vec<String> {
    let mut warnings = Vec::new();
    if input.monthly_gross_income <= 0.0 {
        return warnings;
    }

    if dti > DTI_WARNING {
        warnings.push("High DTI ratio (>43%) may reduce approval chances".to_string());
    }
    if lti > LTI_WARNING {
        warnings.push("High loan-to-income ratio (>3x) may reduce approval chances".to_string());
    }
    warnings
}

fn positive_factors(input: &ApplicantInput, dti: f64, lti: f64) -> Vec<String> {
    let mut factors = Vec::new();

    if input.fico_score >= FICO_STRONG {
        factors.push(format!("Good FICO score ({})", input.fico_score));
    }
    if dti < DTI_HEALTHY {
        factors.push(format!("Low debt-to-income ratio ({:.1}%)", dti * 100.0));
    }
    if lti < LTI_HEALTHY {
        factors.push(format!("Reasonable loan size ({lti:.1}x income)"));
    }
    if !input.ever_bankrupt_or_foreclosed {
        factors.push("No bankruptcy history".to_string());
    }
    if input.employment_status == EmploymentStatus::FullTime {
        factors.push("Full-time employment".to_string());
    }

    factors
}

fn risk_factors(input: &ApplicantInput, dti: f64, lti: f64) -> Vec<String> {
    let mut factors = Vec::new();

    if input.fico_score < FICO_WEAK {
        factors.push(format!("Low FICO score ({})", input.fico_score));
    }
    if dti > DTI_WARNING {
        factors.push(format!("High debt-to-income ratio ({:.1}%)", dti * 100.0));
    }
    if lti > LTI_WARNING {
        factors.push(format!("Large loan relative to income ({lti:.1}x)"));
    }
    if input.ever_bankrupt_or_foreclosed {
        factors.push("Bankruptcy/foreclosure history".to_string());
    }
    if input.employment_status == EmploymentStatus::PartTime {
        factors.push("Part-time employment".to_string());
    }

    factors
}

fn recommendation(input: &ApplicantInput, decision: &LoanDecision) -> Recommendation {
    if !decision.approved() {
        return Recommendation::Improve {
            steps: vec![
                "Improve your credit score by paying bills on time".to_string(),
                "Reduce your debt-to-income ratio by paying down existing debts".to_string(),
                "Consider requesting a smaller loan amount".to_string(),
                "Wait 6-12 months to build a stronger financial profile".to_string(),
            ],
        };
    }

    let lender = input.lender;
    let expected_payout = lender.payout();
    Recommendation::NextSteps {
        lender,
        expected_payout,
        steps: vec![
            "Your application shows strong approval potential".to_string(),
            format!("Expected platform payout if approved: ${expected_payout}"),
            format!("Consider applying to lender {} (selected preference)", lender.token()),
            "Ensure all documentation is accurate and complete".to_string(),
        ],
    }
}
