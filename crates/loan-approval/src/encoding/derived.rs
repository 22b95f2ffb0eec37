//! Engineered affordability features shared by the encoder and the assessment.

/// Housing payment over gross monthly income; 0 when there is no income.
pub fn debt_to_income(monthly_housing_payment: f64, monthly_gross_income: f64) -> f64 {
    if monthly_gross_income > 0.0 {
        monthly_housing_payment / monthly_gross_income
    } else {
        0.0
    }
}

/// Requested amount over annual gross income; 0 when there is no income.
pub fn loan_to_income(requested_loan_amount: f64, monthly_gross_income: f64) -> f64 {
    if monthly_gross_income > 0.0 {
        requested_loan_amount / (monthly_gross_income * 12.0)
    } else {
        0.0
    }
}

pub fn fico_income_interaction(fico_score: u16, monthly_gross_income: f64) -> f64 {
    f64::from(fico_score) * monthly_gross_income
}
