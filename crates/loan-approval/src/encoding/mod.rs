//! Turns applicant fields into the exact numeric row a trained classifier expects.
//!
//! The schema decides which columns exist and in which order; the encoder only
//! fills them. Categorical values whose dummy column the schema does not know are
//! encoded as the field's reference level.

mod banding;
pub mod derived;
mod domain;
pub mod schema;
mod vector;

#[cfg(test)]
mod tests;

pub use banding::FicoBand;
pub(crate) use domain::deserialize_flag;
pub use domain::{
    ApplicantInput, EmploymentSector, EmploymentStatus, Lender, LoanReason, ValidationError,
    FICO_MAX, FICO_MIN,
};
pub use schema::{
    CategoricalFeature, CategoricalField, FeatureSchema, LoanAmountBounds, NumericFeature,
    SchemaError,
};
pub use vector::{FeatureVector, MismatchStage, SchemaMismatch};

use std::sync::Arc;

use tracing::debug;

/// Encodes `input` against `schema`.
pub fn encode(input: &ApplicantInput, schema: &FeatureSchema) -> Result<FeatureVector, ValidationError> {
    input.validate()?;
    schema.loan_amount_bounds().check(input.requested_loan_amount)?;

    let mut vector = FeatureVector::zeroed(schema.columns());

    for feature in NumericFeature::ALL {
        if let Some(position) = schema.position(feature.column()) {
            vector.set(position, numeric_value(feature, input));
        }
    }

    for field in schema.categorical_fields() {
        let token = field.training_token(field.feature.level(input));
        if token == field.reference {
            continue;
        }

        let column = field.dummy_column(token);
        match schema.position(&column) {
            Some(position) => vector.set(position, 1.0),
            None => debug!(
                schema = schema.version(),
                field = ?field.feature,
                level = token,
                "level has no dummy column, encoding as reference"
            ),
        }
    }

    Ok(vector)
}

fn numeric_value(feature: NumericFeature, input: &ApplicantInput) -> f64 {
    match feature {
        NumericFeature::RequestedLoanAmount => input.requested_loan_amount,
        NumericFeature::FicoScore => f64::from(input.fico_score),
        NumericFeature::MonthlyGrossIncome => input.monthly_gross_income,
        NumericFeature::MonthlyHousingPayment => input.monthly_housing_payment,
        NumericFeature::EverBankruptOrForeclose => input.bankruptcy_flag(),
        NumericFeature::DebtToIncomeRatio => {
            derived::debt_to_income(input.monthly_housing_payment, input.monthly_gross_income)
        }
        NumericFeature::LoanToIncomeRatio => {
            derived::loan_to_income(input.requested_loan_amount, input.monthly_gross_income)
        }
        NumericFeature::FicoIncomeInteraction => {
            derived::fico_income_interaction(input.fico_score, input.monthly_gross_income)
        }
    }
}

/// Stateless encoder bound to one schema version for the process lifetime.
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    schema: Arc<FeatureSchema>,
}

impl FeatureEncoder {
    pub fn new(schema: FeatureSchema) -> Self {
        Self {
            schema: Arc::new(schema),
        }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn encode(&self, input: &ApplicantInput) -> Result<FeatureVector, ValidationError> {
        encode(input, &self.schema)
    }
}
