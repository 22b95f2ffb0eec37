use crate::encoding::{
    ApplicantInput, CategoricalFeature, EmploymentSector, EmploymentStatus, FeatureSchema,
    FeatureVector, Lender, LoanReason,
};

/// Applicant used throughout the scenarios: mid-range credit, moderate housing cost.
pub(super) fn applicant() -> ApplicantInput {
    ApplicantInput {
        requested_loan_amount: 50_000.0,
        fico_score: 650,
        monthly_gross_income: 5_000.0,
        monthly_housing_payment: 1_500.0,
        ever_bankrupt_or_foreclosed: false,
        reason: LoanReason::DebtConsolidation,
        employment_status: EmploymentStatus::FullTime,
        employment_sector: EmploymentSector::Other,
        lender: Lender::B,
    }
}

pub(super) fn legacy() -> FeatureSchema {
    FeatureSchema::legacy_v1()
}

pub(super) fn engineered() -> FeatureSchema {
    FeatureSchema::engineered_v2()
}

pub(super) fn value(vector: &FeatureVector, column: &str) -> f64 {
    vector
        .get(column)
        .unwrap_or_else(|| panic!("column {column} missing from vector"))
}

/// Values of every dummy column owned by `feature`.
pub(super) fn dummies(
    vector: &FeatureVector,
    schema: &FeatureSchema,
    feature: CategoricalFeature,
) -> Vec<f64> {
    schema
        .dummy_positions(feature)
        .into_iter()
        .map(|position| vector.values()[position])
        .collect()
}

pub(super) fn all_dummy_positions(schema: &FeatureSchema) -> Vec<usize> {
    schema
        .categorical_fields()
        .iter()
        .flat_map(|field| schema.dummy_positions(field.feature))
        .collect()
}
