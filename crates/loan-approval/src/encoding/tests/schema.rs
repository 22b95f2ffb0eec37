use super::common::*;
use crate::encoding::schema::BUILTIN_VERSIONS;
use crate::encoding::{
    CategoricalFeature, CategoricalField, FeatureSchema, LoanAmountBounds, NumericFeature,
    SchemaError,
};

fn bounds() -> LoanAmountBounds {
    LoanAmountBounds {
        min: 0.0,
        max: 1_000.0,
    }
}

fn columns(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|column| column.to_string()).collect()
}

#[test]
fn builtin_versions_pass_validation() {
    for version in BUILTIN_VERSIONS {
        let schema = FeatureSchema::builtin(version).expect("built-in version resolves");
        let rebuilt = FeatureSchema::new(
            schema.version(),
            schema.columns().to_vec(),
            schema.categorical_fields().to_vec(),
            schema.loan_amount_bounds(),
        )
        .expect("built-in schema is internally consistent");
        assert_eq!(rebuilt, schema);
    }
}

#[test]
fn builtin_versions_keep_their_own_references() {
    let legacy_sector = legacy()
        .categorical_field(CategoricalFeature::EmploymentSector)
        .map(|field| field.reference.clone());
    let engineered_sector = engineered()
        .categorical_field(CategoricalFeature::EmploymentSector)
        .map(|field| field.reference.clone());

    assert_eq!(legacy_sector.as_deref(), Some("other"));
    assert_eq!(engineered_sector.as_deref(), Some("unknown"));
}

#[test]
fn derived_columns_only_exist_in_engineered_version() {
    for feature in NumericFeature::ALL.into_iter().filter(|f| f.is_derived()) {
        assert!(engineered().contains(feature.column()));
        assert!(!legacy().contains(feature.column()));
    }
}

#[test]
fn duplicate_columns_are_rejected() {
    let result = FeatureSchema::new(
        "dup",
        columns(&["FICO_score", "FICO_score"]),
        Vec::new(),
        bounds(),
    );

    assert!(matches!(result, Err(SchemaError::DuplicateColumn(column)) if column == "FICO_score"));
}

#[test]
fn reference_level_must_not_have_a_column() {
    let result = FeatureSchema::new(
        "bad-reference",
        columns(&["Lender_A", "Lender_B"]),
        vec![CategoricalField::new(CategoricalFeature::Lender, "Lender", "A")],
        bounds(),
    );

    assert!(matches!(
        result,
        Err(SchemaError::ReferenceColumnPresent { column, .. }) if column == "Lender_A"
    ));
}

#[test]
fn inverted_loan_bounds_are_rejected() {
    let result = FeatureSchema::new(
        "bounds",
        columns(&["FICO_score"]),
        Vec::new(),
        LoanAmountBounds {
            min: 10.0,
            max: 1.0,
        },
    );

    assert!(matches!(result, Err(SchemaError::InvalidLoanBounds { .. })));
}

#[test]
fn unknown_selector_is_an_error() {
    assert!(matches!(
        FeatureSchema::resolve("v3"),
        Err(SchemaError::UnknownVersion(_))
    ));
    assert_eq!(
        FeatureSchema::resolve(" Legacy_V1 ").expect("case-insensitive").version(),
        "legacy_v1"
    );
}

#[test]
fn schema_json_round_trips_through_definition() {
    let schema = legacy();

    let json = serde_json::to_string(&schema).expect("serializes");
    let parsed: FeatureSchema = serde_json::from_str(&json).expect("deserializes");

    assert_eq!(parsed, schema);
    assert_eq!(parsed.position("FICO_score"), Some(1));
    let reason = parsed
        .categorical_field(CategoricalFeature::Reason)
        .expect("reason field");
    assert_eq!(reason.training_token("debt_consolidation"), "debt_conslidation");
}

#[test]
fn invalid_schema_json_surfaces_validation_error() {
    let raw = r#"{
        "version": "custom",
        "columns": ["Lender_A"],
        "categorical": [{"feature": "lender", "prefix": "Lender", "reference": "A"}],
        "loan_amount": {"min": 0.0, "max": 10.0}
    }"#;

    let err = serde_json::from_str::<FeatureSchema>(raw).expect_err("reference column present");
    assert!(err.to_string().contains("reference level"));
}

#[test]
fn with_columns_keeps_conventions() {
    let schema = engineered();
    let mut reordered = schema.columns().to_vec();
    reordered.reverse();

    let rebuilt = schema.with_columns(reordered.clone()).expect("valid reorder");

    assert_eq!(rebuilt.columns(), reordered.as_slice());
    assert_eq!(rebuilt.categorical_fields(), schema.categorical_fields());
    assert_eq!(rebuilt.position("Lender_C"), Some(0));
}

#[test]
fn dummy_positions_do_not_cross_similar_prefixes() {
    let schema = legacy();

    let status: Vec<&str> = schema
        .dummy_positions(CategoricalFeature::EmploymentStatus)
        .into_iter()
        .map(|position| schema.columns()[position].as_str())
        .collect();

    assert_eq!(
        status,
        vec!["Employment_Status_part_time", "Employment_Status_unemployed"]
    );
}
