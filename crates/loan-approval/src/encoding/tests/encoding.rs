use super::common::*;
use crate::encoding::{
    encode, ApplicantInput, CategoricalFeature, EmploymentSector, EmploymentStatus,
    FeatureEncoder, Lender, LoanReason, ValidationError,
};

#[test]
fn encoded_columns_equal_schema_in_order() {
    for schema in [legacy(), engineered()] {
        for reason in LoanReason::ALL {
            let mut input = applicant();
            input.reason = reason;

            let vector = encode(&input, &schema).expect("valid applicant encodes");

            assert_eq!(vector.columns(), schema.columns());
            assert_eq!(vector.len(), schema.len());
        }
    }
}

#[test]
fn engineered_scenario_sets_expected_columns() {
    let schema = engineered();
    let vector = encode(&applicant(), &schema).expect("encodes");

    assert_eq!(value(&vector, "Requested_Loan_Amount"), 50_000.0);
    assert_eq!(value(&vector, "FICO_score"), 650.0);
    assert_eq!(value(&vector, "Ever_Bankrupt_or_Foreclose"), 0.0);
    assert_eq!(value(&vector, "Reason_debt_consolidation"), 1.0);
    assert_eq!(value(&vector, "Lender_B"), 1.0);

    let hot: Vec<&str> = all_dummy_positions(&schema)
        .into_iter()
        .filter(|position| vector.values()[*position] != 0.0)
        .map(|position| schema.columns()[position].as_str())
        .collect();
    assert_eq!(hot, vec!["Reason_debt_consolidation", "Lender_B"]);
}

#[test]
fn legacy_scenario_uses_trained_spelling_and_fico_band() {
    let schema = legacy();
    let vector = encode(&applicant(), &schema).expect("encodes");

    assert_eq!(value(&vector, "Reason_debt_conslidation"), 1.0);
    assert_eq!(value(&vector, "Fico_Score_group_fair"), 1.0);
    assert_eq!(value(&vector, "Lender_B"), 1.0);
    assert!(vector.get("Reason_debt_consolidation").is_none());
    assert!(vector.get("Debt_to_Income_Ratio").is_none());
}

#[test]
fn reference_levels_leave_all_dummies_zero() {
    let schema = legacy();
    let mut input = applicant();
    input.reason = LoanReason::CoverAnUnexpectedCost;
    input.fico_score = 820;
    input.employment_status = EmploymentStatus::FullTime;
    input.employment_sector = EmploymentSector::Other;
    input.lender = Lender::A;

    let vector = encode(&input, &schema).expect("encodes");

    for field in schema.categorical_fields() {
        assert!(
            dummies(&vector, &schema, field.feature)
                .iter()
                .all(|value| *value == 0.0),
            "{:?} should be all zero at its reference level",
            field.feature
        );
    }
}

#[test]
fn known_levels_set_exactly_one_dummy() {
    let schema = legacy();
    let field = schema
        .categorical_field(CategoricalFeature::EmploymentSector)
        .expect("sector field declared");

    for sector in EmploymentSector::ALL {
        let mut input = applicant();
        input.employment_sector = sector;
        let vector = encode(&input, &schema).expect("encodes");
        let values = dummies(&vector, &schema, CategoricalFeature::EmploymentSector);
        let column = field.dummy_column(field.training_token(sector.token()));

        if schema.contains(&column) {
            assert_eq!(values.iter().sum::<f64>(), 1.0, "{sector:?}");
            assert_eq!(value(&vector, &column), 1.0);
        } else {
            assert!(values.iter().all(|value| *value == 0.0), "{sector:?}");
        }
    }
}

#[test]
fn unknown_levels_encode_like_the_reference() {
    let schema = legacy();

    let mut self_employed = applicant();
    self_employed.employment_status = EmploymentStatus::SelfEmployed;
    let mut full_time = applicant();
    full_time.employment_status = EmploymentStatus::FullTime;
    assert_eq!(
        encode(&self_employed, &schema).expect("encodes"),
        encode(&full_time, &schema).expect("encodes")
    );

    let mut business = applicant();
    business.reason = LoanReason::Business;
    let mut reference = applicant();
    reference.reason = LoanReason::CoverAnUnexpectedCost;
    assert_eq!(
        encode(&business, &schema).expect("encodes"),
        encode(&reference, &schema).expect("encodes")
    );
}

#[test]
fn engineered_schema_treats_other_sector_as_unknown() {
    let schema = engineered();

    let other = applicant();
    let mut unknown = applicant();
    unknown.employment_sector = EmploymentSector::Unknown;

    assert_eq!(
        encode(&other, &schema).expect("encodes"),
        encode(&unknown, &schema).expect("encodes")
    );
}

#[test]
fn engineered_schema_maps_health_care_to_trained_column() {
    let schema = engineered();
    let mut input = applicant();
    input.employment_sector = EmploymentSector::HealthCare;

    let vector = encode(&input, &schema).expect("encodes");

    assert_eq!(value(&vector, "Employment_Sector_healthcare"), 1.0);
}

#[test]
fn fico_band_columns_follow_half_open_edges() {
    let schema = legacy();
    let cases = [
        (579, Some("Fico_Score_group_poor")),
        (580, Some("Fico_Score_group_fair")),
        (669, Some("Fico_Score_group_fair")),
        (670, Some("Fico_Score_group_good")),
        (739, Some("Fico_Score_group_good")),
        (740, Some("Fico_Score_group_very_good")),
        (799, Some("Fico_Score_group_very_good")),
        (800, None),
    ];

    for (score, expected) in cases {
        let mut input = applicant();
        input.fico_score = score;
        let vector = encode(&input, &schema).expect("encodes");
        let values = dummies(&vector, &schema, CategoricalFeature::FicoScoreGroup);

        match expected {
            Some(column) => {
                assert_eq!(value(&vector, column), 1.0, "score {score}");
                assert_eq!(values.iter().sum::<f64>(), 1.0, "score {score}");
            }
            None => assert!(values.iter().all(|value| *value == 0.0), "score {score}"),
        }
    }
}

#[test]
fn derived_ratios_are_written_when_schema_expects_them() {
    let schema = engineered();
    let vector = encode(&applicant(), &schema).expect("encodes");

    assert!((value(&vector, "Debt_to_Income_Ratio") - 0.30).abs() < 1e-12);
    assert!((value(&vector, "Loan_to_Income_Ratio") - 50_000.0 / 60_000.0).abs() < 1e-12);
    assert_eq!(value(&vector, "FICO_Income_Interaction"), 650.0 * 5_000.0);
}

#[test]
fn zero_income_defines_ratios_as_zero() {
    let schema = engineered();
    let mut input = applicant();
    input.monthly_gross_income = 0.0;

    let vector = encode(&input, &schema).expect("zero income is valid");

    assert_eq!(value(&vector, "Debt_to_Income_Ratio"), 0.0);
    assert_eq!(value(&vector, "Loan_to_Income_Ratio"), 0.0);
    assert_eq!(value(&vector, "FICO_Income_Interaction"), 0.0);
}

#[test]
fn bankruptcy_flag_encodes_as_one() {
    let mut input = applicant();
    input.ever_bankrupt_or_foreclosed = true;

    let vector = encode(&input, &legacy()).expect("encodes");

    assert_eq!(value(&vector, "Ever_Bankrupt_or_Foreclose"), 1.0);
}

#[test]
fn bankruptcy_flag_accepts_training_data_encoding() {
    let body = |flag: &str| {
        format!(
            r#"{{"requested_loan_amount": 50000, "fico_score": 650,
                "monthly_gross_income": 5000, "monthly_housing_payment": 1500,
                "ever_bankrupt_or_foreclosed": {flag}, "reason": "business",
                "employment_status": "full_time", "employment_sector": "energy",
                "lender": "A"}}"#
        )
    };

    for (flag, expected) in [
        ("1", true),
        ("0", false),
        ("\"1\"", true),
        ("\"0\"", false),
        ("true", true),
        ("false", false),
    ] {
        let input: ApplicantInput =
            serde_json::from_str(&body(flag)).unwrap_or_else(|err| panic!("{flag}: {err}"));
        assert_eq!(input.ever_bankrupt_or_foreclosed, expected, "flag {flag}");
    }

    let err = serde_json::from_str::<ApplicantInput>(&body("2")).expect_err("not a flag");
    assert!(err.to_string().contains("true, false, 0 or 1"));
}

#[test]
fn missing_bankruptcy_flag_defaults_to_false() {
    let raw = r#"{"requested_loan_amount": 50000, "fico_score": 650,
        "monthly_gross_income": 5000, "monthly_housing_payment": 1500,
        "reason": "business", "employment_status": "full_time",
        "employment_sector": "energy", "lender": "A"}"#;

    let input: ApplicantInput = serde_json::from_str(raw).expect("deserializes");
    assert!(!input.ever_bankrupt_or_foreclosed);
}

#[test]
fn parsing_levels_accepts_the_same_aliases_as_json() {
    assert_eq!(
        "healthcare".parse::<EmploymentSector>(),
        Ok(EmploymentSector::HealthCare)
    );
    assert_eq!(
        " Health_Care ".parse::<EmploymentSector>(),
        Ok(EmploymentSector::HealthCare)
    );
    assert_eq!("b".parse::<Lender>(), Ok(Lender::B));
    assert!("vacation".parse::<LoanReason>().is_err());
}

#[test]
fn invalid_inputs_are_rejected_before_encoding() {
    let schema = engineered();

    let mut negative = applicant();
    negative.monthly_housing_payment = -1.0;
    assert!(matches!(
        encode(&negative, &schema),
        Err(ValidationError::Negative {
            field: "monthly_housing_payment",
            ..
        })
    ));

    let mut not_finite = applicant();
    not_finite.monthly_gross_income = f64::NAN;
    assert!(matches!(
        encode(&not_finite, &schema),
        Err(ValidationError::NotFinite { .. })
    ));

    let mut fico = applicant();
    fico.fico_score = 900;
    assert_eq!(
        encode(&fico, &schema),
        Err(ValidationError::FicoOutOfRange(900))
    );
}

#[test]
fn loan_bounds_depend_on_schema_version() {
    let mut input = applicant();
    input.requested_loan_amount = 200_000.0;

    assert!(matches!(
        encode(&input, &legacy()),
        Err(ValidationError::LoanAmountOutOfRange { max, .. }) if max == 150_000.0
    ));
    assert!(encode(&input, &engineered()).is_ok());

    input.requested_loan_amount = 1_000.0;
    assert!(encode(&input, &legacy()).is_ok());
    assert!(encode(&input, &engineered()).is_err());
}

#[test]
fn encoder_is_deterministic() {
    let encoder = FeatureEncoder::new(engineered());

    let first = encoder.encode(&applicant()).expect("encodes");
    let second = encoder.encode(&applicant()).expect("encodes");

    assert_eq!(first, second);
    assert_eq!(encoder.schema().version(), "engineered_v2");
}
