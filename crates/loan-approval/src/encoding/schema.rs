use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::{ApplicantInput, ValidationError};

pub const LEGACY_V1: &str = "legacy_v1";
pub const ENGINEERED_V2: &str = "engineered_v2";

/// Names of the schema versions compiled into the crate.
pub const BUILTIN_VERSIONS: [&str; 2] = [LEGACY_V1, ENGINEERED_V2];

/// Numeric columns the encoder knows how to fill. A schema may include any subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericFeature {
    RequestedLoanAmount,
    FicoScore,
    MonthlyGrossIncome,
    MonthlyHousingPayment,
    EverBankruptOrForeclose,
    DebtToIncomeRatio,
    LoanToIncomeRatio,
    FicoIncomeInteraction,
}

impl NumericFeature {
    pub const ALL: [NumericFeature; 8] = [
        NumericFeature::RequestedLoanAmount,
        NumericFeature::FicoScore,
        NumericFeature::MonthlyGrossIncome,
        NumericFeature::MonthlyHousingPayment,
        NumericFeature::EverBankruptOrForeclose,
        NumericFeature::DebtToIncomeRatio,
        NumericFeature::LoanToIncomeRatio,
        NumericFeature::FicoIncomeInteraction,
    ];

    pub const fn column(self) -> &'static str {
        match self {
            NumericFeature::RequestedLoanAmount => "Requested_Loan_Amount",
            NumericFeature::FicoScore => "FICO_score",
            NumericFeature::MonthlyGrossIncome => "Monthly_Gross_Income",
            NumericFeature::MonthlyHousingPayment => "Monthly_Housing_Payment",
            NumericFeature::EverBankruptOrForeclose => "Ever_Bankrupt_or_Foreclose",
            NumericFeature::DebtToIncomeRatio => "Debt_to_Income_Ratio",
            NumericFeature::LoanToIncomeRatio => "Loan_to_Income_Ratio",
            NumericFeature::FicoIncomeInteraction => "FICO_Income_Interaction",
        }
    }

    pub const fn is_derived(self) -> bool {
        matches!(
            self,
            NumericFeature::DebtToIncomeRatio
                | NumericFeature::LoanToIncomeRatio
                | NumericFeature::FicoIncomeInteraction
        )
    }
}

/// Applicant attribute that is one-hot encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalFeature {
    Reason,
    FicoScoreGroup,
    EmploymentStatus,
    EmploymentSector,
    Lender,
}

impl CategoricalFeature {
    /// Canonical token for the applicant's value of this attribute.
    pub fn level(self, input: &ApplicantInput) -> &'static str {
        match self {
            CategoricalFeature::Reason => input.reason.token(),
            CategoricalFeature::FicoScoreGroup => input.fico_band().token(),
            CategoricalFeature::EmploymentStatus => input.employment_status.token(),
            CategoricalFeature::EmploymentSector => input.employment_sector.token(),
            CategoricalFeature::Lender => input.lender.token(),
        }
    }
}

/// One-hot encoding rule for a categorical attribute. The reference level has no column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalField {
    pub feature: CategoricalFeature,
    pub prefix: String,
    pub reference: String,
    /// Canonical token to the spelling used when the model was trained.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub aliases: BTreeMap<String, String>,
}

impl CategoricalField {
    pub fn new(feature: CategoricalFeature, prefix: &str, reference: &str) -> Self {
        Self {
            feature,
            prefix: prefix.to_string(),
            reference: reference.to_string(),
            aliases: BTreeMap::new(),
        }
    }

    pub fn with_alias(mut self, canonical: &str, trained: &str) -> Self {
        self.aliases
            .insert(canonical.to_string(), trained.to_string());
        self
    }

    pub fn training_token<'a>(&'a self, canonical: &'a str) -> &'a str {
        self.aliases
            .get(canonical)
            .map(String::as_str)
            .unwrap_or(canonical)
    }

    pub fn dummy_column(&self, token: &str) -> String {
        format!("{}_{}", self.prefix, token)
    }

    pub fn owns_column(&self, column: &str) -> bool {
        column
            .strip_prefix(self.prefix.as_str())
            .map(|rest| rest.starts_with('_'))
            .unwrap_or(false)
    }
}

/// Inclusive range accepted for the requested loan amount by the form variant
/// the schema was trained for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanAmountBounds {
    pub min: f64,
    pub max: f64,
}

impl LoanAmountBounds {
    pub fn check(&self, amount: f64) -> Result<(), ValidationError> {
        if amount < self.min || amount > self.max {
            return Err(ValidationError::LoanAmountOutOfRange {
                min: self.min,
                max: self.max,
                found: amount,
            });
        }
        Ok(())
    }
}

/// Serialized form of a schema as stored in versioned JSON files.
#[derive(Debug, Clone, Deserialize)]
struct SchemaDefinition {
    version: String,
    columns: Vec<String>,
    categorical: Vec<CategoricalField>,
    loan_amount: LoanAmountBounds,
}

impl TryFrom<SchemaDefinition> for FeatureSchema {
    type Error = SchemaError;

    fn try_from(definition: SchemaDefinition) -> Result<Self, Self::Error> {
        FeatureSchema::new(
            definition.version,
            definition.columns,
            definition.categorical,
            definition.loan_amount,
        )
    }
}

/// Ordered column layout a trained model expects, together with the one-hot
/// conventions used to produce it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SchemaDefinition")]
pub struct FeatureSchema {
    version: String,
    columns: Vec<String>,
    categorical: Vec<CategoricalField>,
    loan_amount: LoanAmountBounds,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl FeatureSchema {
    pub fn new(
        version: impl Into<String>,
        columns: Vec<String>,
        categorical: Vec<CategoricalField>,
        loan_amount: LoanAmountBounds,
    ) -> Result<Self, SchemaError> {
        let version = version.into();

        if columns.is_empty() {
            return Err(SchemaError::Empty { version });
        }

        if !(loan_amount.min.is_finite()
            && loan_amount.max.is_finite()
            && loan_amount.min >= 0.0
            && loan_amount.min <= loan_amount.max)
        {
            return Err(SchemaError::InvalidLoanBounds {
                min: loan_amount.min,
                max: loan_amount.max,
            });
        }

        let mut index = HashMap::with_capacity(columns.len());
        for (position, column) in columns.iter().enumerate() {
            if index.insert(column.clone(), position).is_some() {
                return Err(SchemaError::DuplicateColumn(column.clone()));
            }
        }

        let mut seen = HashSet::new();
        for field in &categorical {
            if !seen.insert(field.feature) {
                return Err(SchemaError::DuplicateField(field.feature));
            }

            let reference_column = field.dummy_column(&field.reference);
            if index.contains_key(&reference_column) {
                return Err(SchemaError::ReferenceColumnPresent {
                    feature: field.feature,
                    column: reference_column,
                });
            }
        }

        Ok(Self {
            version,
            columns,
            categorical,
            loan_amount,
            index,
        })
    }

    /// Column set of the single-file variant: grouped FICO band, no engineered ratios,
    /// and the misspelled debt consolidation level the model was fit on.
    pub fn legacy_v1() -> Self {
        let columns = [
            "Requested_Loan_Amount",
            "FICO_score",
            "Monthly_Gross_Income",
            "Monthly_Housing_Payment",
            "Ever_Bankrupt_or_Foreclose",
            "Reason_credit_card_refinancing",
            "Reason_debt_conslidation",
            "Reason_home_improvement",
            "Reason_major_purchase",
            "Reason_other",
            "Fico_Score_group_fair",
            "Fico_Score_group_good",
            "Fico_Score_group_poor",
            "Fico_Score_group_very_good",
            "Employment_Status_part_time",
            "Employment_Status_unemployed",
            "Employment_Sector_communication_services",
            "Employment_Sector_consumer_discretionary",
            "Employment_Sector_consumer_staples",
            "Employment_Sector_energy",
            "Employment_Sector_financials",
            "Employment_Sector_health_care",
            "Employment_Sector_industrials",
            "Employment_Sector_information_technology",
            "Employment_Sector_materials",
            "Employment_Sector_real_estate",
            "Employment_Sector_utilities",
            "Lender_B",
            "Lender_C",
        ];

        let categorical = vec![
            CategoricalField::new(CategoricalFeature::Reason, "Reason", "cover_an_unexpected_cost")
                .with_alias("debt_consolidation", "debt_conslidation"),
            CategoricalField::new(
                CategoricalFeature::FicoScoreGroup,
                "Fico_Score_group",
                "excellent",
            ),
            CategoricalField::new(
                CategoricalFeature::EmploymentStatus,
                "Employment_Status",
                "full_time",
            ),
            CategoricalField::new(
                CategoricalFeature::EmploymentSector,
                "Employment_Sector",
                "other",
            ),
            CategoricalField::new(CategoricalFeature::Lender, "Lender", "A"),
        ];

        Self::builtin_from(
            LEGACY_V1,
            &columns,
            categorical,
            LoanAmountBounds {
                min: 500.0,
                max: 150_000.0,
            },
        )
    }

    /// Column set of the packaged-model variant: engineered affordability ratios,
    /// self-employment, and `unknown` as the employment sector reference.
    pub fn engineered_v2() -> Self {
        let columns = [
            "Requested_Loan_Amount",
            "FICO_score",
            "Monthly_Gross_Income",
            "Monthly_Housing_Payment",
            "Ever_Bankrupt_or_Foreclose",
            "Debt_to_Income_Ratio",
            "Loan_to_Income_Ratio",
            "FICO_Income_Interaction",
            "Reason_cover_an_unexpected_cost",
            "Reason_credit_card_refinancing",
            "Reason_debt_consolidation",
            "Reason_home_improvement",
            "Reason_major_purchase",
            "Employment_Status_part_time",
            "Employment_Status_self_employed",
            "Employment_Sector_communication_services",
            "Employment_Sector_consumer_discretionary",
            "Employment_Sector_consumer_staples",
            "Employment_Sector_energy",
            "Employment_Sector_financials",
            "Employment_Sector_healthcare",
            "Employment_Sector_industrials",
            "Employment_Sector_information_technology",
            "Employment_Sector_materials",
            "Employment_Sector_real_estate",
            "Employment_Sector_utilities",
            "Lender_B",
            "Lender_C",
        ];

        let categorical = vec![
            CategoricalField::new(CategoricalFeature::Reason, "Reason", "business"),
            CategoricalField::new(
                CategoricalFeature::EmploymentStatus,
                "Employment_Status",
                "full_time",
            ),
            CategoricalField::new(
                CategoricalFeature::EmploymentSector,
                "Employment_Sector",
                "unknown",
            )
            .with_alias("health_care", "healthcare"),
            CategoricalField::new(CategoricalFeature::Lender, "Lender", "A"),
        ];

        Self::builtin_from(
            ENGINEERED_V2,
            &columns,
            categorical,
            LoanAmountBounds {
                min: 5_000.0,
                max: 500_000.0,
            },
        )
    }

    fn builtin_from(
        version: &str,
        columns: &[&str],
        categorical: Vec<CategoricalField>,
        loan_amount: LoanAmountBounds,
    ) -> Self {
        let columns: Vec<String> = columns.iter().map(|column| column.to_string()).collect();
        let index = columns
            .iter()
            .enumerate()
            .map(|(position, column)| (column.clone(), position))
            .collect();

        Self {
            version: version.to_string(),
            columns,
            categorical,
            loan_amount,
            index,
        }
    }

    pub fn builtin(version: &str) -> Option<Self> {
        match version.trim().to_ascii_lowercase().as_str() {
            LEGACY_V1 => Some(Self::legacy_v1()),
            ENGINEERED_V2 => Some(Self::engineered_v2()),
            _ => None,
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let raw = std::fs::read_to_string(path)?;
        let schema = serde_json::from_str(&raw)?;
        Ok(schema)
    }

    /// Accepts either a built-in version name or a path to a JSON schema file.
    pub fn resolve(selector: &str) -> Result<Self, SchemaError> {
        if let Some(schema) = Self::builtin(selector) {
            return Ok(schema);
        }

        if selector.trim().ends_with(".json") {
            return Self::from_path(selector.trim());
        }

        Err(SchemaError::UnknownVersion(selector.to_string()))
    }

    /// Same one-hot conventions and bounds, with the column order taken from a
    /// model artifact that records the names it was fit on.
    pub fn with_columns(&self, columns: Vec<String>) -> Result<Self, SchemaError> {
        Self::new(
            self.version.clone(),
            columns,
            self.categorical.clone(),
            self.loan_amount,
        )
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    pub fn categorical_fields(&self) -> &[CategoricalField] {
        &self.categorical
    }

    pub fn categorical_field(&self, feature: CategoricalFeature) -> Option<&CategoricalField> {
        self.categorical
            .iter()
            .find(|field| field.feature == feature)
    }

    pub fn loan_amount_bounds(&self) -> LoanAmountBounds {
        self.loan_amount
    }

    /// Positions of every dummy column belonging to the field.
    pub fn dummy_positions(&self, feature: CategoricalFeature) -> Vec<usize> {
        match self.categorical_field(feature) {
            Some(field) => self
                .columns
                .iter()
                .enumerate()
                .filter(|(_, column)| field.owns_column(column))
                .map(|(position, _)| position)
                .collect(),
            None => Vec::new(),
        }
    }
}

impl PartialEq for FeatureSchema {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.columns == other.columns
            && self.categorical == other.categorical
            && self.loan_amount == other.loan_amount
    }
}

/// Invalid schema definitions. Always a configuration problem.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("schema {version} declares no columns")]
    Empty { version: String },
    #[error("column {0} appears more than once")]
    DuplicateColumn(String),
    #[error("categorical field {0:?} declared more than once")]
    DuplicateField(CategoricalFeature),
    #[error("reference level of {feature:?} must not have a column (found {column})")]
    ReferenceColumnPresent {
        feature: CategoricalFeature,
        column: String,
    },
    #[error("invalid loan amount bounds [{min}, {max}]")]
    InvalidLoanBounds { min: f64, max: f64 },
    #[error("unknown schema version '{0}' (expected one of legacy_v1, engineered_v2 or a .json path)")]
    UnknownVersion(String),
    #[error("failed to read schema file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid schema file: {0}")]
    Json(#[from] serde_json::Error),
}
