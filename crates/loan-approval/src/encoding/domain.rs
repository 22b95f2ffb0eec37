use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

use super::banding::FicoBand;

pub const FICO_MIN: u16 = 300;
pub const FICO_MAX: u16 = 850;

/// Applicant supplied values for a single submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantInput {
    pub requested_loan_amount: f64,
    pub fico_score: u16,
    pub monthly_gross_income: f64,
    pub monthly_housing_payment: f64,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub ever_bankrupt_or_foreclosed: bool,
    pub reason: LoanReason,
    pub employment_status: EmploymentStatus,
    pub employment_sector: EmploymentSector,
    pub lender: Lender,
}

impl ApplicantInput {
    /// Band derived from the numeric score, never from a caller supplied label.
    pub fn fico_band(&self) -> FicoBand {
        FicoBand::from_score(self.fico_score)
    }

    /// Checks ranges that do not depend on the schema version.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let amounts = [
            ("requested_loan_amount", self.requested_loan_amount),
            ("monthly_gross_income", self.monthly_gross_income),
            ("monthly_housing_payment", self.monthly_housing_payment),
        ];

        for (field, value) in amounts {
            if !value.is_finite() {
                return Err(ValidationError::NotFinite { field });
            }
            if value < 0.0 {
                return Err(ValidationError::Negative { field, value });
            }
        }

        if !(FICO_MIN..=FICO_MAX).contains(&self.fico_score) {
            return Err(ValidationError::FicoOutOfRange(self.fico_score));
        }

        Ok(())
    }

    pub(crate) fn bankruptcy_flag(&self) -> f64 {
        if self.ever_bankrupt_or_foreclosed {
            1.0
        } else {
            0.0
        }
    }
}

/// Rejected applicant input. These are caller errors, never configuration defects.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} must be non-negative (found {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("FICO score must be between 300 and 850 (found {0})")]
    FicoOutOfRange(u16),
    #[error("requested loan amount must be between {min} and {max} (found {found})")]
    LoanAmountOutOfRange { min: f64, max: f64, found: f64 },
}

/// Declared purpose of the loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanReason {
    CoverAnUnexpectedCost,
    CreditCardRefinancing,
    DebtConsolidation,
    HomeImprovement,
    MajorPurchase,
    Other,
    Business,
}

impl LoanReason {
    pub const ALL: [LoanReason; 7] = [
        LoanReason::CoverAnUnexpectedCost,
        LoanReason::CreditCardRefinancing,
        LoanReason::DebtConsolidation,
        LoanReason::HomeImprovement,
        LoanReason::MajorPurchase,
        LoanReason::Other,
        LoanReason::Business,
    ];

    pub const fn token(self) -> &'static str {
        match self {
            LoanReason::CoverAnUnexpectedCost => "cover_an_unexpected_cost",
            LoanReason::CreditCardRefinancing => "credit_card_refinancing",
            LoanReason::DebtConsolidation => "debt_consolidation",
            LoanReason::HomeImprovement => "home_improvement",
            LoanReason::MajorPurchase => "major_purchase",
            LoanReason::Other => "other",
            LoanReason::Business => "business",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            LoanReason::CoverAnUnexpectedCost => "Cover an Unexpected Cost",
            LoanReason::CreditCardRefinancing => "Credit Card Refinancing",
            LoanReason::DebtConsolidation => "Debt Consolidation",
            LoanReason::HomeImprovement => "Home Improvement",
            LoanReason::MajorPurchase => "Major Purchase",
            LoanReason::Other => "Other",
            LoanReason::Business => "Business",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    FullTime,
    PartTime,
    Unemployed,
    SelfEmployed,
}

impl EmploymentStatus {
    pub const ALL: [EmploymentStatus; 4] = [
        EmploymentStatus::FullTime,
        EmploymentStatus::PartTime,
        EmploymentStatus::Unemployed,
        EmploymentStatus::SelfEmployed,
    ];

    pub const fn token(self) -> &'static str {
        match self {
            EmploymentStatus::FullTime => "full_time",
            EmploymentStatus::PartTime => "part_time",
            EmploymentStatus::Unemployed => "unemployed",
            EmploymentStatus::SelfEmployed => "self_employed",
        }
    }
}

/// Industry of the applicant's employer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentSector {
    Other,
    #[serde(alias = "Unknown")]
    Unknown,
    CommunicationServices,
    ConsumerDiscretionary,
    ConsumerStaples,
    Energy,
    Financials,
    #[serde(alias = "healthcare")]
    HealthCare,
    Industrials,
    InformationTechnology,
    Materials,
    RealEstate,
    Utilities,
}

impl EmploymentSector {
    pub const ALL: [EmploymentSector; 13] = [
        EmploymentSector::Other,
        EmploymentSector::Unknown,
        EmploymentSector::CommunicationServices,
        EmploymentSector::ConsumerDiscretionary,
        EmploymentSector::ConsumerStaples,
        EmploymentSector::Energy,
        EmploymentSector::Financials,
        EmploymentSector::HealthCare,
        EmploymentSector::Industrials,
        EmploymentSector::InformationTechnology,
        EmploymentSector::Materials,
        EmploymentSector::RealEstate,
        EmploymentSector::Utilities,
    ];

    pub const fn token(self) -> &'static str {
        match self {
            EmploymentSector::Other => "other",
            EmploymentSector::Unknown => "unknown",
            EmploymentSector::CommunicationServices => "communication_services",
            EmploymentSector::ConsumerDiscretionary => "consumer_discretionary",
            EmploymentSector::ConsumerStaples => "consumer_staples",
            EmploymentSector::Energy => "energy",
            EmploymentSector::Financials => "financials",
            EmploymentSector::HealthCare => "health_care",
            EmploymentSector::Industrials => "industrials",
            EmploymentSector::InformationTechnology => "information_technology",
            EmploymentSector::Materials => "materials",
            EmploymentSector::RealEstate => "real_estate",
            EmploymentSector::Utilities => "utilities",
        }
    }
}

/// Partner lender the applicant prefers; each pays the platform a fixed amount on approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lender {
    A,
    B,
    C,
}

impl Lender {
    pub const ALL: [Lender; 3] = [Lender::A, Lender::B, Lender::C];

    pub const fn token(self) -> &'static str {
        match self {
            Lender::A => "A",
            Lender::B => "B",
            Lender::C => "C",
        }
    }

    /// Platform payout in dollars when an application routed to this lender is approved.
    pub const fn payout(self) -> u32 {
        match self {
            Lender::A => 250,
            Lender::B => 350,
            Lender::C => 150,
        }
    }
}

macro_rules! impl_from_token {
    ($ty:ident, $what:literal) => {
        impl_from_token!($ty, $what, []);
    };
    ($ty:ident, $what:literal, [$($alias:literal => $variant:ident),*]) => {
        impl std::str::FromStr for $ty {
            type Err = String;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let wanted = raw.trim();
                $(
                    if wanted.eq_ignore_ascii_case($alias) {
                        return Ok($ty::$variant);
                    }
                )*
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|value| value.token().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| format!("unknown {} '{}'", $what, raw))
            }
        }
    };
}

impl_from_token!(LoanReason, "loan reason");
impl_from_token!(EmploymentStatus, "employment status");
impl_from_token!(EmploymentSector, "employment sector", ["healthcare" => HealthCare]);
impl_from_token!(Lender, "lender");

/// Yes/no flag as either a boolean or the 0/1 encoding of the training data,
/// numeric or quoted.
pub(crate) fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(FlagVisitor)
}

struct FlagVisitor;

impl<'de> de::Visitor<'de> for FlagVisitor {
    type Value = bool;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("true, false, 0 or 1")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<bool, E> {
        Ok(value)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<bool, E> {
        match value {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(E::invalid_value(de::Unexpected::Unsigned(value), &self)),
        }
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<bool, E> {
        match value {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(E::invalid_value(de::Unexpected::Signed(value), &self)),
        }
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<bool, E> {
        if value == 0.0 {
            Ok(false)
        } else if value == 1.0 {
            Ok(true)
        } else {
            Err(E::invalid_value(de::Unexpected::Float(value), &self))
        }
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<bool, E> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" => Ok(true),
            "0" | "false" => Ok(false),
            _ => Err(E::invalid_value(de::Unexpected::Str(value), &self)),
        }
    }
}
