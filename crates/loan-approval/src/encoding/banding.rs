use serde::{Deserialize, Serialize};

/// Credit band used by schemas that were trained on a grouped FICO category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FicoBand {
    Poor,
    Fair,
    Good,
    VeryGood,
    Excellent,
}

impl FicoBand {
    /// Half-open bands: [300,580) poor, [580,670) fair, [670,740) good,
    /// [740,800) very good, [800,850] excellent.
    pub const fn from_score(score: u16) -> Self {
        match score {
            0..=579 => FicoBand::Poor,
            580..=669 => FicoBand::Fair,
            670..=739 => FicoBand::Good,
            740..=799 => FicoBand::VeryGood,
            _ => FicoBand::Excellent,
        }
    }

    pub const fn token(self) -> &'static str {
        match self {
            FicoBand::Poor => "poor",
            FicoBand::Fair => "fair",
            FicoBand::Good => "good",
            FicoBand::VeryGood => "very_good",
            FicoBand::Excellent => "excellent",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            FicoBand::Poor => "Poor",
            FicoBand::Fair => "Fair",
            FicoBand::Good => "Good",
            FicoBand::VeryGood => "Very Good",
            FicoBand::Excellent => "Excellent",
        }
    }
}
