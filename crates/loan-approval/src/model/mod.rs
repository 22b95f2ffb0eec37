//! Pre-trained artifacts consumed as black boxes: a binary classifier and an
//! optional scaling transform, both loaded once and shared read-only.

mod artifact;
mod logistic;
mod scaler;

pub use artifact::{ArtifactError, LoadedArtifacts, ModelPackage, ScalerArtifact};
pub use logistic::LogisticRegression;
pub use scaler::StandardScaler;

use serde::{Deserialize, Serialize};

pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Binary label produced by a classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Denied,
    Approved,
}

impl Verdict {
    pub const fn label(self) -> &'static str {
        match self {
            Verdict::Denied => "denied",
            Verdict::Approved => "approved",
        }
    }

    pub const fn class_index(self) -> u8 {
        match self {
            Verdict::Denied => 0,
            Verdict::Approved => 1,
        }
    }
}

/// Probability distribution over `{denied, approved}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    pub denied: f64,
    pub approved: f64,
}

impl ClassProbabilities {
    pub fn from_approved(approved: f64) -> Self {
        Self {
            denied: 1.0 - approved,
            approved,
        }
    }

    pub fn as_array(&self) -> [f64; 2] {
        [self.denied, self.approved]
    }
}

/// Trained binary classifier over positional rows.
pub trait Classifier: Send + Sync {
    fn model_type(&self) -> &str;

    /// Column order the model was fit on, when the artifact records it.
    fn feature_names(&self) -> Option<&[String]>;

    fn n_features(&self) -> usize;

    /// Approval probability at or above which the verdict is `Approved`.
    fn threshold(&self) -> f64 {
        DEFAULT_THRESHOLD
    }

    fn predict_proba(&self, row: &[f64]) -> Result<ClassProbabilities, ModelError>;

    fn predict(&self, row: &[f64]) -> Result<Verdict, ModelError> {
        let probabilities = self.predict_proba(row)?;
        if probabilities.approved >= self.threshold() {
            Ok(Verdict::Approved)
        } else {
            Ok(Verdict::Denied)
        }
    }
}

/// Pre-fitted transform applied to an aligned row before prediction.
pub trait Scaler: Send + Sync {
    fn n_features(&self) -> usize;

    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, ModelError>;
}

/// The only failure the artifacts model: a row of the wrong width.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("{artifact} expects {expected} features, received {found}")]
    InputShape {
        artifact: &'static str,
        expected: usize,
        found: usize,
    },
}

pub(crate) fn check_width(
    artifact: &'static str,
    expected: usize,
    row: &[f64],
) -> Result<(), ModelError> {
    if row.len() != expected {
        return Err(ModelError::InputShape {
            artifact,
            expected,
            found: row.len(),
        });
    }
    Ok(())
}
