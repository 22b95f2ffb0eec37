use super::artifact::ArtifactError;
use super::{check_width, ClassProbabilities, Classifier, ModelError};

/// Linear model with a logistic link, as exported from the training notebook.
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegression {
    model_type: String,
    threshold: f64,
    feature_names: Option<Vec<String>>,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LogisticRegression {
    pub fn new(
        model_type: impl Into<String>,
        threshold: f64,
        feature_names: Option<Vec<String>>,
        coefficients: Vec<f64>,
        intercept: f64,
    ) -> Result<Self, ArtifactError> {
        if coefficients.is_empty() {
            return Err(ArtifactError::Invalid(
                "model declares no coefficients".to_string(),
            ));
        }

        if !intercept.is_finite() || coefficients.iter().any(|value| !value.is_finite()) {
            return Err(ArtifactError::Invalid(
                "model coefficients must be finite".to_string(),
            ));
        }

        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(ArtifactError::Invalid(format!(
                "decision threshold {threshold} must lie strictly between 0 and 1"
            )));
        }

        if let Some(names) = &feature_names {
            if names.len() != coefficients.len() {
                return Err(ArtifactError::Invalid(format!(
                    "model lists {} feature names for {} coefficients",
                    names.len(),
                    coefficients.len()
                )));
            }
        }

        Ok(Self {
            model_type: model_type.into(),
            threshold,
            feature_names,
            coefficients,
            intercept,
        })
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    fn decision_function(&self, row: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(row)
            .fold(self.intercept, |acc, (weight, value)| acc + weight * value)
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Classifier for LogisticRegression {
    fn model_type(&self) -> &str {
        &self.model_type
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn predict_proba(&self, row: &[f64]) -> Result<ClassProbabilities, ModelError> {
        check_width("classifier", self.coefficients.len(), row)?;
        let approved = sigmoid(self.decision_function(row));
        Ok(ClassProbabilities::from_approved(approved))
    }
}
