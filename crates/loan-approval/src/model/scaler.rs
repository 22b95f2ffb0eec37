use super::artifact::ArtifactError;
use super::{check_width, ModelError, Scaler};

/// Per-column standardization `(x - mean) / scale` fitted at training time.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
    feature_names: Option<Vec<String>>,
}

impl StandardScaler {
    pub fn new(
        mean: Vec<f64>,
        scale: Vec<f64>,
        feature_names: Option<Vec<String>>,
    ) -> Result<Self, ArtifactError> {
        if mean.is_empty() || mean.len() != scale.len() {
            return Err(ArtifactError::Invalid(format!(
                "scaler mean has {} entries but scale has {}",
                mean.len(),
                scale.len()
            )));
        }

        if mean.iter().chain(scale.iter()).any(|value| !value.is_finite()) {
            return Err(ArtifactError::Invalid(
                "scaler parameters must be finite".to_string(),
            ));
        }

        if let Some(names) = &feature_names {
            if names.len() != mean.len() {
                return Err(ArtifactError::Invalid(format!(
                    "scaler lists {} feature names for {} columns",
                    names.len(),
                    mean.len()
                )));
            }
        }

        // Constant training columns were fit with a zero scale; they pass through centred.
        let scale = scale
            .into_iter()
            .map(|value| if value == 0.0 { 1.0 } else { value })
            .collect();

        Ok(Self {
            mean,
            scale,
            feature_names,
        })
    }
}

impl Scaler for StandardScaler {
    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, ModelError> {
        check_width("scaler", self.mean.len(), row)?;
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(value, (mean, scale))| (value - mean) / scale)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standardizes_each_column() {
        let scaler = StandardScaler::new(vec![10.0, 0.0], vec![2.0, 0.5], None).expect("valid");

        let scaled = scaler.transform(&[14.0, 1.0]).expect("right width");

        assert_eq!(scaled, vec![2.0, 2.0]);
    }

    #[test]
    fn zero_scale_leaves_column_centred() {
        let scaler = StandardScaler::new(vec![1.0], vec![0.0], None).expect("valid");
        assert_eq!(scaler.transform(&[3.0]).expect("transforms"), vec![2.0]);
    }

    #[test]
    fn rejects_mismatched_parameters_and_rows() {
        assert!(StandardScaler::new(vec![1.0, 2.0], vec![1.0], None).is_err());

        let scaler = StandardScaler::new(vec![0.0, 0.0], vec![1.0, 1.0], None).expect("valid");
        assert!(matches!(
            scaler.transform(&[1.0]),
            Err(ModelError::InputShape { expected: 2, found: 1, .. })
        ));
    }
}
