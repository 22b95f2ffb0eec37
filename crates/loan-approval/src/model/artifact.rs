use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{LogisticRegression, StandardScaler, DEFAULT_THRESHOLD};

/// Standardization parameters, either embedded in a model package or shipped
/// as a separate file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerArtifact {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

impl ScalerArtifact {
    pub fn into_scaler(self) -> Result<StandardScaler, ArtifactError> {
        StandardScaler::new(self.mean, self.scale, self.feature_names)
    }
}

/// Serialized classifier bundle: the model, its tuned threshold, the feature
/// order it was fit on and, optionally, the scaler it was trained behind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPackage {
    #[serde(default = "default_model_type")]
    pub model_type: String,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler: Option<ScalerArtifact>,
}

fn default_model_type() -> String {
    "Logistic Regression".to_string()
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

/// Classifier plus the scaler it expects, ready to be shared for the process lifetime.
#[derive(Debug, Clone)]
pub struct LoadedArtifacts {
    pub classifier: LogisticRegression,
    pub scaler: Option<StandardScaler>,
}

impl ModelPackage {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(std::io::BufReader::new(file)).map_err(|source| ArtifactError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn into_artifacts(self) -> Result<LoadedArtifacts, ArtifactError> {
        let scaler = self.scaler.map(ScalerArtifact::into_scaler).transpose()?;
        let classifier = LogisticRegression::new(
            self.model_type,
            self.threshold,
            self.feature_names,
            self.coefficients,
            self.intercept,
        )?;

        Ok(LoadedArtifacts { classifier, scaler })
    }
}

impl LoadedArtifacts {
    /// Loads the model package and, when given, a standalone scaler file that
    /// takes precedence over any scaler embedded in the package.
    pub fn load(model_path: &Path, scaler_path: Option<&Path>) -> Result<Self, ArtifactError> {
        let mut artifacts = ModelPackage::from_path(model_path)?.into_artifacts()?;

        if let Some(path) = scaler_path {
            let raw = std::fs::File::open(path).map_err(|source| ArtifactError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let scaler: ScalerArtifact =
                serde_json::from_reader(std::io::BufReader::new(raw)).map_err(|source| {
                    ArtifactError::Json {
                        path: path.to_path_buf(),
                        source,
                    }
                })?;
            artifacts.scaler = Some(scaler.into_scaler()?);
        }

        info!(
            model = %model_path.display(),
            scaled = artifacts.scaler.is_some(),
            "model artifacts loaded"
        );

        Ok(artifacts)
    }
}

/// Artifact could not be loaded. Fatal at startup; no prediction is attempted.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to read artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("corrupt artifact {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid artifact: {0}")]
    Invalid(String),
}
