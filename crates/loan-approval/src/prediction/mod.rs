//! Encode, align, scale and classify a single applicant.

mod assessment;
mod decision;
pub mod router;

pub use assessment::{Assessment, Recommendation};
pub use decision::{ConfidenceLevel, LoanDecision};
pub use router::prediction_router;

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::encoding::{
    ApplicantInput, FeatureEncoder, FeatureSchema, FeatureVector, MismatchStage, SchemaMismatch,
    ValidationError,
};
use crate::model::{Classifier, LoadedArtifacts, ModelError, Scaler};

/// Everything produced for one submission.
#[derive(Debug, Clone, Serialize)]
pub struct LoanPrediction {
    pub schema_version: String,
    pub decision: LoanDecision,
    pub assessment: Assessment,
    pub features: FeatureVector,
}

/// Static description of the loaded model for status endpoints and the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub threshold: f64,
    pub schema_version: String,
    pub scaled: bool,
    pub columns: Vec<String>,
}

/// Read-only pipeline shared by every request for the process lifetime.
pub struct LoanPredictor {
    encoder: FeatureEncoder,
    classifier: Arc<dyn Classifier>,
    scaler: Option<Arc<dyn Scaler>>,
}

impl LoanPredictor {
    /// Verifies at construction that the schema, scaler and classifier agree on
    /// the row layout, so a misconfigured deployment fails before serving.
    pub fn new(
        schema: FeatureSchema,
        classifier: Arc<dyn Classifier>,
        scaler: Option<Arc<dyn Scaler>>,
    ) -> Result<Self, PredictionError> {
        let columns = schema.columns();

        if let Some(names) = classifier.feature_names() {
            if let Some(mismatch) = SchemaMismatch::compare(MismatchStage::Startup, names, columns)
            {
                return Err(mismatch.into());
            }
        }
        if let Some(mismatch) =
            SchemaMismatch::width(MismatchStage::Startup, classifier.n_features(), columns.len())
        {
            return Err(mismatch.into());
        }

        if let Some(scaler) = &scaler {
            if let Some(names) = scaler.feature_names() {
                if let Some(mismatch) =
                    SchemaMismatch::compare(MismatchStage::Scaling, names, columns)
                {
                    return Err(mismatch.into());
                }
            }
            if let Some(mismatch) =
                SchemaMismatch::width(MismatchStage::Scaling, scaler.n_features(), columns.len())
            {
                return Err(mismatch.into());
            }
        }

        info!(
            schema = schema.version(),
            columns = columns.len(),
            model = classifier.model_type(),
            "prediction pipeline ready"
        );

        Ok(Self {
            encoder: FeatureEncoder::new(schema),
            classifier,
            scaler,
        })
    }

    pub fn from_artifacts(
        schema: FeatureSchema,
        artifacts: LoadedArtifacts,
    ) -> Result<Self, PredictionError> {
        let LoadedArtifacts { classifier, scaler } = artifacts;
        let scaler = scaler.map(|scaler| Arc::new(scaler) as Arc<dyn Scaler>);
        Self::new(schema, Arc::new(classifier), scaler)
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.encoder.schema()
    }

    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            model_type: self.classifier.model_type().to_string(),
            threshold: self.classifier.threshold(),
            schema_version: self.schema().version().to_string(),
            scaled: self.scaler.is_some(),
            columns: self.schema().columns().to_vec(),
        }
    }

    pub fn encode(&self, input: &ApplicantInput) -> Result<FeatureVector, PredictionError> {
        Ok(self.encoder.encode(input)?)
    }

    pub fn predict(&self, input: &ApplicantInput) -> Result<LoanPrediction, PredictionError> {
        let features = self.encode(input)?;
        let row = self.model_row(&features)?;
        let row = self.scale(row)?;

        let probabilities = self.classifier.predict_proba(&row)?;
        let decision = LoanDecision::new(probabilities, self.classifier.threshold());
        let assessment = Assessment::new(input, &decision);

        info!(
            verdict = decision.verdict.label(),
            probability = decision.approval_probability,
            confidence = decision.confidence.label(),
            "loan prediction made"
        );

        Ok(LoanPrediction {
            schema_version: self.schema().version().to_string(),
            decision,
            assessment,
            features,
        })
    }

    fn model_row(&self, features: &FeatureVector) -> Result<Vec<f64>, SchemaMismatch> {
        match self.classifier.feature_names() {
            Some(names) => features.aligned_to(names),
            None => match SchemaMismatch::width(
                MismatchStage::ModelInput,
                self.classifier.n_features(),
                features.len(),
            ) {
                Some(mismatch) => Err(mismatch),
                None => Ok(features.values().to_vec()),
            },
        }
    }

    fn scale(&self, row: Vec<f64>) -> Result<Vec<f64>, PredictionError> {
        let Some(scaler) = &self.scaler else {
            return Ok(row);
        };

        if let Some(mismatch) =
            SchemaMismatch::width(MismatchStage::Scaling, scaler.n_features(), row.len())
        {
            return Err(mismatch.into());
        }

        let scaled = scaler.transform(&row)?;
        if let Some(mismatch) = SchemaMismatch::width(
            MismatchStage::Scaling,
            self.classifier.n_features(),
            scaled.len(),
        ) {
            warn!(%mismatch, "scaler changed the row width");
            return Err(mismatch.into());
        }

        Ok(scaled)
    }
}

/// Failure to produce a prediction. Only `Invalid` is the caller's fault.
#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    SchemaMismatch(#[from] SchemaMismatch),
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl PredictionError {
    pub fn is_user_error(&self) -> bool {
        matches!(self, PredictionError::Invalid(_))
    }
}
