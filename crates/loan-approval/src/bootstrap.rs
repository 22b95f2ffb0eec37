use tracing::{info, warn};

use crate::config::ModelConfig;
use crate::encoding::FeatureSchema;
use crate::error::AppError;
use crate::model::{Classifier, LoadedArtifacts};
use crate::prediction::LoanPredictor;

/// Resolves the schema, loads the artifacts and checks that they agree.
/// Any failure here is a deployment defect and must stop the process.
pub fn load_predictor(config: &ModelConfig) -> Result<LoanPredictor, AppError> {
    let mut schema = FeatureSchema::resolve(&config.schema)?;
    info!(
        selector = %config.schema,
        schema = schema.version(),
        columns = schema.len(),
        "feature schema selected"
    );

    let artifacts = LoadedArtifacts::load(&config.model_path, config.scaler_path.as_deref())?;

    if config.schema_from_artifact {
        match artifacts.classifier.feature_names() {
            Some(names) => {
                schema = schema.with_columns(names.to_vec())?;
                info!(columns = schema.len(), "column order taken from model artifact");
            }
            None => warn!("model artifact records no feature names, keeping schema column order"),
        }
    }

    Ok(LoanPredictor::from_artifacts(schema, artifacts)?)
}
