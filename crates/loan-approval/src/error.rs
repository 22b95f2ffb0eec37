use crate::batch::BatchError;
use crate::config::ConfigError;
use crate::encoding::SchemaError;
use crate::model::ArtifactError;
use crate::prediction::PredictionError;
use crate::telemetry::TelemetryError;
use crate::wizard::StepError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Artifact(ArtifactError),
    Schema(SchemaError),
    Prediction(PredictionError),
    Step(StepError),
    Batch(BatchError),
}

impl AppError {
    /// True when the caller's input was rejected, as opposed to a deployment defect.
    pub fn is_user_error(&self) -> bool {
        match self {
            AppError::Prediction(err) => err.is_user_error(),
            AppError::Step(_) => true,
            _ => false,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Artifact(err) => write!(f, "artifact error: {}", err),
            AppError::Schema(err) => write!(f, "schema error: {}", err),
            AppError::Prediction(err) if err.is_user_error() => {
                write!(f, "invalid application: {}", err)
            }
            AppError::Prediction(err) => write!(f, "prediction error: {}", err),
            AppError::Step(err) => write!(f, "form error: {}", err),
            AppError::Batch(err) => write!(f, "batch error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Artifact(err) => Some(err),
            AppError::Schema(err) => Some(err),
            AppError::Prediction(err) => Some(err),
            AppError::Step(err) => Some(err),
            AppError::Batch(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if self.is_user_error() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ArtifactError> for AppError {
    fn from(value: ArtifactError) -> Self {
        Self::Artifact(value)
    }
}

impl From<SchemaError> for AppError {
    fn from(value: SchemaError) -> Self {
        Self::Schema(value)
    }
}

impl From<PredictionError> for AppError {
    fn from(value: PredictionError) -> Self {
        Self::Prediction(value)
    }
}

impl From<StepError> for AppError {
    fn from(value: StepError) -> Self {
        Self::Step(value)
    }
}

impl From<BatchError> for AppError {
    fn from(value: BatchError) -> Self {
        Self::Batch(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::ValidationError;

    #[test]
    fn invalid_input_maps_to_unprocessable_entity() {
        let err = AppError::from(PredictionError::from(ValidationError::FicoOutOfRange(120)));

        assert!(err.is_user_error());
        assert!(err.to_string().starts_with("invalid application"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn configuration_defects_map_to_internal_error() {
        let err = AppError::from(ArtifactError::Invalid("no coefficients".to_string()));

        assert!(!err.is_user_error());
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
