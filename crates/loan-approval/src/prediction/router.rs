use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use super::{LoanPrediction, LoanPredictor, PredictionError};
use crate::encoding::ApplicantInput;

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub evaluated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub prediction: LoanPrediction,
}

/// Router exposing prediction and model metadata endpoints.
pub fn prediction_router(predictor: Arc<LoanPredictor>) -> Router {
    Router::new()
        .route("/api/v1/loan/predictions", post(predict_handler))
        .route("/api/v1/loan/model", get(model_handler))
        .with_state(predictor)
}

pub(crate) async fn predict_handler(
    State(predictor): State<Arc<LoanPredictor>>,
    Json(input): Json<ApplicantInput>,
) -> Response {
    match predictor.predict(&input) {
        Ok(prediction) => {
            let body = PredictionResponse {
                evaluated_at: Utc::now(),
                prediction,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(PredictionError::Invalid(err)) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(PredictionError::SchemaMismatch(mismatch)) => {
            error!(%mismatch, "encoded row rejected by model");
            let payload = json!({
                "error": mismatch.to_string(),
                "mismatch": mismatch,
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
        Err(other) => {
            error!(error = %other, "prediction failed");
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn model_handler(State(predictor): State<Arc<LoanPredictor>>) -> Response {
    (StatusCode::OK, Json(predictor.model_info())).into_response()
}
