use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::Recommendation,
};

use super::AppState;

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub recommendations: Recommendation,
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Recommends dishes for every meal slot from a user profile
///
/// Scoring is CPU-bound, so the pipeline runs on the blocking pool.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<RecommendResponse>> {
    tracing::info!(request_id = %request_id, "Processing recommendation request");

    let result = match body {
        Ok(Json(body)) => {
            let pipeline = state.pipeline.clone();
            tokio::task::spawn_blocking(move || pipeline.recommend_from_json(&body))
                .await
                .map_err(|e| AppError::Internal(e.to_string()))
                .and_then(|outcome| outcome)
        }
        Err(rejection) => Err(AppError::InvalidRequest(rejection.body_text())),
    };

    match result {
        Ok(recommendations) => {
            tracing::info!(request_id = %request_id, "Recommendation completed");
            Ok(Json(RecommendResponse { recommendations }))
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                kind = e.kind(),
                error = %e,
                "Recommendation failed"
            );
            Err(e)
        }
    }
}
