// src/web/api.rs
// REST API handlers

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::{HeaderValue, header::HeaderName},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::classifier::{Classification, ClassificationRequest};
use crate::dispatch::{DispatchPlan, rank_actions};
use crate::web::error::{ApiError, ApiResult};
use crate::web::state::AppState;

/// Tells clients whether the body came from the model or the fallback
pub const CLASSIFICATION_STATUS_HEADER: HeaderName =
    HeaderName::from_static("x-classification-status");

// ═══════════════════════════════════════
// HEALTH
// ═══════════════════════════════════════

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

// ═══════════════════════════════════════
// CLASSIFICATION
// ═══════════════════════════════════════

#[derive(Debug, Default, Deserialize)]
pub struct ClassifyParams {
    /// Attach a ranked action plan to model answers
    #[serde(default)]
    pub dispatch: bool,
}

pub async fn classify(
    State(state): State<AppState>,
    Query(params): Query<ClassifyParams>,
    payload: Result<Json<ClassificationRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = payload?;

    let classification = state.classifier.classify(&request).await?;
    let status = HeaderValue::from_static(classification.status_label());

    let body = match classification {
        Classification::Model(mut analysis) if params.dispatch => {
            let plan = rank_actions(&Value::Object(analysis.clone()));
            debug!(actions = plan.actions.len(), "Attached dispatch plan");
            let plan = serde_json::to_value(plan)
                .map_err(|e| ApiError::internal(format!("Failed to encode dispatch plan: {}", e)))?;
            analysis.insert("dispatch".to_string(), plan);
            Classification::Model(analysis)
        }
        other => other,
    };

    Ok(([(CLASSIFICATION_STATUS_HEADER, status)], Json(body)).into_response())
}

// ═══════════════════════════════════════
// DISPATCH
// ═══════════════════════════════════════

pub async fn dispatch(payload: Result<Json<Value>, JsonRejection>) -> ApiResult<Json<DispatchPlan>> {
    let Json(analysis) = payload?;

    if !analysis.is_object() {
        return Err(ApiError::bad_request("Analysis must be a JSON object"));
    }

    Ok(Json(rank_actions(&analysis)))
}
