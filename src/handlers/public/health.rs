// handlers/public/health.rs - GET /health handler

use axum::{extract::State, http::StatusCode};
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Liveness plus a round trip to the store. A failing store answers 503 with the detail.
pub async fn health_get(State(state): State<AppState>) -> ApiResult<Value> {
    let timestamp = chrono::Utc::now().to_rfc3339();

    match state.store.health_check().await {
        Ok(()) => Ok(ApiResponse::success(json!({
            "status": "ok",
            "timestamp": timestamp,
            "database": "ok"
        }))),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            Ok(ApiResponse::with_status(
                json!({
                    "status": "degraded",
                    "timestamp": timestamp,
                    "database": format!("error: {}", e)
                }),
                StatusCode::SERVICE_UNAVAILABLE,
            ))
        }
    }
}
