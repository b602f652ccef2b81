use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::server::AppState;

/// GET /api/public
pub async fn server_status() -> Json<Value> {
    Json(json!({ "message": "Server is running" }))
}

/// GET /health - pings storage
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.repo.health_check().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "status": "degraded" })))
        }
    }
}
