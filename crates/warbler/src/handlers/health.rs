//! Health check endpoint.

use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

/// GET /healthz - Basic liveness probe.
///
/// Returns 200 immediately. Does not touch storage.
#[axum::debug_handler]
pub async fn healthz() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}
