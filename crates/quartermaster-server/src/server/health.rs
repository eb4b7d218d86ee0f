//! Liveness check.

use axum::Json;
use serde_json::{Value, json};

/// `GET /health`
///
/// If this handler runs, the server is accepting requests.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
