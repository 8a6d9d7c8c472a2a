//! Liveness endpoint.

use axum::Json;
use serde_json::{Value, json};

/// GET `/test` - fixed diagnostic payload, no side effects.
pub async fn diagnostics() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
