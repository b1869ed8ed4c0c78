//! HTTP handlers

pub mod analyze;
pub mod health;

use axum::{http::StatusCode, Json};
use serde_json::{json, Value};

/// JSON 404 for unknown routes
pub async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" })))
}

/// JSON 405 for known routes hit with the wrong method
pub async fn method_not_allowed() -> (StatusCode, Json<Value>) {
    (StatusCode::METHOD_NOT_ALLOWED, Json(json!({ "error": "Method Not Allowed" })))
}
