pub mod extract;
pub mod products;

use axum::{
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::error::{AppError, AppResult};

pub const JSON_CONTENT_TYPE: &str = "application/json";

pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(json!({ "status": 200, "message": "OK" })))
}

/// Rejects the request with 415 unless `Content-Type` is exactly `expected`.
/// Runs before the body is looked at.
pub fn require_content_type(headers: &HeaderMap, expected: &'static str) -> AppResult<()> {
    let Some(value) = headers.get(header::CONTENT_TYPE) else {
        error!("No Content-Type specified.");
        return Err(AppError::UnsupportedMediaType(expected));
    };

    if value.as_bytes() == expected.as_bytes() {
        return Ok(());
    }

    error!(content_type = ?value, "Invalid Content-Type");
    Err(AppError::UnsupportedMediaType(expected))
}
