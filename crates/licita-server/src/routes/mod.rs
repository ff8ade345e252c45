//! API route handlers
//!
//! - `extract`: PDF upload and text extraction
//! - `analyze`: structured analysis of extracted text
//! - `health`: liveness

pub mod analyze;
pub mod extract;
pub mod health;

use axum::Json;
use axum::response::IntoResponse;
use serde_json::json;

use crate::error::ServerError;

/// API version and base info
pub async fn api_info() -> impl IntoResponse {
    Json(json!({
        "name": "licita",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ["/api/extract", "/api/analyze", "/health"]
    }))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
