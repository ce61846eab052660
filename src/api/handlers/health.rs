use axum::{http::StatusCode, response::Json};
use serde_json::json;

/// GET /health
/// Basic liveness check
pub async fn health_handler() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "auto_sanitize",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
