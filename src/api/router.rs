use axum::{
    routing::{get, post},
    Router,
};

use crate::api::handlers::{echo_handler, health_handler};
use crate::api::middleware::{create_input_sanitization_middleware, InputSanitizationConfig};
use crate::application::AutoSanitizer;

/// Create router with all routes and the sanitization layer
pub fn create_router(sanitizer: AutoSanitizer, config: InputSanitizationConfig) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_handler))
        // Echo routes, useful to observe what handlers receive
        .route("/v1/echo", post(echo_handler).get(echo_handler))
        .route("/v1/echo/{id}", post(echo_handler).get(echo_handler))
        // Layered after the routes so matched path params are visible to it
        .layer(create_input_sanitization_middleware(sanitizer, config))
}
