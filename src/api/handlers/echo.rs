use axum::{
    body::Bytes,
    extract::RawQuery,
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};

use crate::api::errors::ApiError;
use crate::api::middleware::input_sanitization::query::parse_query;
use crate::api::middleware::SanitizedPathParams;

/// POST /v1/echo, GET /v1/echo/{id}
/// Echo the request data as the handler receives it, after sanitization
pub async fn echo_handler(
    params: SanitizedPathParams,
    RawQuery(raw_query): RawQuery,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let query = match raw_query.as_deref().filter(|q| !q.is_empty()) {
        Some(raw) => parse_query(raw)
            .map_err(|e| ApiError::bad_request(format!("Invalid query string: {}", e)))?,
        None => json!({}),
    };

    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {}", e)))?
    };

    Ok((
        StatusCode::OK,
        Json(json!({
            "params": params.into_value(),
            "query": query,
            "body": body,
        })),
    ))
}
