use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    extract::{FromRequestParts, RawPathParams, Request},
    http::{header, request::Parts, uri::PathAndQuery, HeaderMap, HeaderValue, Uri},
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};
use tower::{Layer, Service};

use super::config::InputSanitizationConfig;
use super::query::{encode_query, parse_query};
use crate::api::errors::ApiError;
use crate::application::engine::AutoSanitizer;

/// Sanitized path parameters, inserted into the request extensions.
///
/// axum keeps its own copy of the captured parameters, so handlers that want
/// the sanitized values extract this type instead of `Path`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SanitizedPathParams(pub Map<String, Value>);

impl SanitizedPathParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl<S> FromRequestParts<S> for SanitizedPathParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().cloned().unwrap_or_default())
    }
}

/// Layer sanitizing JSON bodies, query strings and path parameters.
///
/// Path parameters only exist once a route matched, so apply the layer with
/// `Router::layer` or `Router::route_layer`.
#[derive(Clone)]
pub struct InputSanitizationLayer {
    sanitizer: AutoSanitizer,
    config: Arc<InputSanitizationConfig>,
}

impl InputSanitizationLayer {
    pub fn new(sanitizer: AutoSanitizer, config: InputSanitizationConfig) -> Self {
        Self {
            sanitizer,
            config: Arc::new(config),
        }
    }
}

impl<S> Layer<S> for InputSanitizationLayer
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Service = InputSanitizationService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        InputSanitizationService {
            inner,
            sanitizer: self.sanitizer.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

#[derive(Clone)]
pub struct InputSanitizationService<S> {
    inner: S,
    sanitizer: AutoSanitizer,
    config: Arc<InputSanitizationConfig>,
}

impl<S> Service<Request> for InputSanitizationService<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let sanitizer = self.sanitizer.clone();
        let config = Arc::clone(&self.config);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            match sanitize_request(request, &sanitizer, &config).await {
                Ok(request) => inner.call(request).await,
                Err(response) => Ok(response),
            }
        })
    }
}

async fn sanitize_request(
    request: Request,
    sanitizer: &AutoSanitizer,
    config: &InputSanitizationConfig,
) -> Result<Request, Response> {
    let (mut parts, body) = request.into_parts();

    let body = if config.sanitize_body && is_json_content(&parts.headers) {
        sanitize_body(&mut parts, body, sanitizer, config).await?
    } else {
        body
    };

    if config.sanitize_query {
        sanitize_query(&mut parts, sanitizer);
    }

    if config.sanitize_path_params {
        sanitize_path_params(&mut parts, sanitizer).await;
    }

    Ok(Request::from_parts(parts, body))
}

async fn sanitize_body(
    parts: &mut Parts,
    body: Body,
    sanitizer: &AutoSanitizer,
    config: &InputSanitizationConfig,
) -> Result<Body, Response> {
    if let Some(length) = parse_content_length(&parts.headers) {
        if length > config.max_body_bytes {
            tracing::warn!(
                content_length = length,
                max_body_bytes = config.max_body_bytes,
                "declared body size exceeds sanitization limit"
            );
            return Err(body_too_large(config.max_body_bytes));
        }
    }

    let bytes = match axum::body::to_bytes(body, config.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "failed to buffer request body for sanitization");
            return Err(body_too_large(config.max_body_bytes));
        }
    };

    if bytes.is_empty() {
        return Ok(Body::from(bytes));
    }

    let mut value: Value = match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "request body is not valid JSON, forwarding as is");
            return Ok(Body::from(bytes));
        }
    };

    if !(value.is_object() || value.is_array()) {
        return Ok(Body::from(bytes));
    }

    sanitizer.sanitize_in_place(&mut value);

    match serde_json::to_vec(&value) {
        Ok(sanitized) => {
            parts
                .headers
                .insert(header::CONTENT_LENGTH, HeaderValue::from(sanitized.len()));
            Ok(Body::from(sanitized))
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to re-encode sanitized body");
            Ok(Body::from(bytes))
        }
    }
}

fn sanitize_query(parts: &mut Parts, sanitizer: &AutoSanitizer) {
    let raw = match parts.uri.query() {
        Some(raw) if !raw.is_empty() => raw,
        _ => return,
    };

    let mut query = match parse_query(raw) {
        Ok(query) => query,
        Err(e) => {
            tracing::warn!(error = %e, "unparseable query string left untouched");
            return;
        }
    };

    sanitizer.sanitize_in_place(&mut query);

    let encoded = match encode_query(&query) {
        Ok(encoded) => encoded,
        Err(e) => {
            tracing::warn!(error = %e, "failed to re-encode sanitized query");
            return;
        }
    };

    match replace_query(&parts.uri, &encoded) {
        Some(uri) => parts.uri = uri,
        None => tracing::warn!("failed to rebuild request URI with sanitized query"),
    }
}

async fn sanitize_path_params(parts: &mut Parts, sanitizer: &AutoSanitizer) {
    let raw = match RawPathParams::from_request_parts(parts, &()).await {
        Ok(raw) => raw,
        Err(_) => return,
    };

    let map: Map<String, Value> = raw
        .iter()
        .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
        .collect();
    if map.is_empty() {
        return;
    }

    let mut params = Value::Object(map);
    sanitizer.sanitize_in_place(&mut params);

    if let Value::Object(map) = params {
        parts.extensions.insert(SanitizedPathParams(map));
    }
}

pub(super) fn replace_query(uri: &Uri, query: &str) -> Option<Uri> {
    let path_and_query = if query.is_empty() {
        uri.path().to_string()
    } else {
        format!("{}?{}", uri.path(), query)
    };

    let mut uri_parts = uri.clone().into_parts();
    uri_parts.path_and_query = Some(PathAndQuery::try_from(path_and_query).ok()?);
    Uri::from_parts(uri_parts).ok()
}

fn body_too_large(max_body_bytes: usize) -> Response {
    ApiError::payload_too_large(format!("Request body exceeds {} bytes", max_body_bytes))
        .into_response()
}

fn parse_content_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<usize>().ok())
}

pub(super) fn is_json_content(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .and_then(|ct| ct.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

/// Create the sanitization layer for a sanitizer and adapter config
pub fn create_input_sanitization_middleware(
    sanitizer: AutoSanitizer,
    config: InputSanitizationConfig,
) -> InputSanitizationLayer {
    InputSanitizationLayer::new(sanitizer, config)
}
