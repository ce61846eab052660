//! # auto_sanitize - Request Input Sanitization
//!
//! A configurable, best-effort text filter for untrusted request data. Given
//! an arbitrary JSON value and a policy, it produces a cleaned copy with
//! tag-shaped markup, quotes, SQL meta characters and similar content removed
//! or rewritten, and with empty fields dropped.
//!
//! ## Architecture Layers
//!
//! - **Domain**: the policy, its user-facing overrides and the matcher capability
//! - **Application**: the string pipeline, the structural walker and write-back
//! - **API**: the tower layer that applies the sanitizer to axum requests
//!
//! ## Example Usage
//!
//! ```
//! use auto_sanitize::{AutoSanitizer, PolicyOverrides, RequestData};
//! use serde_json::json;
//!
//! let sanitizer = AutoSanitizer::from_overrides(PolicyOverrides {
//!     collapse_whitespace: Some(true),
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! let mut request = RequestData {
//!     body: Some(json!({"user": {"bio": "<b>hi</b>  there"}})),
//!     ..Default::default()
//! };
//! sanitizer.sanitize_request(&mut request);
//!
//! assert_eq!(request.body, Some(json!({"user": {"bio": "hi there"}})));
//! ```

pub mod api;
pub mod application;
pub mod config;
pub mod domain;

// Re-export key types explicitly to avoid ambiguity
pub use api::errors as api_errors;
pub use api::middleware::{InputSanitizationConfig, InputSanitizationLayer, SanitizedPathParams};
pub use application::{clean_value, sanitize_string, AutoSanitizer, RequestData};
pub use config::Config;
pub use domain::errors as domain_errors;
pub use domain::value_objects::{NormalizationForm, NormalizationSetting, WriteBackMode};
pub use domain::{Matcher, Policy, PolicyError, PolicyOverrides};
