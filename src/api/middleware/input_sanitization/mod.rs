//! Input sanitization middleware
//!
//! Runs every JSON body, query string and matched path parameter of a request
//! through an [`AutoSanitizer`](crate::application::AutoSanitizer) before the
//! handler sees it. Content that fails to parse is forwarded untouched.

pub mod config;
pub mod middleware;
pub mod query;

#[cfg(test)]
mod tests;

// Re-export main types for convenience
pub use config::InputSanitizationConfig;
pub use middleware::{
    create_input_sanitization_middleware, InputSanitizationLayer, InputSanitizationService,
    SanitizedPathParams,
};
