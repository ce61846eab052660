use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving a sanitization policy.
///
/// These only occur when a policy is built. Once an `AutoSanitizer` exists,
/// sanitizing a value cannot fail.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("Invalid pattern in {field}: {source}")]
    InvalidPattern {
        field: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid unicode normalization form: {0}")]
    InvalidNormalizationForm(String),

    #[error("Failed to read policy file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse policy file {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Unsupported policy file format: {0}")]
    UnsupportedFormat(String),
}
