use serde::{Deserialize, Serialize};

/// Which parts of a request the sanitization layer touches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSanitizationConfig {
    /// Largest JSON body buffered for sanitization, in bytes
    pub max_body_bytes: usize,
    /// Sanitize JSON request bodies
    pub sanitize_body: bool,
    /// Sanitize the query string
    pub sanitize_query: bool,
    /// Sanitize matched path parameters
    pub sanitize_path_params: bool,
}

impl Default for InputSanitizationConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 2 * 1024 * 1024, // 2MB
            sanitize_body: true,
            sanitize_query: true,
            sanitize_path_params: true,
        }
    }
}

impl InputSanitizationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_body_bytes(mut self, bytes: usize) -> Self {
        self.max_body_bytes = bytes;
        self
    }

    pub fn with_body_sanitization(mut self, enabled: bool) -> Self {
        self.sanitize_body = enabled;
        self
    }

    pub fn with_query_sanitization(mut self, enabled: bool) -> Self {
        self.sanitize_query = enabled;
        self
    }

    pub fn with_path_param_sanitization(mut self, enabled: bool) -> Self {
        self.sanitize_path_params = enabled;
        self
    }
}
