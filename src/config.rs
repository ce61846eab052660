use std::path::PathBuf;

use thiserror::Error;

use crate::api::middleware::InputSanitizationConfig;
use crate::application::AutoSanitizer;
use crate::domain::{PolicyError, PolicyOverrides};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("LISTEN_ADDR cannot be empty")]
    EmptyListenAddr,

    #[error("MAX_BODY_BYTES must be at least 1")]
    ZeroBodyLimit,

    #[error("Policy file does not exist: {}", .0.display())]
    MissingPolicyFile(PathBuf),
}

/// Log output format for the service binary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    /// TOML/YAML/JSON file holding policy overrides; defaults apply when unset
    pub policy_file: Option<PathBuf>,
    pub max_body_bytes: usize,
    pub sanitize_body: bool,
    pub sanitize_query: bool,
    pub sanitize_path_params: bool,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        let adapter = InputSanitizationConfig::default();
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            policy_file: None,
            max_body_bytes: adapter.max_body_bytes,
            sanitize_body: adapter.sanitize_body,
            sanitize_query: adapter.sanitize_query,
            sanitize_path_params: adapter.sanitize_path_params,
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            policy_file: std::env::var("SANITIZER_POLICY_FILE")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
            max_body_bytes: env_parse("MAX_BODY_BYTES").unwrap_or(defaults.max_body_bytes),
            sanitize_body: env_parse("SANITIZE_BODY").unwrap_or(defaults.sanitize_body),
            sanitize_query: env_parse("SANITIZE_QUERY").unwrap_or(defaults.sanitize_query),
            sanitize_path_params: env_parse("SANITIZE_PATH_PARAMS")
                .unwrap_or(defaults.sanitize_path_params),
            log_format: match std::env::var("LOG_FORMAT")
                .unwrap_or_default()
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Text,
            },
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listen_addr.trim().is_empty() {
            return Err(ConfigError::EmptyListenAddr);
        }

        if self.max_body_bytes == 0 {
            return Err(ConfigError::ZeroBodyLimit);
        }

        if let Some(path) = &self.policy_file {
            if !path.exists() {
                return Err(ConfigError::MissingPolicyFile(path.clone()));
            }
        }

        Ok(())
    }

    /// Adapter settings for the sanitization layer
    pub fn input_sanitization(&self) -> InputSanitizationConfig {
        InputSanitizationConfig::new()
            .with_max_body_bytes(self.max_body_bytes)
            .with_body_sanitization(self.sanitize_body)
            .with_query_sanitization(self.sanitize_query)
            .with_path_param_sanitization(self.sanitize_path_params)
    }

    /// Resolve the policy file (or the defaults) into a sanitizer
    pub fn load_sanitizer(&self) -> Result<AutoSanitizer, PolicyError> {
        let overrides = match &self.policy_file {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading sanitization policy");
                PolicyOverrides::from_path(path)?
            }
            None => PolicyOverrides::default(),
        };
        AutoSanitizer::from_overrides(overrides)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}
