use std::sync::Arc;

use serde_json::Value;

use super::transformer::sanitize_string;
use super::walker::clean_value;
use super::write_back::{is_truthy, write_back};
use crate::domain::errors::PolicyError;
use crate::domain::overrides::PolicyOverrides;
use crate::domain::policy::Policy;

/// The three request substructures handed to the sanitizer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestData {
    pub body: Option<Value>,
    pub query: Option<Value>,
    pub params: Option<Value>,
}

impl RequestData {
    pub fn new(body: Option<Value>, query: Option<Value>, params: Option<Value>) -> Self {
        Self {
            body,
            query,
            params,
        }
    }
}

/// Request sanitizer bound to one resolved policy.
///
/// Cloning is cheap and every clone shares the same policy, so a single
/// instance can serve any number of concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct AutoSanitizer {
    policy: Arc<Policy>,
}

impl AutoSanitizer {
    pub fn new(policy: Policy) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }

    /// Merge `overrides` onto the defaults once and build a sanitizer
    pub fn from_overrides(overrides: PolicyOverrides) -> Result<Self, PolicyError> {
        let policy = overrides.resolve()?;
        tracing::info!(
            blocked_patterns = policy.blocked_patterns.len(),
            max_string_length = ?policy.max_string_length,
            write_back = %policy.write_back,
            "sanitization policy resolved"
        );
        Ok(Self::new(policy))
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn sanitize_string(&self, input: &str, field_name: Option<&str>) -> Option<String> {
        sanitize_string(input, &self.policy, field_name)
    }

    /// Sanitized copy of `value`, `None` if the value is dropped entirely
    pub fn clean(&self, value: &Value) -> Option<Value> {
        clean_value(value, &self.policy)
    }

    /// Sanitize one request slot in place.
    ///
    /// Falsy values and primitives are left as they are.
    pub fn sanitize_in_place(&self, target: &mut Value) {
        if !is_truthy(target) || !(target.is_array() || target.is_object()) {
            return;
        }
        let cleaned = self.clean(target);
        write_back(target, cleaned, self.policy.write_back);
    }

    /// Sanitize body, query and path parameters. Never fails.
    pub fn sanitize_request(&self, request: &mut RequestData) {
        for slot in [&mut request.body, &mut request.query, &mut request.params] {
            if let Some(value) = slot.as_mut() {
                self.sanitize_in_place(value);
            }
        }
    }
}
