use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::matcher::{Matcher, SharedMatcher};
use crate::domain::value_objects::{NormalizationForm, WriteBackMode};

/// Fully resolved sanitization policy.
///
/// A policy is built once (usually from [`PolicyOverrides`](super::overrides::PolicyOverrides))
/// and then shared read-only between every request.
#[derive(Debug, Clone)]
pub struct Policy {
    /// Strip leading/trailing whitespace
    pub trim_strings: bool,
    /// Delete `<...>` tag-shaped substrings
    pub remove_html: bool,
    /// Delete `'` and `"` characters
    pub escape_quotes: bool,
    /// Delete pictograph, symbol, flag and dingbat characters
    pub remove_emojis: bool,
    /// Delete C0 and C1 control characters
    pub remove_unicode_control: bool,
    /// Delete case-insensitive occurrences of "script"
    pub block_script_keywords: bool,
    /// Patterns deleted in order
    pub blocked_patterns: Vec<SharedMatcher>,
    /// Delete `*`, `;` and `--`
    pub strip_sql_meta: bool,
    /// Lowercase values stored under the `email` field
    pub lowercase_emails: bool,
    /// Fields whose values are lowercased
    pub normalize_fields: HashSet<String>,
    /// Unicode normalization form, `None` disables normalization
    pub unicode_normalize_form: Option<NormalizationForm>,
    /// Single-character pattern; `None` allows every character
    pub allowed_chars: Option<SharedMatcher>,
    /// Collapse whitespace runs to a single space
    pub collapse_whitespace: bool,
    /// Maximum length in characters, `None` disables truncation
    pub max_string_length: Option<usize>,
    /// Keep empty results instead of dropping them
    pub allow_empty_strings: bool,
    /// Recurse into arrays
    pub sanitize_arrays: bool,
    /// Fields passed through untouched
    pub ignore_fields: HashSet<String>,
    /// When non-empty, the only fields that get sanitized
    pub sanitize_only_fields: HashSet<String>,
    /// Deepest container nesting that is still walked
    pub max_depth: Option<usize>,
    /// How sanitized mappings are grafted back onto request data
    pub write_back: WriteBackMode,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            trim_strings: true,
            remove_html: true,
            escape_quotes: true,
            remove_emojis: false,
            remove_unicode_control: false,
            block_script_keywords: true,
            blocked_patterns: Vec::new(),
            strip_sql_meta: true,
            lowercase_emails: true,
            normalize_fields: HashSet::new(),
            unicode_normalize_form: Some(NormalizationForm::Nfc),
            allowed_chars: None,
            collapse_whitespace: false,
            max_string_length: Some(Self::DEFAULT_MAX_STRING_LENGTH),
            allow_empty_strings: false,
            sanitize_arrays: true,
            ignore_fields: HashSet::new(),
            sanitize_only_fields: HashSet::new(),
            max_depth: None,
            write_back: WriteBackMode::Merge,
        }
    }
}

impl Policy {
    pub const DEFAULT_MAX_STRING_LENGTH: usize = 500;

    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `field` (absent fields count as `""`) is ignored
    pub fn is_ignored(&self, field: &str) -> bool {
        self.ignore_fields.contains(field)
    }

    /// Whether `field` falls outside a non-empty `sanitize_only_fields` list
    pub fn is_outside_only_list(&self, field: &str) -> bool {
        !self.sanitize_only_fields.is_empty() && !self.sanitize_only_fields.contains(field)
    }

    pub fn with_trim_strings(mut self, enabled: bool) -> Self {
        self.trim_strings = enabled;
        self
    }

    pub fn with_remove_html(mut self, enabled: bool) -> Self {
        self.remove_html = enabled;
        self
    }

    pub fn with_escape_quotes(mut self, enabled: bool) -> Self {
        self.escape_quotes = enabled;
        self
    }

    pub fn with_remove_emojis(mut self, enabled: bool) -> Self {
        self.remove_emojis = enabled;
        self
    }

    pub fn with_remove_unicode_control(mut self, enabled: bool) -> Self {
        self.remove_unicode_control = enabled;
        self
    }

    pub fn with_block_script_keywords(mut self, enabled: bool) -> Self {
        self.block_script_keywords = enabled;
        self
    }

    /// Append a blocked pattern; patterns run in insertion order
    pub fn with_blocked_pattern<M: Matcher + 'static>(mut self, matcher: M) -> Self {
        self.blocked_patterns.push(Arc::new(matcher));
        self
    }

    pub fn with_strip_sql_meta(mut self, enabled: bool) -> Self {
        self.strip_sql_meta = enabled;
        self
    }

    pub fn with_lowercase_emails(mut self, enabled: bool) -> Self {
        self.lowercase_emails = enabled;
        self
    }

    pub fn with_normalize_field(mut self, field: impl Into<String>) -> Self {
        self.normalize_fields.insert(field.into());
        self
    }

    pub fn with_unicode_normalize_form(mut self, form: Option<NormalizationForm>) -> Self {
        self.unicode_normalize_form = form;
        self
    }

    pub fn with_allowed_chars<M: Matcher + 'static>(mut self, matcher: M) -> Self {
        self.allowed_chars = Some(Arc::new(matcher));
        self
    }

    pub fn with_collapse_whitespace(mut self, enabled: bool) -> Self {
        self.collapse_whitespace = enabled;
        self
    }

    /// Set the truncation limit; `0` disables truncation
    pub fn with_max_string_length(mut self, length: usize) -> Self {
        self.max_string_length = (length > 0).then_some(length);
        self
    }

    pub fn with_allow_empty_strings(mut self, enabled: bool) -> Self {
        self.allow_empty_strings = enabled;
        self
    }

    pub fn with_sanitize_arrays(mut self, enabled: bool) -> Self {
        self.sanitize_arrays = enabled;
        self
    }

    pub fn with_ignore_field(mut self, field: impl Into<String>) -> Self {
        self.ignore_fields.insert(field.into());
        self
    }

    pub fn with_sanitize_only_field(mut self, field: impl Into<String>) -> Self {
        self.sanitize_only_fields.insert(field.into());
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_write_back(mut self, mode: WriteBackMode) -> Self {
        self.write_back = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_policy_defaults() {
        let policy = Policy::default();

        assert!(policy.trim_strings);
        assert!(policy.remove_html);
        assert!(policy.escape_quotes);
        assert!(policy.strip_sql_meta);
        assert!(policy.block_script_keywords);
        assert!(policy.lowercase_emails);
        assert!(policy.sanitize_arrays);
        assert!(!policy.remove_emojis);
        assert!(!policy.remove_unicode_control);
        assert!(!policy.collapse_whitespace);
        assert!(!policy.allow_empty_strings);
        assert_eq!(policy.max_string_length, Some(500));
        assert_eq!(policy.unicode_normalize_form, Some(NormalizationForm::Nfc));
        assert!(policy.allowed_chars.is_none());
        assert!(policy.blocked_patterns.is_empty());
        assert_eq!(policy.write_back, WriteBackMode::Merge);
        assert_eq!(policy.max_depth, None);
    }

    #[test]
    fn test_policy_builder() {
        let policy = Policy::new()
            .with_trim_strings(false)
            .with_collapse_whitespace(true)
            .with_max_string_length(0)
            .with_blocked_pattern(Regex::new("foo").unwrap())
            .with_ignore_field("password")
            .with_sanitize_only_field("name");

        assert!(!policy.trim_strings);
        assert!(policy.collapse_whitespace);
        assert_eq!(policy.max_string_length, None);
        assert_eq!(policy.blocked_patterns.len(), 1);
        assert!(policy.is_ignored("password"));
        assert!(policy.is_outside_only_list("bio"));
        assert!(!policy.is_outside_only_list("name"));
    }

    #[test]
    fn test_only_list_empty_means_everything() {
        let policy = Policy::default();
        assert!(!policy.is_outside_only_list(""));
        assert!(!policy.is_outside_only_list("anything"));
    }
}
