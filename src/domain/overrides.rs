//! User-facing policy options.
//!
//! Every option is optional and spelled the way option documents are usually
//! written (`trimStrings`, `removeHTML`, `maxStringLength`, ...). Unset options
//! keep the [`Policy`] defaults. Resolution happens once, when the sanitizer is
//! built, and is the only place where pattern sources get compiled.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::errors::PolicyError;
use crate::domain::matcher::compile_pattern;
use crate::domain::policy::Policy;
use crate::domain::value_objects::{NormalizationSetting, WriteBackMode};

/// Partial policy as supplied by the user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyOverrides {
    pub trim_strings: Option<bool>,
    #[serde(rename = "removeHTML", alias = "removeHtml")]
    pub remove_html: Option<bool>,
    pub escape_quotes: Option<bool>,
    pub remove_emojis: Option<bool>,
    pub remove_unicode_control: Option<bool>,
    pub block_script_keywords: Option<bool>,
    /// Regular expression sources
    pub blocked_patterns: Option<Vec<String>>,
    #[serde(rename = "stripSQLMeta", alias = "stripSqlMeta")]
    pub strip_sql_meta: Option<bool>,
    pub lowercase_emails: Option<bool>,
    pub normalize_fields: Option<Vec<String>>,
    /// `NFC`, `NFD`, `NFKC`, `NFKD`, or `none`/empty to disable
    pub unicode_normalize_form: Option<NormalizationSetting>,
    /// Regular expression source tested against each character
    pub allowed_chars: Option<String>,
    pub collapse_whitespace: Option<bool>,
    /// `0` disables truncation
    pub max_string_length: Option<usize>,
    pub allow_empty_strings: Option<bool>,
    pub sanitize_arrays: Option<bool>,
    pub ignore_fields: Option<Vec<String>>,
    pub sanitize_only_fields: Option<Vec<String>>,
    pub max_depth: Option<usize>,
    pub write_back: Option<WriteBackMode>,
}

impl PolicyOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge onto the defaults and compile every pattern
    pub fn resolve(self) -> Result<Policy, PolicyError> {
        let mut policy = Policy::default();

        if let Some(v) = self.trim_strings {
            policy.trim_strings = v;
        }
        if let Some(v) = self.remove_html {
            policy.remove_html = v;
        }
        if let Some(v) = self.escape_quotes {
            policy.escape_quotes = v;
        }
        if let Some(v) = self.remove_emojis {
            policy.remove_emojis = v;
        }
        if let Some(v) = self.remove_unicode_control {
            policy.remove_unicode_control = v;
        }
        if let Some(v) = self.block_script_keywords {
            policy.block_script_keywords = v;
        }
        if let Some(patterns) = self.blocked_patterns {
            policy.blocked_patterns = patterns
                .iter()
                .map(|source| compile_pattern("blockedPatterns", source))
                .collect::<Result<_, _>>()?;
        }
        if let Some(v) = self.strip_sql_meta {
            policy.strip_sql_meta = v;
        }
        if let Some(v) = self.lowercase_emails {
            policy.lowercase_emails = v;
        }
        if let Some(fields) = self.normalize_fields {
            policy.normalize_fields = fields.into_iter().collect();
        }
        if let Some(setting) = self.unicode_normalize_form {
            policy.unicode_normalize_form = setting.form();
        }
        if let Some(source) = self.allowed_chars {
            policy.allowed_chars = Some(compile_pattern("allowedChars", &source)?);
        }
        if let Some(v) = self.collapse_whitespace {
            policy.collapse_whitespace = v;
        }
        if let Some(length) = self.max_string_length {
            policy = policy.with_max_string_length(length);
        }
        if let Some(v) = self.allow_empty_strings {
            policy.allow_empty_strings = v;
        }
        if let Some(v) = self.sanitize_arrays {
            policy.sanitize_arrays = v;
        }
        if let Some(fields) = self.ignore_fields {
            policy.ignore_fields = fields.into_iter().collect();
        }
        if let Some(fields) = self.sanitize_only_fields {
            policy.sanitize_only_fields = fields.into_iter().collect();
        }
        if let Some(depth) = self.max_depth {
            policy.max_depth = Some(depth);
        }
        if let Some(mode) = self.write_back {
            policy.write_back = mode;
        }

        Ok(policy)
    }

    pub fn from_json_str(input: &str) -> Result<Self, String> {
        serde_json::from_str(input).map_err(|e| e.to_string())
    }

    pub fn from_toml_str(input: &str) -> Result<Self, String> {
        toml::from_str(input).map_err(|e| e.to_string())
    }

    pub fn from_yaml_str(input: &str) -> Result<Self, String> {
        serde_yaml::from_str(input).map_err(|e| e.to_string())
    }

    /// Load overrides from a `.toml`, `.yaml`/`.yml` or `.json` file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default();

        let parse: fn(&str) -> Result<Self, String> = match extension.as_str() {
            "toml" => Self::from_toml_str,
            "yaml" | "yml" => Self::from_yaml_str,
            "json" => Self::from_json_str,
            _ => {
                return Err(PolicyError::UnsupportedFormat(
                    path.display().to_string(),
                ))
            }
        };

        let contents = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        parse(&contents).map_err(|message| PolicyError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::NormalizationForm;

    #[test]
    fn test_empty_overrides_resolve_to_defaults() {
        let policy = PolicyOverrides::new().resolve().unwrap();
        let defaults = Policy::default();

        assert_eq!(policy.trim_strings, defaults.trim_strings);
        assert_eq!(policy.max_string_length, defaults.max_string_length);
        assert_eq!(policy.unicode_normalize_form, defaults.unicode_normalize_form);
        assert_eq!(policy.write_back, defaults.write_back);
    }

    #[test]
    fn test_camel_case_option_names() {
        let overrides = PolicyOverrides::from_json_str(
            r#"{
                "removeHTML": false,
                "stripSQLMeta": false,
                "maxStringLength": 20,
                "unicodeNormalizeForm": "NFKC",
                "normalizeFields": ["username"],
                "blockedPatterns": ["foo", "ba+r"],
                "allowedChars": "[a-z ]",
                "writeBack": "replace"
            }"#,
        )
        .unwrap();

        let policy = overrides.resolve().unwrap();
        assert!(!policy.remove_html);
        assert!(!policy.strip_sql_meta);
        assert_eq!(policy.max_string_length, Some(20));
        assert_eq!(policy.unicode_normalize_form, Some(NormalizationForm::Nfkc));
        assert!(policy.normalize_fields.contains("username"));
        assert_eq!(policy.blocked_patterns.len(), 2);
        assert!(policy.allowed_chars.is_some());
        assert_eq!(policy.write_back, WriteBackMode::Replace);
    }

    #[test]
    fn test_zero_max_length_disables_truncation() {
        let overrides = PolicyOverrides {
            max_string_length: Some(0),
            ..Default::default()
        };
        assert_eq!(overrides.resolve().unwrap().max_string_length, None);
    }

    #[test]
    fn test_normalization_can_be_disabled() {
        for value in ["", "none", "NONE"] {
            let overrides =
                PolicyOverrides::from_json_str(&format!(r#"{{"unicodeNormalizeForm": "{}"}}"#, value))
                    .unwrap();
            assert_eq!(
                overrides.unicode_normalize_form,
                Some(NormalizationSetting::Disabled)
            );
            assert_eq!(overrides.resolve().unwrap().unicode_normalize_form, None);
        }
    }

    #[test]
    fn test_invalid_pattern_fails_resolution() {
        let overrides = PolicyOverrides {
            blocked_patterns: Some(vec!["(unclosed".to_string()]),
            ..Default::default()
        };
        assert!(matches!(
            overrides.resolve(),
            Err(PolicyError::InvalidPattern {
                field: "blockedPatterns",
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_normalization_form_is_rejected_when_parsed() {
        let err = PolicyOverrides::from_toml_str("unicodeNormalizeForm = \"NFZ\"\n").unwrap_err();
        assert!(err.contains("Invalid unicode normalization form"));
    }

    #[test]
    fn test_typed_normalization_override() {
        let overrides = PolicyOverrides {
            unicode_normalize_form: Some(NormalizationForm::Nfd.into()),
            ..Default::default()
        };
        assert_eq!(
            overrides.resolve().unwrap().unicode_normalize_form,
            Some(NormalizationForm::Nfd)
        );
    }

    #[test]
    fn test_toml_and_yaml_agree() {
        let from_toml = PolicyOverrides::from_toml_str(
            "trimStrings = false\ncollapseWhitespace = true\nignoreFields = [\"password\"]\n",
        )
        .unwrap();
        let from_yaml = PolicyOverrides::from_yaml_str(
            "trimStrings: false\ncollapseWhitespace: true\nignoreFields:\n  - password\n",
        )
        .unwrap();

        assert_eq!(from_toml, from_yaml);
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            PolicyOverrides::from_path("policy.ini"),
            Err(PolicyError::UnsupportedFormat(_))
        ));
    }
}
