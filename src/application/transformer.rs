//! Per-string sanitization pipeline.
//!
//! The stages below run in a fixed order over an immutable policy. The order
//! is part of the contract: the emptiness check runs before truncation and
//! truncation always runs last.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::matcher::Matcher;
use crate::domain::policy::Policy;

/// Tag-shaped substrings. Textual only, malformed markup is not handled.
static HTML_TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]*>").expect("Invalid HTML tag regex"));

static QUOTES_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"['"]"#).expect("Invalid quotes regex"));

/// Emoticons, misc pictographs, transport, regional indicators, misc symbols, dingbats
static EMOJI_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"[\x{1F600}-\x{1F64F}\x{1F300}-\x{1F5FF}\x{1F680}-\x{1F6FF}\x{1F1E0}-\x{1F1FF}\x{2600}-\x{26FF}\x{2700}-\x{27BF}]",
    )
    .expect("Invalid emoji regex")
});

/// C0 and C1 control characters
static CONTROL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x00-\x1F\x7F-\x{9F}]").expect("Invalid control character regex"));

// ASCII-only case folding
static SCRIPT_KEYWORD_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i-u)script").expect("Invalid script keyword regex"));

static WHITESPACE_RUN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s\x{FEFF}]+").expect("Invalid whitespace regex"));

const EMAIL_FIELD: &str = "email";
const SQL_SELECT_KEYWORD: &str = "SELECT";

/// Sanitize a single string.
///
/// `field_name` is the mapping key the string sits under, `None` for array
/// elements and top-level strings. Returns `None` when the value must be
/// dropped.
pub fn sanitize_string(input: &str, policy: &Policy, field_name: Option<&str>) -> Option<String> {
    if input.is_empty() {
        return policy.allow_empty_strings.then(String::new);
    }

    let field = field_name.unwrap_or("");
    if policy.is_ignored(field) || policy.is_outside_only_list(field) {
        return Some(input.to_string());
    }

    let mut result = input.to_string();

    if policy.trim_strings {
        let trimmed = result.trim_matches(is_trimmable);
        if trimmed.len() != result.len() {
            result = trimmed.to_string();
        }
    }

    if policy.remove_html {
        result = strip(&*HTML_TAG_REGEX, result);
    }

    if policy.escape_quotes {
        result = strip(&*QUOTES_REGEX, result);
    }

    if policy.remove_emojis {
        result = strip(&*EMOJI_REGEX, result);
    }

    if policy.remove_unicode_control {
        result = strip(&*CONTROL_REGEX, result);
    }

    if policy.block_script_keywords {
        result = strip(&*SCRIPT_KEYWORD_REGEX, result);
    }

    for pattern in &policy.blocked_patterns {
        result = strip(&**pattern, result);
    }

    if policy.strip_sql_meta {
        // `*`/`;` first, so "-*-" collapses into a comment marker that the second pass removes
        result = result.replace(['*', ';'], "").replace("--", "");
    }

    if policy.lowercase_emails && field_name == Some(EMAIL_FIELD) {
        result = result.to_lowercase();
    }

    if policy.normalize_fields.contains(field) {
        result = result.to_lowercase();
    }

    if let Some(form) = policy.unicode_normalize_form {
        result = form.normalize(&result);
    }

    if let Some(allowed) = &policy.allowed_chars {
        result = retain_allowed_units(&result, allowed.as_ref());
    }

    if policy.collapse_whitespace {
        if let Cow::Owned(collapsed) = WHITESPACE_RUN_REGEX.replace_all(&result, " ") {
            result = collapsed;
        }
    }

    if result.trim_matches(is_trimmable).is_empty() && !policy.allow_empty_strings {
        return None;
    }

    if let Some(max) = policy.max_string_length.filter(|&max| max > 0) {
        if result.chars().count() > max && !is_length_exempt(&result, policy, field_name) {
            result = result.chars().take(max).collect();
        }
    }

    Some(result)
}

/// Unicode whitespace plus the byte order mark U+FEFF
fn is_trimmable(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

/// Emails and SQL-looking text are never truncated
fn is_length_exempt(value: &str, policy: &Policy, field_name: Option<&str>) -> bool {
    field_name == Some(EMAIL_FIELD) || (policy.strip_sql_meta && value.contains(SQL_SELECT_KEYWORD))
}

fn strip<M: Matcher + ?Sized>(matcher: &M, input: String) -> String {
    match matcher.remove_all(&input) {
        Cow::Borrowed(_) => input,
        Cow::Owned(stripped) => stripped,
    }
}

/// Keep the UTF-16 code units whose character matches `allowed`.
///
/// Each unit is tested on its own. Surrogate halves have no character of
/// their own and are tested as U+FFFD, so both halves of a pair always share
/// a verdict; combining sequences, however, are judged per code point.
fn retain_allowed_units(input: &str, allowed: &dyn Matcher) -> String {
    let mut buf = [0u8; 4];
    let units: Vec<u16> = input
        .encode_utf16()
        .filter(|&unit| {
            let probe = char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER);
            allowed.is_match(probe.encode_utf8(&mut buf))
        })
        .collect();
    String::from_utf16_lossy(&units)
}
