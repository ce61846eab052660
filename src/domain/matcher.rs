//! Opaque pattern capability used by user-supplied policy patterns.
//!
//! The policy never depends on a concrete pattern engine: anything that can
//! test a string and delete all of its matches can be plugged in. `Regex`
//! implements the trait out of the box.

use std::borrow::Cow;
use std::fmt::Debug;
use std::sync::Arc;

use regex::Regex;

use crate::domain::errors::PolicyError;

/// Match-and-delete capability
pub trait Matcher: Send + Sync + Debug {
    /// Whether `input` contains at least one match
    fn is_match(&self, input: &str) -> bool;

    /// Delete every non-overlapping match from `input`
    fn remove_all<'a>(&self, input: &'a str) -> Cow<'a, str>;
}

/// Shared, immutable matcher as stored in a policy
pub type SharedMatcher = Arc<dyn Matcher>;

impl Matcher for Regex {
    fn is_match(&self, input: &str) -> bool {
        Regex::is_match(self, input)
    }

    fn remove_all<'a>(&self, input: &'a str) -> Cow<'a, str> {
        self.replace_all(input, "")
    }
}

/// Compile a regular expression source into a shared matcher
pub fn compile_pattern(field: &'static str, source: &str) -> Result<SharedMatcher, PolicyError> {
    let regex =
        Regex::new(source).map_err(|source| PolicyError::InvalidPattern { field, source })?;
    Ok(Arc::new(regex))
}
