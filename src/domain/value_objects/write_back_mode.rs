use serde::{Deserialize, Serialize};

/// How a sanitized mapping is written back into the caller-owned one.
///
/// `Merge` assigns every surviving key onto the original and leaves keys the
/// walker dropped in place with their original values. `Replace` makes the
/// original hold exactly the sanitized keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WriteBackMode {
    #[default]
    Merge,
    Replace,
}

impl std::fmt::Display for WriteBackMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteBackMode::Merge => write!(f, "merge"),
            WriteBackMode::Replace => write!(f, "replace"),
        }
    }
}
