use crate::util::path::normalize_prefix;

/// A vendored directory, imported (or about to be) with `git subtree`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subtree {
    prefix: String,
    last_split_ref: Option<String>,
}

impl Subtree {
    /// Builds a subtree from a prefix as typed or as recorded in history.
    ///
    /// Returns `None` when the prefix normalizes to nothing.
    pub fn new(prefix: &str, last_split_ref: Option<String>) -> Option<Self> {
        let prefix = normalize_prefix(prefix);
        if prefix.is_empty() {
            return None;
        }
        Some(Self {
            prefix,
            last_split_ref: last_split_ref.filter(|r| !r.is_empty()),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Upstream commit recorded at the last `git subtree add/pull`
    pub fn last_split_ref(&self) -> Option<&str> {
        self.last_split_ref.as_deref()
    }

    /// Whether the subtree was ever imported
    pub fn exists(&self) -> bool {
        self.last_split_ref.is_some()
    }
}
