//! Repository name candidates derived from a subtree prefix
//!
//! Tried most to least specific:
//!
//! 1. **exact**: last two segments, `vendor/tpope/vim-markdown` -> `tpope/vim-markdown`
//! 2. **kebab**: basename split at each hyphen, `tpope-vim-markdown` ->
//!    `tpope/vim-markdown`, then `tpope-vim/markdown`
//! 3. **fuzzy**: the basename alone as a search term

use std::fmt;

use crate::util::path::{basename, last_two_segments};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Exact,
    Kebab,
    Fuzzy,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Exact => write!(f, "exact"),
            Strategy::Kebab => write!(f, "kebab"),
            Strategy::Fuzzy => write!(f, "fuzzy"),
        }
    }
}

/// `owner/name` from the last two segments of a normalized prefix
pub fn exact_candidate(prefix: &str) -> Option<String> {
    last_two_segments(prefix)
}

/// Every `owner/name` split of a hyphenated basename, shortest owner first.
///
/// A basename with `k` hyphens yields exactly `k` candidates.
pub fn kebab_candidates(basename: &str) -> Vec<String> {
    let tokens: Vec<&str> = basename.split('-').collect();
    (1..tokens.len())
        .map(|i| format!("{}/{}", tokens[..i].join("-"), tokens[i..].join("-")))
        .collect()
}

/// Free-text search term for the fuzzy strategy
pub fn fuzzy_term(prefix: &str) -> &str {
    basename(prefix)
}
