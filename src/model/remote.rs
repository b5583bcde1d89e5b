use serde::Deserialize;

use super::Subtree;

/// A repository as described by the hosting API
///
/// The URL fields are the API's own templates (`{base}`, `{/sha}` etc.)
/// and are expanded by the client, never by callers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteRepository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    pub clone_url: String,
    pub compare_url: String,
    pub commits_url: String,
    pub tags_url: String,
    #[serde(default)]
    pub default_branch: Option<String>,
    /// Relevance; only present in search results and only comparable within one response
    #[serde(default)]
    pub score: Option<f64>,
}

impl RemoteRepository {
    pub fn score_or_zero(&self) -> f64 {
        self.score.unwrap_or(0.0)
    }
}

/// Relationship of the remote branch head to the split ref
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareStatus {
    Ahead,
    Behind,
    Identical,
    Diverged,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Commit {
    pub sha: String,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Remote commits beyond the local split ref
#[derive(Debug, Clone, PartialEq)]
pub struct CommitsSince {
    pub status: CompareStatus,
    pub ahead_by: u64,
    pub commits: Vec<Commit>,
    /// Branch the comparison was made against
    pub branch: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub sha: String,
}

/// A subtree paired with its upstream and how far behind it is
#[derive(Debug, Clone, PartialEq)]
pub struct SubtreeRemote {
    pub subtree: Subtree,
    pub repository: RemoteRepository,
    pub commits_since: CommitsSince,
    pub tags_since: Vec<Tag>,
}

impl SubtreeRemote {
    pub fn is_ahead(&self) -> bool {
        self.commits_since.ahead_by > 0
    }

    pub fn is_diverged(&self) -> bool {
        self.commits_since.status == CompareStatus::Diverged
    }
}
