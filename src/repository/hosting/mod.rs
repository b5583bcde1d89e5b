//! Queries against the remote hosting API
//!
//! - **github**: GitHub REST implementation
//! - **link**: `Link` header pagination
//!
//! The resolver is written against [`RepositorySearch`] only.

mod github;
mod link;

pub use github::{DEFAULT_API_BASE, GitHubClient, HostingConfig, filter_exact_name, filter_tags};
pub use link::next_link;

use crate::error::SubtreeResult;
use crate::model::{Commit, CommitsSince, RemoteRepository, Tag};

/// Every outbound query the resolver needs
///
/// Implementations perform network I/O; the resolver never talks to the
/// hosting API any other way, so tests can swap in an in-memory double.
#[allow(async_fn_in_trait)]
pub trait RepositorySearch {
    /// Fetch `owner/name`, failing with `NotFound` on a 404
    async fn lookup_exact(&self, full_name: &str) -> SubtreeResult<RemoteRepository>;

    /// Repositories whose name is exactly `name`, in the API's relevance order
    async fn search_by_name(&self, name: &str) -> SubtreeResult<Vec<RemoteRepository>>;

    /// Commits on the remote branch since `since_ref`, or all of them when
    /// the subtree was never imported
    async fn commits_since(
        &self,
        repository: &RemoteRepository,
        since_ref: Option<&str>,
    ) -> SubtreeResult<CommitsSince>;

    /// Tags of the repository pointing at one of `commits`
    async fn tags_matching(
        &self,
        repository: &RemoteRepository,
        commits: &[Commit],
    ) -> SubtreeResult<Vec<Tag>>;
}
