//! Subtree remote resolution
//!
//! # Architecture
//!
//! - **names**: repository name candidates from a prefix
//! - **disambiguation**: confidence rule and manual choice
//! - **prompt**: the human on the other end of a manual choice
//! - resolver (this module): strategies in order, then divergence and tags

pub mod disambiguation;
pub mod names;
pub mod prompt;


pub use disambiguation::{Decision, DisambiguationPolicy, is_confident};
pub use names::Strategy;
pub use prompt::{FirstCandidate, NonInteractive, Prompt, TerminalPrompt};

use crate::error::{SubtreeError, SubtreeResult};
use crate::model::{RemoteRepository, Resolution, Subtree, SubtreeRemote};
use crate::progress::ProgressReporter;
use crate::repository::RepositorySearch;

/// Result of one name strategy
enum Attempt {
    Found(RemoteRepository),
    Missed,
}

/// Finds the upstream of each subtree and how far behind it is
pub struct SubtreeRemoteResolver<'a, S, P> {
    search: &'a S,
    policy: DisambiguationPolicy<P>,
}

impl<'a, S: RepositorySearch, P: Prompt> SubtreeRemoteResolver<'a, S, P> {
    pub fn new(search: &'a S, prompt: P) -> Self {
        Self {
            search,
            policy: DisambiguationPolicy::new(prompt),
        }
    }

    /// Locates the repository a prefix was imported from
    pub async fn find_repository(&self, prefix: &str) -> SubtreeResult<(RemoteRepository, Strategy)> {
        if let Some(full_name) = names::exact_candidate(prefix) {
            if let Attempt::Found(repo) = self.try_exact(&full_name, Strategy::Exact).await? {
                return Ok((repo, Strategy::Exact));
            }
        }

        let term = names::fuzzy_term(prefix);
        for full_name in names::kebab_candidates(term) {
            if let Attempt::Found(repo) = self.try_exact(&full_name, Strategy::Kebab).await? {
                return Ok((repo, Strategy::Kebab));
            }
        }

        let candidates = self.search.search_by_name(term).await?;
        tracing::debug!(term, hits = candidates.len(), "fuzzy search");
        if candidates.is_empty() {
            return Err(SubtreeError::NotFound(term.to_string()));
        }
        let (repo, decision) = self.policy.select(term, candidates)?;
        tracing::debug!(repo = %repo.full_name, ?decision, "disambiguated");
        Ok((repo, Strategy::Fuzzy))
    }

    async fn try_exact(&self, full_name: &str, strategy: Strategy) -> SubtreeResult<Attempt> {
        match self.search.lookup_exact(full_name).await {
            Ok(repo) => Ok(Attempt::Found(repo)),
            Err(e) if e.is_not_found() => {
                tracing::debug!(full_name, %strategy, "no such repository");
                Ok(Attempt::Missed)
            }
            Err(e) => Err(e),
        }
    }

    /// Resolves one subtree end to end
    pub async fn resolve(&self, subtree: &Subtree) -> SubtreeResult<SubtreeRemote> {
        let (repository, strategy) = self.find_repository(subtree.prefix()).await?;
        tracing::info!(prefix = subtree.prefix(), repo = %repository.full_name, %strategy, "resolved remote");

        let commits_since = self
            .search
            .commits_since(&repository, subtree.last_split_ref())
            .await?;
        let tags_since = self
            .search
            .tags_matching(&repository, &commits_since.commits)
            .await?;

        Ok(SubtreeRemote {
            subtree: subtree.clone(),
            repository,
            commits_since,
            tags_since,
        })
    }

    /// Resolves every subtree in input order; a failure only affects its own entry
    pub async fn resolve_all(&self, subtrees: &[Subtree], progress: &dyn ProgressReporter) -> Vec<Resolution> {
        let pb = progress.start("Finding subtree remotes", subtrees.len() as u64);
        let mut resolutions = Vec::with_capacity(subtrees.len());
        for subtree in subtrees {
            let outcome = self.resolve(subtree).await;
            if let Err(e) = &outcome {
                tracing::warn!(prefix = subtree.prefix(), error = %e, "could not resolve subtree");
            }
            resolutions.push(Resolution {
                subtree: subtree.clone(),
                outcome,
            });
            pb.inc(1);
        }
        pb.finish();
        resolutions
    }
}
