use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, LINK};
use reqwest::{Response, StatusCode, Url};
use rustc_hash::FxHashSet;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::error::{SubtreeError, SubtreeResult};
use crate::model::{Commit, CommitsSince, CompareStatus, RemoteRepository, Tag};
use crate::repository::RateLimiter;

use super::RepositorySearch;
use super::link::next_link;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const ACCEPT_V3: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const PER_PAGE: &str = "100";
/// Search pagination is best-effort: exact-name hits sit on the first pages
const SEARCH_PAGE_LIMIT: usize = 3;

/// Connection settings for the hosting API
#[derive(Debug, Clone)]
pub struct HostingConfig {
    pub api_base: String,
    pub token: Option<String>,
    /// Overrides every repository's own default branch
    pub branch: Option<String>,
}

impl Default for HostingConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token: None,
            branch: None,
        }
    }
}

/// GitHub REST client; all requests share one rate limiter and header set
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
    branch: Option<String>,
    limiter: Arc<RateLimiter>,
}

#[derive(Deserialize)]
struct SearchPage {
    items: Vec<RemoteRepository>,
}

#[derive(Deserialize)]
struct ComparePayload {
    status: CompareStatus,
    ahead_by: u64,
    #[serde(default)]
    commits: Vec<Commit>,
}

#[derive(Deserialize)]
struct TagPayload {
    name: String,
    commit: CommitRef,
}

#[derive(Deserialize)]
struct CommitRef {
    sha: String,
}

impl GitHubClient {
    pub fn new(config: &HostingConfig, limiter: Arc<RateLimiter>) -> SubtreeResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_V3));
        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("token {}", token))
                .map_err(|_| SubtreeError::Config("token contains characters not allowed in a header".to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            branch: config.branch.clone(),
            limiter,
        })
    }

    /// Branch compared against for `repository`
    pub fn branch_for(&self, repository: &RemoteRepository) -> SubtreeResult<String> {
        self.branch
            .clone()
            .or_else(|| repository.default_branch.clone())
            .ok_or_else(|| {
                SubtreeError::Config(format!(
                    "{} reports no default branch; pass --branch",
                    repository.full_name
                ))
            })
    }

    async fn send(&self, url: &str, query: &[(&str, &str)]) -> SubtreeResult<Response> {
        self.limiter.acquire().await;
        tracing::debug!(url, ?query, "GET");
        let mut request = self.http.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().await?;
        tracing::debug!(url, status = response.status().as_u16(), "response");
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> SubtreeResult<T> {
        let response = ensure_success(url, self.send(url, query).await?).await?;
        decode(url, response).await
    }

    /// Follows `Link: rel="next"` for at most `limit` pages
    async fn get_pages<P: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        limit: Option<usize>,
    ) -> SubtreeResult<Vec<P>> {
        let mut pages = Vec::new();
        let mut next = Some(url.to_string());
        while let Some(page_url) = next.take() {
            let page_query: &[(&str, &str)] = if pages.is_empty() { query } else { &[] };
            let response = ensure_success(&page_url, self.send(&page_url, page_query).await?).await?;
            next = response
                .headers()
                .get(LINK)
                .and_then(|v| v.to_str().ok())
                .and_then(next_link);
            pages.push(decode(&page_url, response).await?);
            if limit.is_some_and(|limit| pages.len() >= limit) {
                break;
            }
        }
        Ok(pages)
    }

    async fn get_all<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> SubtreeResult<Vec<T>> {
        let pages: Vec<Vec<T>> = self.get_pages(url, query, None).await?;
        Ok(pages.into_iter().flatten().collect())
    }
}

impl RepositorySearch for GitHubClient {
    async fn lookup_exact(&self, full_name: &str) -> SubtreeResult<RemoteRepository> {
        let url = repo_url(&self.api_base, full_name)?;
        let response = self.send(&url, &[]).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(SubtreeError::NotFound(full_name.to_string()));
        }
        let response = ensure_success(&url, response).await?;
        decode(&url, response).await
    }

    async fn search_by_name(&self, name: &str) -> SubtreeResult<Vec<RemoteRepository>> {
        let url = format!("{}/search/repositories", self.api_base);
        let q = format!("{} in:name", name);
        let pages: Vec<SearchPage> = self
            .get_pages(&url, &[("q", q.as_str()), ("per_page", PER_PAGE)], Some(SEARCH_PAGE_LIMIT))
            .await?;
        let items = pages.into_iter().flat_map(|page| page.items).collect();
        Ok(filter_exact_name(items, name))
    }

    async fn commits_since(
        &self,
        repository: &RemoteRepository,
        since_ref: Option<&str>,
    ) -> SubtreeResult<CommitsSince> {
        let branch = self.branch_for(repository)?;
        match since_ref {
            Some(base) => {
                let url = expand_compare_url(&repository.compare_url, base, &branch);
                let payload: ComparePayload = self.get_json(&url, &[]).await?;
                Ok(CommitsSince {
                    status: payload.status,
                    ahead_by: payload.ahead_by,
                    commits: payload.commits,
                    branch,
                })
            }
            None => {
                let url = expand_commits_url(&repository.commits_url);
                let commits: Vec<Commit> = self
                    .get_all(&url, &[("sha", branch.as_str()), ("per_page", PER_PAGE)])
                    .await?;
                Ok(CommitsSince {
                    status: CompareStatus::Ahead,
                    ahead_by: commits.len() as u64,
                    commits,
                    branch,
                })
            }
        }
    }

    async fn tags_matching(
        &self,
        repository: &RemoteRepository,
        commits: &[Commit],
    ) -> SubtreeResult<Vec<Tag>> {
        let payloads: Vec<TagPayload> = self
            .get_all(&repository.tags_url, &[("per_page", PER_PAGE)])
            .await?;
        let tags = payloads
            .into_iter()
            .map(|t| Tag {
                name: t.name,
                sha: t.commit.sha,
            })
            .collect();
        Ok(filter_tags(tags, commits))
    }
}

async fn ensure_success(url: &str, response: Response) -> SubtreeResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SubtreeError::Transport {
        url: url.to_string(),
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(url: &str, response: Response) -> SubtreeResult<T> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|source| SubtreeError::Decode {
        url: url.to_string(),
        source,
    })
}

fn expand_compare_url(template: &str, base: &str, head: &str) -> String {
    template.replace("{base}", base).replace("{head}", head)
}

/// `{api}/repos/{owner}/{name}` with each segment percent-encoded
fn repo_url(api_base: &str, full_name: &str) -> SubtreeResult<String> {
    let invalid = || SubtreeError::Config(format!("invalid API base URL `{}`", api_base));
    let mut url = Url::parse(api_base).map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|_| invalid())?
        .pop_if_empty()
        .push("repos")
        .extend(full_name.split('/'));
    Ok(url.into())
}

fn expand_commits_url(template: &str) -> String {
    template.replace("{/sha}", "")
}

/// Keeps search hits named exactly `name`; the API matches substrings
pub fn filter_exact_name(items: Vec<RemoteRepository>, name: &str) -> Vec<RemoteRepository> {
    items.into_iter().filter(|repo| repo.name == name).collect()
}

/// Keeps tags whose target is one of `commits`, in API order
pub fn filter_tags(tags: Vec<Tag>, commits: &[Commit]) -> Vec<Tag> {
    let shas: FxHashSet<&str> = commits.iter().map(|c| c.sha.as_str()).collect();
    tags.into_iter().filter(|tag| shas.contains(tag.sha.as_str())).collect()
}
