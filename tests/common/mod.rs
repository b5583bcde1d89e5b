// Shared test fixtures for integration tests
// Functions here are used across different test files
#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use git2::{Repository, Signature};
use git_subtree_remote::repository::{GitHubClient, HostingConfig, RateLimiter};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

pub const SPLIT_A: &str = "1a2b3c4d5e6f708192a3b4c5d6e7f8091a2b3c4d";
pub const SPLIT_B: &str = "9f8e7d6c5b4a39281706f5e4d3c2b1a0f9e8d7c6";

/// Create a temporary git repository
pub fn create_test_repo() -> (TempDir, PathBuf, Repository) {
    let dir = TempDir::new().unwrap();
    let repo_path = dir.path().to_path_buf();
    let repo = Repository::init(&repo_path).unwrap();

    // Configure git user for commits
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test User").unwrap();
    config.set_str("user.email", "test@example.com").unwrap();

    (dir, repo_path, repo)
}

/// Add files to the repository and create a commit
pub fn add_commit(repo: &Repository, files: &[(&str, &[u8])], message: &str) -> git2::Oid {
    let sig = Signature::now("Test User", "test@example.com").unwrap();

    let mut index = repo.index().unwrap();
    for (path, content) in files {
        let full_path = repo.workdir().unwrap().join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&full_path, content).unwrap();
        index.add_path(std::path::Path::new(path)).unwrap();
    }
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
}

/// Commit shaped like the one `git subtree add --squash` leaves behind
pub fn add_subtree_commit(repo: &Repository, prefix: &str, split: &str, files: &[(&str, &[u8])]) -> git2::Oid {
    let message = format!(
        "Squashed '{prefix}/' content from commit {short}\n\n\
         git-subtree-dir: {prefix}\n\
         git-subtree-split: {split}\n",
        short = &split[..7],
    );
    let paths: Vec<String> = files.iter().map(|(path, _)| format!("{}/{}", prefix, path)).collect();
    let files: Vec<(&str, &[u8])> = paths
        .iter()
        .zip(files)
        .map(|(path, (_, content))| (path.as_str(), *content))
        .collect();
    add_commit(repo, &files, &message)
}

/// Limiter that never gets in the way of a test
pub fn fast_limiter() -> Arc<RateLimiter> {
    Arc::new(RateLimiter::new(1_000, Duration::from_secs(1)))
}

/// Canned hosting API contents
#[derive(Clone)]
pub struct ApiFixture {
    repos: Vec<String>,
    search: HashMap<String, Vec<(String, f64)>>,
    history: HashMap<String, Vec<String>>,
    tags: HashMap<String, Vec<(String, String)>>,
    failing: Vec<String>,
    page_size: usize,
}

impl Default for ApiFixture {
    fn default() -> Self {
        Self {
            repos: Vec::new(),
            search: HashMap::new(),
            history: HashMap::new(),
            tags: HashMap::new(),
            failing: Vec::new(),
            page_size: 100,
        }
    }
}

impl ApiFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repo(mut self, full_name: &str) -> Self {
        self.repos.push(full_name.to_string());
        self
    }

    /// Search results for `name` in relevance order
    pub fn search_hits(mut self, name: &str, hits: &[(&str, f64)]) -> Self {
        self.search.insert(
            name.to_string(),
            hits.iter().map(|(full_name, score)| (full_name.to_string(), *score)).collect(),
        );
        self
    }

    pub fn history(mut self, full_name: &str, newest_first: &[&str]) -> Self {
        self.history
            .insert(full_name.to_string(), newest_first.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn tags(mut self, full_name: &str, tags: &[(&str, &str)]) -> Self {
        self.tags.insert(
            full_name.to_string(),
            tags.iter().map(|(name, sha)| (name.to_string(), sha.to_string())).collect(),
        );
        self
    }

    pub fn failing(mut self, full_name: &str) -> Self {
        self.failing.push(full_name.to_string());
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    pub async fn serve(self) -> FakeApi {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let state = Arc::new(ApiState {
            base: base.clone(),
            fixture: self,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/repos/{owner}/{name}", get(get_repo))
            .route("/repos/{owner}/{name}/commits", get(list_commits))
            .route("/repos/{owner}/{name}/compare/{range}", get(compare))
            .route("/repos/{owner}/{name}/tags", get(list_tags))
            .route("/search/repositories", get(search))
            .with_state(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        FakeApi { base, state }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Path and raw query string
    pub target: String,
    pub authorization: Option<String>,
    pub accept: Option<String>,
    pub user_agent: Option<String>,
}

pub struct FakeApi {
    pub base: String,
    state: Arc<ApiState>,
}

impl FakeApi {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn targets(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.target).collect()
    }

    /// Targets starting with `prefix`
    pub fn targets_under(&self, prefix: &str) -> Vec<String> {
        self.targets().into_iter().filter(|t| t.starts_with(prefix)).collect()
    }

    pub fn config(&self, token: Option<&str>, branch: Option<&str>) -> HostingConfig {
        HostingConfig {
            api_base: self.base.clone(),
            token: token.map(str::to_string),
            branch: branch.map(str::to_string),
        }
    }

    pub fn client(&self) -> GitHubClient {
        self.client_with(None, None)
    }

    pub fn client_with(&self, token: Option<&str>, branch: Option<&str>) -> GitHubClient {
        GitHubClient::new(&self.config(token, branch), fast_limiter()).unwrap()
    }
}

struct ApiState {
    base: String,
    fixture: ApiFixture,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ApiState {
    fn record(&self, uri: &Uri, headers: &HeaderMap) {
        let value = |name| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
        let target = uri.path_and_query().map(|p| p.to_string()).unwrap_or_default();
        self.requests.lock().unwrap().push(RecordedRequest {
            target,
            authorization: value(header::AUTHORIZATION),
            accept: value(header::ACCEPT),
            user_agent: value(header::USER_AGENT),
        });
    }

    fn repo_json(&self, full_name: &str, score: Option<f64>) -> Value {
        let (_, name) = full_name.split_once('/').unwrap();
        let mut repo = json!({
            "id": full_name.len(),
            "name": name,
            "full_name": full_name,
            "owner": { "login": full_name.split('/').next().unwrap() },
            "html_url": format!("https://github.com/{}", full_name),
            "clone_url": format!("https://github.com/{}.git", full_name),
            "compare_url": format!("{}/repos/{}/compare/{{base}}...{{head}}", self.base, full_name),
            "commits_url": format!("{}/repos/{}/commits{{/sha}}", self.base, full_name),
            "tags_url": format!("{}/repos/{}/tags", self.base, full_name),
            "default_branch": "main",
        });
        if let Some(score) = score {
            repo["score"] = json!(score);
        }
        repo
    }

    fn history(&self, full_name: &str) -> Vec<String> {
        self.fixture.history.get(full_name).cloned().unwrap_or_default()
    }

    /// One page of `items`, with a `Link` header while more remain
    fn paginate(
        &self,
        uri: &Uri,
        params: &HashMap<String, String>,
        items: Vec<Value>,
        wrap: impl Fn(usize, Vec<Value>) -> Value,
    ) -> Response {
        let page: usize = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1).max(1);
        let size = self.fixture.page_size;
        let total = items.len();
        let chunk: Vec<Value> = items.into_iter().skip((page - 1) * size).take(size).collect();

        let mut response = Json(wrap(total, chunk)).into_response();
        if page * size < total {
            let link = format!(
                "<{}>; rel=\"next\", <{}>; rel=\"last\"",
                self.page_url(uri, page + 1),
                self.page_url(uri, total.div_ceil(size))
            );
            response
                .headers_mut()
                .insert(header::LINK, HeaderValue::from_str(&link).unwrap());
        }
        response
    }

    fn page_url(&self, uri: &Uri, page: usize) -> String {
        let mut pairs: Vec<String> = uri
            .query()
            .unwrap_or("")
            .split('&')
            .filter(|pair| !pair.is_empty() && !pair.starts_with("page="))
            .map(str::to_string)
            .collect();
        pairs.push(format!("page={}", page));
        format!("{}{}?{}", self.base, uri.path(), pairs.join("&"))
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" }))).into_response()
}

async fn get_repo(
    State(state): State<Arc<ApiState>>,
    Path((owner, name)): Path<(String, String)>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    state.record(&uri, &headers);
    let full_name = format!("{}/{}", owner, name);
    if state.fixture.failing.contains(&full_name) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Server Error" })),
        )
            .into_response();
    }
    if !state.fixture.repos.contains(&full_name) {
        return not_found();
    }
    Json(state.repo_json(&full_name, None)).into_response()
}

async fn search(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<HashMap<String, String>>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    state.record(&uri, &headers);
    let name = params
        .get("q")
        .and_then(|q| q.split_whitespace().next())
        .unwrap_or_default();
    let hits: Vec<Value> = state
        .fixture
        .search
        .get(name)
        .map(|hits| {
            hits.iter()
                .map(|(full_name, score)| state.repo_json(full_name, Some(*score)))
                .collect()
        })
        .unwrap_or_default();
    state.paginate(&uri, &params, hits, |total, items| {
        json!({ "total_count": total, "incomplete_results": false, "items": items })
    })
}

async fn list_commits(
    State(state): State<Arc<ApiState>>,
    Path((owner, name)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    state.record(&uri, &headers);
    let full_name = format!("{}/{}", owner, name);
    let commits: Vec<Value> = state
        .history(&full_name)
        .iter()
        .map(|sha| json!({ "sha": sha, "html_url": format!("https://github.com/{}/commit/{}", full_name, sha) }))
        .collect();
    state.paginate(&uri, &params, commits, |_, items| Value::Array(items))
}

async fn compare(
    State(state): State<Arc<ApiState>>,
    Path((owner, name, range)): Path<(String, String, String)>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    state.record(&uri, &headers);
    let full_name = format!("{}/{}", owner, name);
    let Some((base, _head)) = range.split_once("...") else {
        return not_found();
    };
    let history = state.history(&full_name);
    let position = history.iter().position(|sha| sha == base);
    let status = match position {
        Some(0) => "identical",
        Some(_) => "ahead",
        None => "diverged",
    };
    let ahead = &history[..position.unwrap_or(history.len())];
    let commits: Vec<Value> = ahead.iter().rev().map(|sha| json!({ "sha": sha })).collect();
    Json(json!({
        "status": status,
        "ahead_by": commits.len(),
        "behind_by": if status == "diverged" { 1 } else { 0 },
        "commits": commits,
    }))
    .into_response()
}

async fn list_tags(
    State(state): State<Arc<ApiState>>,
    Path((owner, name)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    state.record(&uri, &headers);
    let full_name = format!("{}/{}", owner, name);
    let tags: Vec<Value> = state
        .fixture
        .tags
        .get(&full_name)
        .map(|tags| {
            tags.iter()
                .map(|(name, sha)| json!({ "name": name, "commit": { "sha": sha } }))
                .collect()
        })
        .unwrap_or_default();
    state.paginate(&uri, &params, tags, |_, items| Value::Array(items))
}
