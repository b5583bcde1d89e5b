//! Subtree records in the local repository's history
//!
//! `git subtree add/merge/pull` leave two trailers in the commit message:
//! `git-subtree-dir: <prefix>` and `git-subtree-split: <sha>`.

use git2::{ErrorCode, Repository, Sort};
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

use crate::error::{SubtreeError, SubtreeResult};
use crate::model::Subtree;
use crate::util::path::normalize_prefix;

const DIR_MARKER: &str = "git-subtree-dir:";
const SPLIT_MARKER: &str = "git-subtree-split:";

/// Read-only view of recorded subtree imports
pub trait SubtreeHistory {
    /// Newest split ref per recorded prefix (`None` if a record had no split)
    fn records(&self) -> SubtreeResult<FxHashMap<String, Option<String>>>;

    /// Split ref of the most recent import of `prefix`, if any
    fn last_split_ref(&self, prefix: &str) -> SubtreeResult<Option<String>> {
        Ok(self.records()?.remove(&normalize_prefix(prefix)).flatten())
    }

    /// Every prefix ever recorded, sorted
    fn recorded_prefixes(&self) -> SubtreeResult<Vec<String>> {
        Ok(sorted_prefixes(&self.records()?))
    }
}

fn sorted_prefixes(records: &FxHashMap<String, Option<String>>) -> Vec<String> {
    let mut prefixes: Vec<String> = records.keys().cloned().collect();
    prefixes.sort();
    prefixes
}

/// Markers found in one commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitMarker {
    pub dir: String,
    pub split: Option<String>,
}

/// Reads the markers of a single commit message.
pub fn parse_markers(message: &str) -> Option<SplitMarker> {
    let mut dir = None;
    let mut split = None;
    for line in message.lines() {
        let line = line.trim();
        if let Some(value) = line.strip_prefix(DIR_MARKER) {
            let value = normalize_prefix(value);
            if !value.is_empty() && dir.is_none() {
                dir = Some(value);
            }
        } else if let Some(value) = line.strip_prefix(SPLIT_MARKER) {
            let value = value.trim();
            if split.is_none() && !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric()) {
                split = Some(value.to_string());
            }
        }
    }
    dir.map(|dir| SplitMarker { dir, split })
}

/// Local git repository, scanned with git2
pub struct GitHistory {
    repo: Repository,
}

impl GitHistory {
    /// Open the repository containing `path`
    pub fn discover(path: &Path) -> SubtreeResult<Self> {
        Ok(Self {
            repo: Repository::discover(path)?,
        })
    }

    /// Working tree root
    pub fn workdir(&self) -> SubtreeResult<PathBuf> {
        self.repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| SubtreeError::Validation("repository has no working tree".to_string()))
    }

    /// Newest split ref per recorded prefix (`None` if a record had no split)
    fn scan(&self) -> SubtreeResult<FxHashMap<String, Option<String>>> {
        let mut records: FxHashMap<String, Option<String>> = FxHashMap::default();

        let mut revwalk = self.repo.revwalk()?;
        match revwalk.push_head() {
            Ok(()) => {}
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                return Ok(records);
            }
            Err(e) => return Err(e.into()),
        }
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;

        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            let Some(message) = commit.message() else {
                continue;
            };
            if let Some(marker) = parse_markers(message) {
                // Newest first, so the first record per prefix wins
                let entry = records.entry(marker.dir).or_insert(None);
                if entry.is_none() {
                    *entry = marker.split;
                }
            }
        }
        Ok(records)
    }
}

impl SubtreeHistory for GitHistory {
    fn records(&self) -> SubtreeResult<FxHashMap<String, Option<String>>> {
        self.scan()
    }
}

/// Builds the subtrees of one invocation, reading history once.
///
/// With `all`, every recorded prefix still present under `workdir`.
/// Otherwise the given prefixes; one missing on disk is treated as new.
pub fn collect_subtrees(
    history: &impl SubtreeHistory,
    workdir: &Path,
    all: bool,
    prefixes: &[String],
) -> SubtreeResult<Vec<Subtree>> {
    if !all && prefixes.is_empty() {
        return Err(SubtreeError::Validation(
            "At least 1 subtree prefix is required (or set --all)".to_string(),
        ));
    }
    let records = history.records()?;

    let prefixes: Vec<String> = if all {
        let existing: Vec<String> = sorted_prefixes(&records)
            .into_iter()
            .filter(|p| workdir.join(p).exists())
            .collect();
        if existing.is_empty() {
            return Err(SubtreeError::Validation("No subtrees found in this repo".to_string()));
        }
        existing
    } else {
        prefixes.to_vec()
    };

    let mut subtrees = Vec::with_capacity(prefixes.len());
    for prefix in &prefixes {
        let normalized = normalize_prefix(prefix);
        let split = if !normalized.is_empty() && workdir.join(&normalized).exists() {
            records.get(&normalized).cloned().flatten()
        } else {
            None
        };
        let subtree = Subtree::new(&normalized, split)
            .ok_or_else(|| SubtreeError::Validation(format!("invalid subtree prefix `{}`", prefix)))?;
        subtrees.push(subtree);
    }
    Ok(subtrees)
}
