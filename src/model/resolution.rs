use crate::error::SubtreeError;

use super::{Subtree, SubtreeRemote};

/// Outcome of resolving one subtree in a batch
#[derive(Debug)]
pub struct Resolution {
    pub subtree: Subtree,
    pub outcome: Result<SubtreeRemote, SubtreeError>,
}

/// What the report says about a subtree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtreeState {
    New,
    UpToDate,
    Ahead(u64),
    Diverged,
    Failed,
}

impl Resolution {
    pub fn state(&self) -> SubtreeState {
        match &self.outcome {
            Err(_) => SubtreeState::Failed,
            Ok(remote) if !remote.subtree.exists() => SubtreeState::New,
            Ok(remote) if remote.is_diverged() => SubtreeState::Diverged,
            Ok(remote) if remote.is_ahead() => SubtreeState::Ahead(remote.commits_since.ahead_by),
            Ok(_) => SubtreeState::UpToDate,
        }
    }

    pub fn remote(&self) -> Option<&SubtreeRemote> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&SubtreeError> {
        self.outcome.as_ref().err()
    }
}
