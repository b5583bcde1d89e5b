//! Choosing among same-named search hits
//!
//! The thresholds are tuned to the score range GitHub's repository search
//! returns, where an obvious winner usually scores well above 50 and leads
//! the runner-up by a wide gap. They are not a general outlier test.

use crate::error::{SubtreeError, SubtreeResult};
use crate::model::RemoteRepository;

use super::prompt::Prompt;

pub const HIGH_SCORE_THRESHOLD: f64 = 50.0;
pub const HIGH_MARGIN_THRESHOLD: f64 = 30.0;

/// How a candidate was picked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The only candidate
    Only,
    /// Top score cleared both thresholds
    Confident,
    /// Picked by a person
    Chosen,
}

/// Whether the first of `scores` (highest first) can be trusted without asking
pub fn is_confident(scores: &[f64]) -> bool {
    match scores {
        [] => false,
        [_] => true,
        [top, second, ..] => *top > HIGH_SCORE_THRESHOLD && top - second > HIGH_MARGIN_THRESHOLD,
    }
}

pub struct DisambiguationPolicy<P> {
    prompt: P,
}

impl<P: Prompt> DisambiguationPolicy<P> {
    pub fn new(prompt: P) -> Self {
        Self { prompt }
    }

    /// Picks one of `candidates`, ordered by relevance, asking the prompt
    /// when the top hit is not a clear winner.
    pub fn select(
        &self,
        query: &str,
        candidates: Vec<RemoteRepository>,
    ) -> SubtreeResult<(RemoteRepository, Decision)> {
        let (index, decision) = match candidates.len() {
            0 => return Err(SubtreeError::NotFound(query.to_string())),
            1 => (0, Decision::Only),
            _ => {
                let scores: Vec<f64> = candidates.iter().map(RemoteRepository::score_or_zero).collect();
                if is_confident(&scores) {
                    (0, Decision::Confident)
                } else {
                    (self.ask(query, &candidates)?, Decision::Chosen)
                }
            }
        };
        let chosen = candidates
            .into_iter()
            .nth(index)
            .ok_or_else(|| SubtreeError::NotFound(query.to_string()))?;
        Ok((chosen, decision))
    }

    /// Zero-based index of the chosen candidate, re-asking until in range
    fn ask(&self, query: &str, candidates: &[RemoteRepository]) -> SubtreeResult<usize> {
        let count = candidates.len();
        loop {
            let number = self.prompt.choose(query, candidates)?;
            if (1..=count).contains(&number) {
                return Ok(number - 1);
            }
            tracing::warn!(number, count, "selection out of range, asking again");
        }
    }
}
