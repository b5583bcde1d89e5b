use indicatif::MultiProgress;
use std::io::{self, BufRead, Write};

use crate::error::{SubtreeError, SubtreeResult};
use crate::model::RemoteRepository;

/// Asks a person to pick one of several candidate repositories
pub trait Prompt {
    /// Returns the 1-based number picked. Callers validate the range.
    fn choose(&self, query: &str, candidates: &[RemoteRepository]) -> SubtreeResult<usize>;
}

impl<P: Prompt + ?Sized> Prompt for &P {
    fn choose(&self, query: &str, candidates: &[RemoteRepository]) -> SubtreeResult<usize> {
        (**self).choose(query, candidates)
    }
}

/// Numbered list on stderr, answer read from stdin
pub struct TerminalPrompt {
    bars: Option<MultiProgress>,
}

impl TerminalPrompt {
    /// `bars` are hidden while waiting for input
    pub fn new(bars: Option<MultiProgress>) -> Self {
        Self { bars }
    }

    fn ask(&self, query: &str, candidates: &[RemoteRepository]) -> SubtreeResult<usize> {
        let count = candidates.len();
        let stdin = io::stdin();
        let mut stderr = io::stderr();
        writeln!(stderr)?;
        writeln!(stderr, "{}", render_choices(query, candidates))?;
        loop {
            write!(stderr, "Enter a number 1-{}: ", count)?;
            stderr.flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no selection entered").into());
            }
            match parse_selection(&line, count) {
                Some(number) => return Ok(number),
                None => writeln!(stderr, "Error: {} is not in the range 1-{}.", line.trim(), count)?,
            }
        }
    }
}

impl Prompt for TerminalPrompt {
    fn choose(&self, query: &str, candidates: &[RemoteRepository]) -> SubtreeResult<usize> {
        let run = || tokio::task::block_in_place(|| self.ask(query, candidates));
        match &self.bars {
            Some(bars) => bars.suspend(run),
            None => run(),
        }
    }
}

/// Always the top candidate; for tests and benchmarks
pub struct FirstCandidate;

impl Prompt for FirstCandidate {
    fn choose(&self, _query: &str, _candidates: &[RemoteRepository]) -> SubtreeResult<usize> {
        Ok(1)
    }
}

/// Refuses to guess when nobody can answer (stdin is not a terminal)
pub struct NonInteractive;

impl Prompt for NonInteractive {
    fn choose(&self, query: &str, candidates: &[RemoteRepository]) -> SubtreeResult<usize> {
        Err(SubtreeError::Validation(format!(
            "{} remotes match `{}`; run in a terminal to choose one",
            candidates.len(),
            query
        )))
    }
}

/// The numbered candidate table shown before asking
pub fn render_choices(query: &str, candidates: &[RemoteRepository]) -> String {
    let url_width = candidates.iter().map(|r| r.html_url.len()).max().unwrap_or(0) + 3;
    let mut out = format!("Multiple remote repos found for {}.\n", query);
    out.push_str(&format!("{:<4} {:<width$} {:>}\n", "", "Remote", "Score", width = url_width));
    for (i, repo) in candidates.iter().enumerate() {
        out.push_str(&format!(
            "{:<4} {:<width$} {:>}\n",
            format!("[{}]", i + 1),
            repo.html_url,
            repo.score_or_zero(),
            width = url_width
        ));
    }
    out
}

/// 1-based selection within `1..=count`
pub fn parse_selection(input: &str, count: usize) -> Option<usize> {
    input
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=count).contains(n))
}
