//! Subcommand drivers

use anyhow::{Context, Result};
use indicatif::MultiProgress;
use std::io::{IsTerminal, Write};
use std::process::ExitCode;
use std::sync::Arc;

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::model::{Resolution, SubtreeRemote};
use crate::progress;
use crate::report::{diverged_line, render_diff, up_to_date_line};
use crate::repository::{
    GitHistory, GitHubClient, GitSubtreeCommand, SubtreeAction, SubtreeMutator, collect_subtrees,
};
use crate::resolver::{NonInteractive, Prompt, SubtreeRemoteResolver, TerminalPrompt};

pub const EXIT_OK: u8 = 0;
pub const EXIT_ALL_FAILED: u8 = 1;
pub const EXIT_USAGE: u8 = 2;

/// What `pull` does with one resolved subtree
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Update<'a> {
    Add(&'a SubtreeRemote),
    Pull(&'a SubtreeRemote),
    Current(&'a SubtreeRemote),
}

/// Updates for every resolved subtree, in input order. Failed ones are skipped.
pub fn plan_updates(resolutions: &[Resolution]) -> Vec<Update<'_>> {
    resolutions
        .iter()
        .filter_map(Resolution::remote)
        .map(|remote| {
            if !remote.subtree.exists() {
                Update::Add(remote)
            } else if remote.is_ahead() || remote.is_diverged() {
                Update::Pull(remote)
            } else {
                Update::Current(remote)
            }
        })
        .collect()
}

/// Runs the planned updates, stopping at the first `git subtree` failure
pub fn apply_updates(
    updates: &[Update<'_>],
    mutator: &impl SubtreeMutator,
    squash: bool,
    out: &mut impl Write,
) -> Result<()> {
    for update in updates {
        let (action, remote) = match *update {
            Update::Add(remote) => (SubtreeAction::Add, remote),
            Update::Pull(remote) => {
                if remote.is_diverged() {
                    writeln!(out, "{}", diverged_line(remote))?;
                }
                (SubtreeAction::Pull, remote)
            }
            Update::Current(remote) => {
                writeln!(out, "{}", up_to_date_line(remote))?;
                continue;
            }
        };
        tracing::info!(
            prefix = remote.subtree.prefix(),
            repo = %remote.repository.full_name,
            ?action,
            "updating subtree"
        );
        mutator.apply(
            action,
            remote.subtree.prefix(),
            &remote.repository.clone_url,
            &remote.commits_since.branch,
            squash,
        )?;
    }
    Ok(())
}

/// 1 only when every subtree failed to resolve
pub fn exit_status(resolutions: &[Resolution]) -> u8 {
    if !resolutions.is_empty() && resolutions.iter().all(|r| r.outcome.is_err()) {
        EXIT_ALL_FAILED
    } else {
        EXIT_OK
    }
}

pub async fn run(cli: Cli) -> Result<ExitCode> {
    let Cli { command, global } = cli;
    let config = Config::load(&global.overrides()).context("Could not load configuration")?;

    let cwd = std::env::current_dir().context("Could not determine current directory")?;
    let history = GitHistory::discover(&cwd).context("Not inside a git repository")?;
    let workdir = history.workdir()?;

    let select = command.select();
    let subtrees = match collect_subtrees(&history, &workdir, select.all, &select.prefixes) {
        Ok(subtrees) => subtrees,
        Err(e) if e.is_validation() => {
            eprintln!("Error: {}", e);
            return Ok(ExitCode::from(EXIT_USAGE));
        }
        Err(e) => return Err(e.into()),
    };

    let limiter = Arc::new(config.rate_limiter());
    tracing::debug!(
        capacity = limiter.capacity(),
        interval_ms = limiter.interval().as_millis() as u64,
        "rate limit"
    );
    let client = GitHubClient::new(&config.hosting, limiter)?;

    let bars = MultiProgress::new();
    let reporter = progress::reporter(global.quiet, &bars);
    let terminal = TerminalPrompt::new(Some(bars.clone()));
    let prompt: &dyn Prompt = if std::io::stdin().is_terminal() {
        &terminal
    } else {
        &NonInteractive
    };

    let resolver = SubtreeRemoteResolver::new(&client, prompt);
    let resolutions = resolver.resolve_all(&subtrees, reporter.as_ref()).await;

    let styled = std::io::stdout().is_terminal();
    let mut stdout = std::io::stdout().lock();
    match &command {
        Command::Pull(args) if !args.dry_run => {
            for resolution in &resolutions {
                if let Some(e) = resolution.error() {
                    eprintln!("{}: {}", resolution.subtree.prefix(), e);
                }
            }
            let mutator = GitSubtreeCommand::new(workdir);
            apply_updates(&plan_updates(&resolutions), &mutator, args.squash, &mut stdout)?;
            write!(stdout, "{}", mutator.status()?)?;
        }
        _ => write!(stdout, "{}", render_diff(&resolutions, styled))?,
    }
    stdout.flush()?;

    Ok(ExitCode::from(exit_status(&resolutions)))
}
