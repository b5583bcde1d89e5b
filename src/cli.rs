use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ConfigOverrides;
use crate::logging::LogLevel;

#[derive(Parser, Debug)]
#[command(
    name = "git-subtree-remote",
    version,
    about = "Find the upstream repositories of git subtrees, then diff or pull them"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Hosting API base URL
    #[arg(long, global = true, env = "GIT_SUBTREE_REMOTE_API_BASE")]
    pub api_base: Option<String>,

    /// Branch to compare and pull instead of each repository's default branch
    #[arg(long, global = true)]
    pub branch: Option<String>,

    /// Config file [default: <config dir>/git-subtree-remote/config.toml]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    /// Hide progress bars
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl GlobalArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_base: self.api_base.clone(),
            branch: self.branch.clone(),
            config_path: self.config.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show how far each subtree is behind its upstream
    Diff(SelectArgs),
    /// Add new subtrees and pull updated ones from their upstream
    Pull(PullArgs),
}

impl Command {
    pub fn select(&self) -> &SelectArgs {
        match self {
            Command::Diff(select) => select,
            Command::Pull(args) => &args.select,
        }
    }
}

#[derive(Args, Debug)]
pub struct SelectArgs {
    /// Every subtree recorded in history that still exists
    #[arg(long, conflicts_with = "prefixes")]
    pub all: bool,

    /// Subtree directories, relative to the repository root
    pub prefixes: Vec<String>,
}

#[derive(Args, Debug)]
pub struct PullArgs {
    #[command(flatten)]
    pub select: SelectArgs,

    /// Pass --squash to git subtree
    #[arg(long)]
    pub squash: bool,

    /// Print the diff report and change nothing
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}
