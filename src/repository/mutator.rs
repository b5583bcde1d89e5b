//! Writes to the local repository, delegated to `git subtree`

use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use std::process::Command;

/// How a subtree gets its upstream changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtreeAction {
    Add,
    Pull,
}

impl SubtreeAction {
    fn as_str(self) -> &'static str {
        match self {
            SubtreeAction::Add => "add",
            SubtreeAction::Pull => "pull",
        }
    }
}

pub trait SubtreeMutator {
    fn apply(&self, action: SubtreeAction, prefix: &str, url: &str, branch: &str, squash: bool) -> Result<()>;

    /// Short working tree summary shown after updating
    fn status(&self) -> Result<String>;
}

/// Runs the `git` binary in the repository's working tree
pub struct GitSubtreeCommand {
    workdir: PathBuf,
}

impl GitSubtreeCommand {
    pub fn new(workdir: PathBuf) -> Self {
        Self { workdir }
    }

    /// Arguments for `git`, without the binary itself
    pub fn subtree_args(action: SubtreeAction, prefix: &str, url: &str, branch: &str, squash: bool) -> Vec<String> {
        let mut args = vec![
            "subtree".to_string(),
            action.as_str().to_string(),
            format!("--prefix={}", prefix),
        ];
        if squash {
            args.push("--squash".to_string());
        }
        args.push(url.to_string());
        args.push(branch.to_string());
        args
    }

    fn run(&self, args: &[String]) -> Result<String> {
        tracing::debug!(?args, workdir = %self.workdir.display(), "running git");
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .context("Failed to run git")?;

        if !output.status.success() {
            bail!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl SubtreeMutator for GitSubtreeCommand {
    fn apply(&self, action: SubtreeAction, prefix: &str, url: &str, branch: &str, squash: bool) -> Result<()> {
        let args = Self::subtree_args(action, prefix, url, branch, squash);
        self.run(&args)
            .with_context(|| format!("Failed to {} subtree {}", action.as_str(), prefix))?;
        Ok(())
    }

    fn status(&self) -> Result<String> {
        self.run(&["status".to_string()])
    }
}
