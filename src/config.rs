//! Invocation settings
//!
//! Precedence: command-line flag > environment > config file > default.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{SubtreeError, SubtreeResult};
use crate::repository::hosting::DEFAULT_API_BASE;
use crate::repository::{HostingConfig, RateLimiter};

pub const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const DEFAULT_WINDOW_BUFFER_SECS: u64 = 30;

/// `config.toml` contents; every key optional
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub api_base: Option<String>,
    pub branch: Option<String>,
    pub token_env: Option<String>,
    pub window_buffer_secs: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> SubtreeResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| file_error(path, e))?;
        Self::parse(&text).map_err(|e| file_error(path, e))
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

fn file_error(path: &Path, cause: impl std::fmt::Display) -> SubtreeError {
    SubtreeError::Config(format!("{}: {}", path.display(), cause))
}

/// Values supplied on the command line
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub api_base: Option<String>,
    pub branch: Option<String>,
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub hosting: HostingConfig,
    /// Added to the rate limit window to absorb clock skew
    pub window_buffer: Duration,
}

/// `<config dir>/git-subtree-remote/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("git-subtree-remote").join("config.toml"))
}

impl Config {
    /// Reads the config file (an explicit path must exist) and the environment
    pub fn load(overrides: &ConfigOverrides) -> SubtreeResult<Self> {
        let file = match &overrides.config_path {
            Some(path) => FileConfig::load(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => FileConfig::load(&path)?,
                _ => FileConfig::default(),
            },
        };
        Ok(Self::from_parts(file, overrides, |name| std::env::var(name).ok()))
    }

    pub fn from_parts(
        file: FileConfig,
        overrides: &ConfigOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let token_env = file.token_env.as_deref().unwrap_or(DEFAULT_TOKEN_ENV);
        let token = env(token_env)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let api_base = overrides
            .api_base
            .clone()
            .or(file.api_base)
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let branch = overrides.branch.clone().or(file.branch);
        let buffer = file.window_buffer_secs.unwrap_or(DEFAULT_WINDOW_BUFFER_SECS);

        Self {
            hosting: HostingConfig {
                api_base,
                token,
                branch,
            },
            window_buffer: Duration::from_secs(buffer),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.hosting.token.is_some()
    }

    /// Limiter sized for this invocation's credentials
    pub fn rate_limiter(&self) -> RateLimiter {
        RateLimiter::for_hosting_api(self.is_authenticated(), self.window_buffer)
    }
}
