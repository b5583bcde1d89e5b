use thiserror::Error;

/// Errors raised while locating and diffing subtree remotes
#[derive(Debug, Error)]
pub enum SubtreeError {
    /// Nothing exists at the identifier tried, or every strategy came up empty
    #[error("no remote found for `{0}`")]
    NotFound(String),

    /// The invocation itself is unusable
    #[error("{0}")]
    Validation(String),

    /// The hosting API answered with a failure status
    #[error("{url} returned HTTP {status}: {body}")]
    Transport {
        url: String,
        status: u16,
        body: String,
    },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SubtreeError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SubtreeError::NotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, SubtreeError::Validation(_))
    }

    /// Failures talking to the hosting API (status, connection, or payload)
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            SubtreeError::Transport { .. } | SubtreeError::Http(_) | SubtreeError::Decode { .. }
        )
    }
}

pub type SubtreeResult<T> = Result<T, SubtreeError>;
