pub mod hosting;
mod local;
mod mutator;
mod rate_limit;

pub use hosting::{GitHubClient, HostingConfig, RepositorySearch};
pub use local::{GitHistory, SplitMarker, SubtreeHistory, collect_subtrees, parse_markers};
pub use mutator::{GitSubtreeCommand, SubtreeAction, SubtreeMutator};
pub use rate_limit::RateLimiter;
