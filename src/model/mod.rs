mod remote;
mod resolution;
mod subtree;

pub use remote::{Commit, CommitsSince, CompareStatus, RemoteRepository, SubtreeRemote, Tag};
pub use resolution::{Resolution, SubtreeState};
pub use subtree::Subtree;
