mod history;
mod mirror;
mod refs;
mod runner;

#[cfg(all(test, unix))]
pub(crate) mod fake;

pub use history::GitHistory;
pub use mirror::{RepositoryHandle, mirror_path, sync_repository};
pub use refs::list_branches;
pub use runner::{DefaultGitRunner, GitRunner};
