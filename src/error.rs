use std::path::PathBuf;

use thiserror::Error;

use crate::types::CommitId;

/// A mirror could not be created or refreshed. Fatal for that repository only.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to launch git: {source}")]
    Launch {
        #[source]
        source: std::io::Error,
    },
    #[error("failed to clone {url}: {stderr}")]
    Clone { url: String, stderr: String },
    #[error("failed to fetch {name}: {stderr}")]
    Fetch { name: String, stderr: String },
    #[error("failed to remove invalid mirror {}: {source}", path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A history query against a mirror failed. Contained at branch granularity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessorError {
    #[error("commit {0} not found in mirror")]
    NotFound(CommitId),
    #[error("git {command} timed out")]
    Timeout { command: String },
    #[error("malformed output from git {command}: {detail}")]
    Malformed { command: String, detail: String },
    #[error("git {command} failed: {message}")]
    Command { command: String, message: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {message}")]
    Invalid { message: String },
    #[error("a required storage directory ({}) is missing", path.display())]
    StorageMissing { path: PathBuf },
}
