#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod git;
pub mod output;
mod report;
mod system;
mod types;

pub use analysis::{CommitHistory, compute_metrics, find_birth_commit, is_merged};
pub use config::{Config, RepoSpec, load_config};
pub use error::{AccessorError, ConfigError, SyncError};
pub use git::{DefaultGitRunner, GitRunner};
pub use report::{collect_report_data, generate_report, humanize_age};
pub use system::{CancelFlag, Clock, DefaultClock, DefaultFsOps, FsOps};
pub use types::{
    BirthCommit, BranchMetrics, BranchRef, Classification, CommitId, Options, RepoReport,
    RepoStatus, ReportData,
};
