use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Object name of a commit in a mirror.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CommitId(String);

impl CommitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Accepts an abbreviated or full hexadecimal object name.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let valid_len = (4..=64).contains(&raw.len());
        if valid_len && raw.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(Self(raw.to_ascii_lowercase()))
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
    pub name: String,
    pub tip: CommitId,
}

impl BranchRef {
    pub fn new(name: impl Into<String>, tip: CommitId) -> Self {
        Self {
            name: name.into(),
            tip,
        }
    }
}

/// Earliest commit reachable from a branch tip but not from the base tip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthCommit {
    pub commit: CommitId,
    pub timestamp: Option<DateTime<Utc>>,
    /// Size of the ancestry difference the commit was taken from.
    pub unique_commits: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    Analyzed,
    SelfBase,
    NoBaseBranch,
    NoDivergentCommits,
    AnalysisFailed { cause: String },
}

const CANCELLED_CAUSE: &str = "run cancelled";

impl Classification {
    /// Marks a branch that was never started because the run was cancelled.
    #[must_use]
    pub fn cancelled() -> Self {
        Self::AnalysisFailed {
            cause: CANCELLED_CAUSE.to_string(),
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::AnalysisFailed { cause } if cause == CANCELLED_CAUSE)
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Analyzed => "analyzed",
            Self::SelfBase => "self-base",
            Self::NoBaseBranch => "no-base-branch",
            Self::NoDivergentCommits => "no-divergent-commits",
            Self::AnalysisFailed { .. } => "analysis-failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchMetrics {
    pub branch_name: String,
    pub tip: CommitId,
    pub author: Option<String>,
    pub birth_commit: Option<CommitId>,
    pub birth_timestamp: Option<DateTime<Utc>>,
    pub unique_commits: Option<usize>,
    pub is_merged: bool,
    pub classification: Classification,
}

impl BranchMetrics {
    /// A record with nothing computed beyond its classification.
    #[must_use]
    pub fn unanalyzed(branch: &BranchRef, classification: Classification) -> Self {
        Self {
            branch_name: branch.name.clone(),
            tip: branch.tip.clone(),
            author: None,
            birth_commit: None,
            birth_timestamp: None,
            unique_commits: None,
            is_merged: false,
            classification,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepoStatus {
    Synced,
    SyncFailed { cause: String },
    SnapshotFailed { cause: String },
    Cancelled,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepoReport {
    pub name: String,
    pub url: String,
    pub base_branch: Option<String>,
    pub mirror_path: String,
    pub status: RepoStatus,
    pub branches: Vec<BranchMetrics>,
    /// Set when cancellation left some branches of the snapshot unanalysed.
    pub cancelled: bool,
}

impl RepoReport {
    #[must_use]
    pub fn base_missing(&self) -> bool {
        self.status == RepoStatus::Synced
            && self
                .branches
                .iter()
                .any(|b| b.classification == Classification::NoBaseBranch)
    }

    pub fn merged_branches(&self) -> impl Iterator<Item = &BranchMetrics> {
        self.branches.iter().filter(|b| b.is_merged)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub generated_at: DateTime<Utc>,
    pub repos: Vec<RepoReport>,
}

#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Overrides the storage directory named in the config file.
    pub repos_dir: Option<PathBuf>,
    /// Worker threads; `0` means one per CPU.
    pub jobs: usize,
    /// Upper bound for each history query against a mirror.
    pub query_timeout: Option<Duration>,
}
