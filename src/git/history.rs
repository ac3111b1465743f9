use std::io;
use std::path::Path;
use std::process::Output;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::analysis::CommitHistory;
use crate::error::AccessorError;
use crate::types::CommitId;

use super::GitRunner;

const MISSING_OBJECT_MARKERS: [&str; 4] = [
    "bad object",
    "unknown revision",
    "bad revision",
    "not a valid commit",
];

/// History queries answered by running `git` against a mirror.
pub struct GitHistory<'a> {
    path: &'a Path,
    git: &'a dyn GitRunner,
    timeout: Option<Duration>,
}

impl<'a> GitHistory<'a> {
    #[must_use]
    pub fn new(path: &'a Path, git: &'a dyn GitRunner, timeout: Option<Duration>) -> Self {
        Self { path, git, timeout }
    }

    fn run(&self, args: &[&str]) -> Result<Output, AccessorError> {
        self.git
            .run_git_bounded(self.path, args, self.timeout)
            .map_err(|err| launch_error(args, &err))
    }

    /// Run a query about `commits` and return its trimmed stdout.
    ///
    /// A missing object is attributed to the commit git names in its error, falling back to
    /// the first of `commits`.
    fn query(&self, commits: &[&CommitId], args: &[&str]) -> Result<String, AccessorError> {
        let out = self.run(args)?;
        if out.status.success() {
            return Ok(String::from_utf8_lossy(&out.stdout).trim().to_string());
        }
        let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
        let missing = commits
            .iter()
            .find(|c| stderr.contains(c.as_str()))
            .or_else(|| commits.first());
        if let Some(commit) = missing
            && MISSING_OBJECT_MARKERS.iter().any(|m| stderr.contains(*m))
        {
            Err(AccessorError::NotFound((*commit).clone()))
        } else {
            Err(AccessorError::Command {
                command: args.join(" "),
                message: stderr,
            })
        }
    }
}

pub(crate) fn launch_error(args: &[&str], err: &io::Error) -> AccessorError {
    let command = args.join(" ");
    if err.kind() == io::ErrorKind::TimedOut {
        AccessorError::Timeout { command }
    } else {
        AccessorError::Command {
            command,
            message: err.to_string(),
        }
    }
}

impl CommitHistory for GitHistory<'_> {
    fn commit_timestamp(&self, commit: &CommitId) -> Result<DateTime<Utc>, AccessorError> {
        let args = ["show", "-s", "--format=%ct", commit.as_str()];
        let text = self.query(&[commit], &args)?;
        let malformed = |detail: String| AccessorError::Malformed {
            command: args.join(" "),
            detail,
        };
        let secs = text
            .parse::<i64>()
            .map_err(|_| malformed(format!("expected epoch seconds, got {text:?}")))?;
        DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| malformed(format!("timestamp {secs} is out of range")))
    }

    fn commit_author(&self, commit: &CommitId) -> Result<String, AccessorError> {
        self.query(&[commit], &["show", "-s", "--format=%an", commit.as_str()])
    }

    fn ancestry_difference(
        &self,
        from_tip: &CommitId,
        excluding_tip: &CommitId,
    ) -> Result<Vec<CommitId>, AccessorError> {
        let exclude = format!("^{excluding_tip}");
        let args = ["rev-list", "--topo-order", from_tip.as_str(), exclude.as_str()];
        let text = self.query(&[from_tip, excluding_tip], &args)?;
        text.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                CommitId::parse(line).ok_or_else(|| AccessorError::Malformed {
                    command: args.join(" "),
                    detail: format!("not an object name: {line:?}"),
                })
            })
            .collect()
    }

    fn is_ancestor(&self, commit: &CommitId, of_tip: &CommitId) -> Result<bool, AccessorError> {
        let args = ["merge-base", "--is-ancestor", commit.as_str(), of_tip.as_str()];
        let out = self.run(&args)?;
        match out.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(AccessorError::Command {
                command: args.join(" "),
                message: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            }),
        }
    }
}
