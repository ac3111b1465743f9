use std::path::Path;
use std::time::Duration;

use tracing::debug;

use crate::error::AccessorError;
use crate::types::{BranchRef, CommitId};

use super::GitRunner;
use super::history::launch_error;

const BRANCH_FORMAT: &str = "--format=%(objectname)%09%(refname)%09%(symref)";
const HEADS_PREFIX: &str = "refs/heads/";

/// Snapshot the branches of a mirror as `(name, tip)` pairs, sorted by name.
///
/// Symbolic refs (e.g. a default-branch pointer) are skipped.
///
/// # Errors
/// Returns an error when git fails, times out, or prints an unexpected line.
pub fn list_branches(
    repo: &Path,
    git: &dyn GitRunner,
    timeout: Option<Duration>,
) -> Result<Vec<BranchRef>, AccessorError> {
    let args = ["for-each-ref", BRANCH_FORMAT, "refs/heads"];
    let out = git
        .run_git_bounded(repo, &args, timeout)
        .map_err(|err| launch_error(&args, &err))?;
    if !out.status.success() {
        return Err(AccessorError::Command {
            command: args.join(" "),
            message: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        });
    }
    parse_branches(&String::from_utf8_lossy(&out.stdout))
}

fn parse_branches(text: &str) -> Result<Vec<BranchRef>, AccessorError> {
    let mut branches = Vec::new();
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let mut fields = line.split('\t');
        let (Some(object), Some(refname)) = (fields.next(), fields.next()) else {
            return Err(malformed(line));
        };
        let symref = fields.next().unwrap_or("").trim();
        if !symref.is_empty() {
            debug!("skipping symbolic ref {refname} -> {symref}");
            continue;
        }
        let Some(name) = refname.strip_prefix(HEADS_PREFIX) else {
            return Err(malformed(line));
        };
        if name == "HEAD" {
            continue;
        }
        let tip = CommitId::parse(object).ok_or_else(|| malformed(line))?;
        debug!("ref {name:40} is commit {tip}");
        branches.push(BranchRef::new(name, tip));
    }
    Ok(branches)
}

fn malformed(line: &str) -> AccessorError {
    AccessorError::Malformed {
        command: "for-each-ref".to_string(),
        detail: format!("unexpected line {line:?}"),
    }
}
