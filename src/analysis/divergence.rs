use tracing::{debug, warn};

use crate::error::AccessorError;
use crate::types::{BirthCommit, CommitId};

use super::CommitHistory;

/// Find the earliest commit unique to `branch_tip` relative to `base_tip`.
///
/// The birth commit is the last entry of the reverse-topological ancestry difference, i.e. the
/// boundary between "branch only" and "shared with base". Returns `None` when the branch has no
/// commits of its own. A timestamp that is missing or unreadable leaves `timestamp` empty
/// instead of failing.
///
/// Callers must not pass equal tips.
///
/// # Errors
/// Returns an error when the ancestry difference cannot be computed, or when the timestamp
/// lookup fails for a reason other than a missing or malformed commit.
pub fn find_birth_commit(
    history: &dyn CommitHistory,
    branch_tip: &CommitId,
    base_tip: &CommitId,
) -> Result<Option<BirthCommit>, AccessorError> {
    debug_assert_ne!(branch_tip, base_tip, "equal tips are classified by the caller");

    let unique = history.ancestry_difference(branch_tip, base_tip)?;
    let Some(commit) = unique.last().cloned() else {
        return Ok(None);
    };
    debug!(
        "{} commits unique to {}; birth commit {}",
        unique.len(),
        branch_tip.short(),
        commit.short()
    );

    let timestamp = match history.commit_timestamp(&commit) {
        Ok(ts) => Some(ts),
        Err(err @ (AccessorError::NotFound(_) | AccessorError::Malformed { .. })) => {
            warn!("no usable timestamp for birth commit {commit}: {err}");
            None
        }
        Err(err) => return Err(err),
    };

    Ok(Some(BirthCommit {
        commit,
        timestamp,
        unique_commits: unique.len(),
    }))
}
