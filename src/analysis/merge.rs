use crate::error::AccessorError;
use crate::types::CommitId;

use super::CommitHistory;

/// A branch is merged when its tip is contained in the base branch's history.
///
/// Decided by ancestry over the graph, never by matching ref names.
///
/// # Errors
/// Returns an error when the ancestry query fails.
pub fn is_merged(
    history: &dyn CommitHistory,
    branch_tip: &CommitId,
    base_tip: &CommitId,
) -> Result<bool, AccessorError> {
    if branch_tip == base_tip {
        return Ok(true);
    }
    history.is_ancestor(branch_tip, base_tip)
}
