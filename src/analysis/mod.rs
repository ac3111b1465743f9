//! Branch divergence and merge analysis over a commit graph.
//!
//! The graph itself is reached through [`CommitHistory`]; everything in this module is a pure
//! function of the commit ids it is given plus the answers the history returns.

mod aggregator;
mod divergence;
mod merge;

pub use aggregator::compute_metrics;
pub use divergence::find_birth_commit;
pub use merge::is_merged;

use chrono::{DateTime, Utc};

use crate::error::AccessorError;
use crate::types::CommitId;

/// Read-only queries against one repository's commit graph.
///
/// Implementations must tolerate concurrent queries.
pub trait CommitHistory: Sync {
    /// # Errors
    /// [`AccessorError::NotFound`] when the commit is unknown.
    fn commit_timestamp(&self, commit: &CommitId) -> Result<DateTime<Utc>, AccessorError>;

    /// # Errors
    /// [`AccessorError::NotFound`] when the commit is unknown.
    fn commit_author(&self, commit: &CommitId) -> Result<String, AccessorError>;

    /// Commits reachable from `from_tip` and not from `excluding_tip`, most recent first.
    ///
    /// Every commit precedes its parents in the returned order.
    ///
    /// # Errors
    /// Returns an error when the query cannot be answered.
    fn ancestry_difference(
        &self,
        from_tip: &CommitId,
        excluding_tip: &CommitId,
    ) -> Result<Vec<CommitId>, AccessorError>;

    /// Whether `commit` is `of_tip` or reachable from it.
    ///
    /// # Errors
    /// Returns an error when the query cannot be answered.
    fn is_ancestor(&self, commit: &CommitId, of_tip: &CommitId) -> Result<bool, AccessorError>;
}
