use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::AccessorError;
use crate::system::CancelFlag;
use crate::types::{BranchMetrics, BranchRef, Classification, CommitId};

use super::{CommitHistory, find_birth_commit, is_merged};

/// Produce one metrics record per branch of a snapshot, in snapshot order.
///
/// When `base_branch` is unset or absent from the snapshot every branch is classified
/// [`Classification::NoBaseBranch`] without any ancestry queries. Failures of single
/// branches are recorded as [`Classification::AnalysisFailed`]. Once `cancel` is raised no
/// further branches are started; those are recorded with [`Classification::cancelled`].
pub fn compute_metrics(
    history: &dyn CommitHistory,
    branches: &[BranchRef],
    base_branch: Option<&str>,
    cancel: &CancelFlag,
) -> Vec<BranchMetrics> {
    let base = base_branch.and_then(|name| branches.iter().find(|b| b.name == name));
    match (base_branch, base) {
        (Some(name), None) => warn!("base branch {name} not found among {} branches", branches.len()),
        (None, _) => warn!("no base branch configured"),
        _ => {}
    }

    branches
        .par_iter()
        .map(|branch| {
            if cancel.is_cancelled() {
                return BranchMetrics::unanalyzed(branch, Classification::cancelled());
            }
            let mut metrics = match base {
                Some(base) => classify(history, branch, base),
                None => BranchMetrics::unanalyzed(branch, Classification::NoBaseBranch),
            };
            metrics.author = tip_author(history, &branch.tip);
            metrics
        })
        .collect()
}

fn classify(history: &dyn CommitHistory, branch: &BranchRef, base: &BranchRef) -> BranchMetrics {
    if branch.name == base.name {
        return BranchMetrics::unanalyzed(branch, Classification::SelfBase);
    }
    if branch.tip == base.tip {
        return BranchMetrics {
            is_merged: true,
            ..BranchMetrics::unanalyzed(branch, Classification::SelfBase)
        };
    }
    analyze(history, branch, base).unwrap_or_else(|err| {
        warn!("analysis of branch {} failed: {err}", branch.name);
        BranchMetrics::unanalyzed(
            branch,
            Classification::AnalysisFailed {
                cause: err.to_string(),
            },
        )
    })
}

fn analyze(
    history: &dyn CommitHistory,
    branch: &BranchRef,
    base: &BranchRef,
) -> Result<BranchMetrics, AccessorError> {
    let Some(birth) = find_birth_commit(history, &branch.tip, &base.tip)? else {
        return Ok(BranchMetrics {
            unique_commits: Some(0),
            is_merged: true,
            ..BranchMetrics::unanalyzed(branch, Classification::NoDivergentCommits)
        });
    };
    let merged = is_merged(history, &branch.tip, &base.tip)?;
    Ok(BranchMetrics {
        birth_commit: Some(birth.commit),
        birth_timestamp: birth.timestamp,
        unique_commits: Some(birth.unique_commits),
        is_merged: merged,
        ..BranchMetrics::unanalyzed(branch, Classification::Analyzed)
    })
}

fn tip_author(history: &dyn CommitHistory, tip: &CommitId) -> Option<String> {
    match history.commit_author(tip) {
        Ok(author) => Some(author),
        Err(err) => {
            debug!("no author for {tip}: {err}");
            None
        }
    }
}
