use std::path::Path;

use tracing::{info, warn};

use crate::analysis::compute_metrics;
use crate::config::RepoSpec;
use crate::git::{GitHistory, GitRunner, list_branches, mirror_path, sync_repository};
use crate::system::{CancelFlag, FsOps};
use crate::types::{Options, RepoReport, RepoStatus};

/// Sync one repository, snapshot its branches, then analyse them.
///
/// The three steps run strictly in order so analysis never overlaps a fetch of the same
/// mirror.
pub(crate) fn process_repo(
    spec: &RepoSpec,
    repos_dir: &Path,
    opts: &Options,
    fs: &dyn FsOps,
    git: &dyn GitRunner,
    cancel: &CancelFlag,
) -> RepoReport {
    let mut report = RepoReport {
        name: spec.name.clone(),
        url: spec.url.clone(),
        base_branch: spec.base_branch.clone(),
        mirror_path: mirror_path(repos_dir, &spec.name).display().to_string(),
        status: RepoStatus::Cancelled,
        branches: Vec::new(),
        cancelled: false,
    };
    if cancel.is_cancelled() {
        return report;
    }

    let handle = match sync_repository(&spec.name, &spec.url, repos_dir, fs, git) {
        Ok(handle) => handle,
        Err(err) => {
            warn!("skipping {}: {err}", spec.name);
            report.status = RepoStatus::SyncFailed {
                cause: err.to_string(),
            };
            return report;
        }
    };

    let branches = match list_branches(&handle.path, git, opts.query_timeout) {
        Ok(branches) => branches,
        Err(err) => {
            warn!("cannot list branches of {}: {err}", spec.name);
            report.status = RepoStatus::SnapshotFailed {
                cause: err.to_string(),
            };
            return report;
        }
    };
    info!("fetched {} branches for {}", branches.len(), spec.name);

    let history = GitHistory::new(&handle.path, git, opts.query_timeout);
    report.branches = compute_metrics(
        &history,
        &branches,
        spec.base_branch.as_deref(),
        cancel,
    );
    report.cancelled = report
        .branches
        .iter()
        .any(|b| b.classification.is_cancelled());
    report.status = RepoStatus::Synced;
    report
}
