use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::{ThreadPoolBuilder, prelude::*};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::ConfigError;
use crate::git::GitRunner;
use crate::system::{CancelFlag, Clock, FsOps};
use crate::types::{Options, RepoReport, ReportData};

use super::repository::process_repo;

const DEFAULT_REPOS_DIR: &str = "~/repos";

/// Sync and analyse every configured repository, in configuration order.
///
/// Repositories run on a bounded worker pool; each repository is synced before any of its
/// branches are analysed. Failures of single repositories or branches are recorded in the
/// report rather than returned.
///
/// # Errors
/// Returns [`ConfigError::StorageMissing`] when the storage directory does not exist.
pub fn collect_report_data(
    config: &Config,
    opts: &Options,
    fs: &dyn FsOps,
    git: &dyn GitRunner,
    clock: &dyn Clock,
    cancel: &CancelFlag,
) -> Result<ReportData, ConfigError> {
    let repos_dir = resolve_repos_dir(config, opts, fs)?;
    let generated_at: DateTime<Utc> = clock.now().into();

    let progress = ProgressBar::new(config.repos.len() as u64);
    let style =
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress.set_style(style);
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_message("collecting branch metrics");

    let run = || -> Vec<RepoReport> {
        config
            .repos
            .par_iter()
            .map(|spec| {
                let report = process_repo(spec, &repos_dir, opts, fs, git, cancel);
                progress.inc(1);
                report
            })
            .collect()
    };

    let thread_count = if opts.jobs == 0 {
        num_cpus::get()
    } else {
        opts.jobs
    };
    debug!(
        "repos_dir={} repos={} threads={thread_count}",
        repos_dir.display(),
        config.repos.len()
    );
    let repos = match ThreadPoolBuilder::new().num_threads(thread_count).build() {
        Ok(pool) => pool.install(run),
        Err(err) => {
            warn!("falling back to the global worker pool: {err}");
            run()
        }
    };

    if cancel.is_cancelled() {
        progress.abandon_with_message("cancelled");
    } else {
        progress.finish_with_message("done");
    }

    Ok(ReportData { generated_at, repos })
}

fn resolve_repos_dir(
    config: &Config,
    opts: &Options,
    fs: &dyn FsOps,
) -> Result<PathBuf, ConfigError> {
    let configured = opts
        .repos_dir
        .as_deref()
        .or(config.repos_dir.as_deref())
        .unwrap_or_else(|| Path::new(DEFAULT_REPOS_DIR));
    let path = fs.expand_tilde(configured);
    if fs.is_dir(&path) {
        Ok(path)
    } else {
        Err(ConfigError::StorageMissing { path })
    }
}
