use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::SyncError;
use crate::system::FsOps;

use super::GitRunner;

/// A synchronized local mirror, quiescent and ready for history queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryHandle {
    pub name: String,
    pub path: PathBuf,
}

#[must_use]
pub fn mirror_path(repos_dir: &Path, name: &str) -> PathBuf {
    repos_dir.join(format!("{name}.git"))
}

/// Clone `url` into `<repos_dir>/<name>.git` if absent, otherwise fetch and prune.
///
/// A directory at the mirror location that is not a bare repository is discarded and recloned.
///
/// # Errors
/// Returns an error when git cannot be launched, when clone or fetch fails, or when an invalid
/// mirror cannot be removed.
pub fn sync_repository(
    name: &str,
    url: &str,
    repos_dir: &Path,
    fs: &dyn FsOps,
    git: &dyn GitRunner,
) -> Result<RepositoryHandle, SyncError> {
    debug!("preparing mirror for {name}");
    let path = mirror_path(repos_dir, name);
    let handle = RepositoryHandle {
        name: name.to_string(),
        path: path.clone(),
    };

    if !fs.exists(&path) {
        info!("cloning {name} from {url}");
        clone_mirror(url, repos_dir, &path, git)?;
        return Ok(handle);
    }

    if !is_bare_repo(&path, fs, git) {
        warn!("deleting invalid mirror found at {}", path.display());
        fs.remove_dir_all(&path)
            .map_err(|source| SyncError::Cleanup {
                path: path.clone(),
                source,
            })?;
        info!("recloning {name} from {url}");
        clone_mirror(url, repos_dir, &path, git)?;
        return Ok(handle);
    }

    info!("fetching changes to {name}");
    let out = git
        .run_git(&path, &["fetch", "--prune", "origin"])
        .map_err(|source| SyncError::Launch { source })?;
    if !out.status.success() {
        return Err(SyncError::Fetch {
            name: name.to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        });
    }
    Ok(handle)
}

fn is_bare_repo(path: &Path, fs: &dyn FsOps, git: &dyn GitRunner) -> bool {
    if !fs.is_dir(path) {
        return false;
    }
    git.run_git(path, &["rev-parse", "--is-bare-repository"])
        .is_ok_and(|out| {
            out.status.success() && String::from_utf8_lossy(&out.stdout).trim() == "true"
        })
}

fn clone_mirror(
    url: &str,
    repos_dir: &Path,
    path: &Path,
    git: &dyn GitRunner,
) -> Result<(), SyncError> {
    let target = path.to_string_lossy();
    let out = git
        .run_git(repos_dir, &["clone", "--mirror", url, target.as_ref()])
        .map_err(|source| SyncError::Launch { source })?;
    if out.status.success() {
        Ok(())
    } else {
        Err(SyncError::Clone {
            url: url.to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        })
    }
}
