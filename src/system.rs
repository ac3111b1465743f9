use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

pub trait FsOps: Sync {
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    /// Remove a directory tree.
    ///
    /// # Errors
    /// Returns the underlying I/O error when the tree cannot be removed.
    fn remove_dir_all(&self, path: &Path) -> std::io::Result<()>;
    fn expand_tilde(&self, p: &Path) -> PathBuf;
}

pub struct DefaultFsOps;
impl FsOps for DefaultFsOps {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
    fn remove_dir_all(&self, path: &Path) -> std::io::Result<()> {
        std::fs::remove_dir_all(path)
    }
    fn expand_tilde(&self, p: &Path) -> PathBuf {
        if let Some(home) = std::env::var_os("HOME")
            && let Ok(rest) = p.strip_prefix("~")
        {
            return PathBuf::from(home).join(rest);
        }
        p.to_path_buf()
    }
}

pub trait Clock {
    fn now(&self) -> SystemTime;
}

pub struct DefaultClock;
impl Clock for DefaultClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Run-level cancellation, observed between repositories and between branches.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
