//! Scripted `GitRunner` for unit tests.

use std::io;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::sync::Mutex;
use std::time::Duration;

use super::GitRunner;

enum Reply {
    Exit {
        code: i32,
        stdout: String,
        stderr: String,
    },
    Fail(io::ErrorKind),
}

#[derive(Default)]
pub(crate) struct ScriptedGit {
    replies: Vec<(Vec<String>, Reply)>,
    calls: Mutex<Vec<(PathBuf, Vec<String>)>>,
    timeouts: Mutex<Vec<Option<Duration>>>,
}

impl ScriptedGit {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on(self, args: &[&str], code: i32, stdout: &str) -> Self {
        self.reply(
            args,
            Reply::Exit {
                code,
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
        )
    }

    pub(crate) fn on_stderr(self, args: &[&str], code: i32, stderr: &str) -> Self {
        self.reply(
            args,
            Reply::Exit {
                code,
                stdout: String::new(),
                stderr: stderr.to_string(),
            },
        )
    }

    pub(crate) fn on_io_error(self, args: &[&str], kind: io::ErrorKind) -> Self {
        self.reply(args, Reply::Fail(kind))
    }

    fn reply(mut self, args: &[&str], reply: Reply) -> Self {
        self.replies
            .push((args.iter().map(ToString::to_string).collect(), reply));
        self
    }

    pub(crate) fn calls(&self) -> Vec<(PathBuf, Vec<String>)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Limits passed to bounded runs, in call order.
    pub(crate) fn timeouts(&self) -> Vec<Option<Duration>> {
        self.timeouts.lock().map(|t| t.clone()).unwrap_or_default()
    }

    pub(crate) fn called_with(&self, first_arg: &str) -> bool {
        self.calls()
            .iter()
            .any(|(_, args)| args.first().is_some_and(|a| a == first_arg))
    }
}

impl GitRunner for ScriptedGit {
    fn run_git(&self, repo: &Path, args: &[&str]) -> io::Result<Output> {
        let args: Vec<String> = args.iter().map(ToString::to_string).collect();
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((repo.to_path_buf(), args.clone()));
        }
        match self.replies.iter().find(|(expected, _)| *expected == args) {
            Some((_, Reply::Exit { code, stdout, stderr })) => Ok(Output {
                status: ExitStatus::from_raw(code << 8),
                stdout: stdout.clone().into_bytes(),
                stderr: stderr.clone().into_bytes(),
            }),
            Some((_, Reply::Fail(kind))) => Err(io::Error::from(*kind)),
            None => Ok(Output {
                status: ExitStatus::from_raw(128 << 8),
                stdout: Vec::new(),
                stderr: format!("fatal: unscripted git {}", args.join(" ")).into_bytes(),
            }),
        }
    }

    fn run_git_bounded(
        &self,
        repo: &Path,
        args: &[&str],
        timeout: Option<Duration>,
    ) -> io::Result<Output> {
        if let Ok(mut timeouts) = self.timeouts.lock() {
            timeouts.push(timeout);
        }
        self.run_git(repo, args)
    }
}
