use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

pub trait GitRunner: Sync {
    /// Run the `git` command within the given `repo` with `args`.
    ///
    /// # Errors
    /// Returns an error if the `git` process cannot be spawned or fails during execution.
    fn run_git(&self, repo: &Path, args: &[&str]) -> io::Result<Output>;

    /// Like [`GitRunner::run_git`], but gives up once `timeout` has elapsed.
    ///
    /// # Errors
    /// Returns an error of kind [`io::ErrorKind::TimedOut`] when the limit is exceeded.
    fn run_git_bounded(
        &self,
        repo: &Path,
        args: &[&str],
        timeout: Option<Duration>,
    ) -> io::Result<Output>;
}

pub struct DefaultGitRunner;

impl DefaultGitRunner {
    fn command(repo: &Path, args: &[&str]) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C")
            .arg(repo)
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl GitRunner for DefaultGitRunner {
    fn run_git(&self, repo: &Path, args: &[&str]) -> io::Result<Output> {
        Self::command(repo, args).output()
    }

    fn run_git_bounded(
        &self,
        repo: &Path,
        args: &[&str],
        timeout: Option<Duration>,
    ) -> io::Result<Output> {
        let Some(limit) = timeout else {
            return self.run_git(repo, args);
        };
        let child = Self::command(repo, args).spawn()?;
        wait_with_deadline(child, Instant::now() + limit).map_err(|err| {
            if err.kind() == io::ErrorKind::TimedOut {
                io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("git {} exceeded {:.1}s", args.join(" "), limit.as_secs_f64()),
                )
            } else {
                err
            }
        })
    }
}

fn wait_with_deadline(mut child: Child, deadline: Instant) -> io::Result<Output> {
    // Drain both pipes while polling so a chatty child cannot block on a full pipe.
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let stdout_reader = thread::spawn(move || drain(stdout));
    let stderr_reader = thread::spawn(move || drain(stderr));

    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(io::Error::from(io::ErrorKind::TimedOut));
        }
        thread::sleep(POLL_INTERVAL);
    };

    Ok(Output {
        status,
        stdout: stdout_reader.join().unwrap_or_default(),
        stderr: stderr_reader.join().unwrap_or_default(),
    })
}

fn drain(pipe: Option<impl Read>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf);
    }
    buf
}
