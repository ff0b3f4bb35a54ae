//! Running git with environment isolation and cancellation.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::cancel::CancelToken;
use crate::error::{GitError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Create a `Command` for git with process-environment isolation.
///
/// Strips `GIT_DIR` and `GIT_WORK_TREE` so that inherited environment
/// variables cannot override the explicit `-C` path used everywhere in
/// this crate.
pub(crate) fn git_cmd() -> Command {
    let mut cmd = Command::new("git");
    cmd.env_remove("GIT_DIR").env_remove("GIT_WORK_TREE");
    cmd
}

/// `true` when a `git` binary can be launched.
pub fn git_available() -> bool {
    git_cmd()
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Captured result of one git invocation.
#[derive(Debug, Clone)]
pub(crate) struct GitOutput {
    pub command: String,
    pub stdout: Vec<u8>,
    pub stderr: String,
    pub success: bool,
}

impl GitOutput {
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Turn a non-zero exit into [`GitError::CommandFailed`].
    pub fn checked(self) -> Result<GitOutput> {
        if self.success {
            Ok(self)
        } else {
            Err(GitError::CommandFailed {
                command: self.command,
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

/// Run `git -C <repo> <args>` to completion, polling `cancel`.
///
/// A non-zero exit status is returned as data; callers decide whether it
/// is an error. The child is killed as soon as the token fires.
pub(crate) fn run_git<S: AsRef<str>>(
    repo: &Path,
    args: &[S],
    cancel: &CancelToken,
) -> Result<GitOutput> {
    let command = describe(args);
    if cancel.is_cancelled() {
        return Err(GitError::Cancelled { command });
    }
    debug!(repo = %repo.display(), %command, "running git");

    let mut child = git_cmd()
        .arg("-C")
        .arg(repo)
        .args(args.iter().map(AsRef::as_ref))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| GitError::Spawn {
            command: command.clone(),
            source,
        })?;

    let stdout_reader = child.stdout.take().map(|mut out| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = out.read_to_end(&mut buf);
            buf
        })
    });
    let stderr_reader = child.stderr.take().map(|mut err| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = err.read_to_end(&mut buf);
            buf
        })
    });

    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if cancel.is_cancelled() {
            let _ = child.kill();
            let _ = child.wait();
            debug!(%command, "git cancelled");
            return Err(GitError::Cancelled { command });
        }
        thread::sleep(POLL_INTERVAL);
    };

    let stdout = stdout_reader
        .and_then(|h| h.join().ok())
        .unwrap_or_default();
    let stderr = stderr_reader
        .and_then(|h| h.join().ok())
        .unwrap_or_default();

    Ok(GitOutput {
        command,
        stdout,
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
        success: status.success(),
    })
}

fn describe<S: AsRef<str>>(args: &[S]) -> String {
    let mut out = String::from("git");
    for arg in args {
        out.push(' ');
        out.push_str(arg.as_ref());
    }
    out
}
