//! Errors surfaced by the git adapter.

use std::path::PathBuf;

use thiserror::Error;

/// Environment failures. Every variant names the command, ref or path it
/// came from.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("not a git repository: {} (ensure you're in a git repository)", path.display())]
    NotARepository { path: PathBuf },

    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("`{command}` was cancelled")]
    Cancelled { command: String },

    #[error("base_ref required for range scope")]
    MissingBaseRef,

    #[error("unexpected output from `{command}`: {detail}")]
    InvalidOutput { command: String, detail: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GitError {
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, GitError::Cancelled { .. })
    }
}

pub type Result<T, E = GitError> = std::result::Result<T, E>;
