//! Where commit history and file contents come from.

use anyhow::Result;
use chrono::{DateTime, Utc};
use churnlens_git::{GitProvider, WORKING_REF};
use churnlens_types::CommitInfo;

/// History queries the frequency analyzer needs.
///
/// [`GitProvider`] is the production implementation; tests substitute an
/// in-memory history.
pub trait CommitSource {
    /// Commits since `since`, restricted to files matching `pattern` when given.
    fn repo_history(&self, since: DateTime<Utc>, pattern: Option<&str>) -> Result<Vec<CommitInfo>>;

    fn file_history(&self, path: &str, since: DateTime<Utc>) -> Result<Vec<CommitInfo>>;

    /// Commits touching a line range of `path`.
    fn symbol_history(
        &self,
        path: &str,
        start_line: u32,
        end_line: u32,
        since: DateTime<Utc>,
    ) -> Result<Vec<CommitInfo>>;

    /// Current working-tree content of `path`.
    fn file_content(&self, path: &str) -> Result<Vec<u8>>;
}

impl CommitSource for GitProvider {
    fn repo_history(&self, since: DateTime<Utc>, pattern: Option<&str>) -> Result<Vec<CommitInfo>> {
        Ok(GitProvider::repo_history(self, since, pattern)?)
    }

    fn file_history(&self, path: &str, since: DateTime<Utc>) -> Result<Vec<CommitInfo>> {
        Ok(GitProvider::file_history(self, path, since)?)
    }

    fn symbol_history(
        &self,
        path: &str,
        start_line: u32,
        end_line: u32,
        since: DateTime<Utc>,
    ) -> Result<Vec<CommitInfo>> {
        Ok(GitProvider::symbol_history(self, path, start_line, end_line, since)?)
    }

    fn file_content(&self, path: &str) -> Result<Vec<u8>> {
        Ok(GitProvider::file_content(self, WORKING_REF, path)?)
    }
}

impl<S: CommitSource + ?Sized> CommitSource for &S {
    fn repo_history(&self, since: DateTime<Utc>, pattern: Option<&str>) -> Result<Vec<CommitInfo>> {
        (**self).repo_history(since, pattern)
    }

    fn file_history(&self, path: &str, since: DateTime<Utc>) -> Result<Vec<CommitInfo>> {
        (**self).file_history(path, since)
    }

    fn symbol_history(
        &self,
        path: &str,
        start_line: u32,
        end_line: u32,
        since: DateTime<Utc>,
    ) -> Result<Vec<CommitInfo>> {
        (**self).symbol_history(path, start_line, end_line, since)
    }

    fn file_content(&self, path: &str) -> Result<Vec<u8>> {
        (**self).file_content(path)
    }
}
