//! Commit-history queries used by change-frequency analysis.

use chrono::{DateTime, Duration, Utc};
use churnlens_types::{CommitInfo, ContributorActivity};
use tracing::debug;

use crate::error::{GitError, Result};
use crate::parse::{
    HEADER_FORMAT, format_since, parse_commit_history, parse_shortlog, parse_symbol_history,
};
use crate::provider::{GitProvider, non_empty_lines};

impl GitProvider {
    /// Non-merge commits since `since`, optionally limited to `paths`.
    ///
    /// A failing `git log` with nothing on stderr (e.g. an empty repository)
    /// yields an empty history.
    pub fn commit_history(&self, since: DateTime<Utc>, paths: &[String]) -> Result<Vec<CommitInfo>> {
        let mut args = log_args(since);
        if !paths.is_empty() {
            args.push("--".to_string());
            args.extend(paths.iter().cloned());
        }
        let out = self.git(args.as_slice())?;
        if !out.success {
            if out.stderr.trim().is_empty() {
                return Ok(Vec::new());
            }
            return Err(GitError::CommandFailed {
                command: out.command,
                stderr: out.stderr.trim().to_string(),
            });
        }
        let commits = parse_commit_history(&out.stdout_lossy());
        debug!(commits = commits.len(), paths = paths.len(), "parsed commit history");
        Ok(commits)
    }

    /// History of a single file.
    pub fn file_history(&self, path: &str, since: DateTime<Utc>) -> Result<Vec<CommitInfo>> {
        self.commit_history(since, &[path.to_string()])
    }

    /// Commits touching lines `start..=end` of `path`, via `git log -L`.
    ///
    /// A range that does not exist in history yields an empty list. The
    /// returned commits carry no per-file line counts.
    pub fn symbol_history(
        &self,
        path: &str,
        start_line: u32,
        end_line: u32,
        since: DateTime<Utc>,
    ) -> Result<Vec<CommitInfo>> {
        let range = format!("{start_line},{end_line}:{path}");
        let args = vec![
            "log".to_string(),
            "-L".to_string(),
            range,
            HEADER_FORMAT.to_string(),
            format_since(since),
            "--no-merges".to_string(),
        ];
        let out = self.git(args.as_slice())?;
        if !out.success {
            if out.stderr.contains("has only") || out.stderr.contains("does not have") {
                return Ok(Vec::new());
            }
            return Err(GitError::CommandFailed {
                command: out.command,
                stderr: out.stderr.trim().to_string(),
            });
        }
        Ok(parse_symbol_history(&out.stdout_lossy()))
    }

    /// Per-author commit counts for `path`, via `git shortlog -sne`.
    pub fn file_contributors(
        &self,
        path: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<ContributorActivity>> {
        let args = vec![
            "shortlog".to_string(),
            "-sne".to_string(),
            format_since(since),
            "--no-merges".to_string(),
            "HEAD".to_string(),
            "--".to_string(),
            path.to_string(),
        ];
        let out = self.git(args.as_slice())?.checked()?;
        Ok(parse_shortlog(&out.stdout_lossy()))
    }

    /// Repository-wide history, optionally restricted to tracked files
    /// matching `pattern` (expanded with `git ls-files`).
    ///
    /// A pattern that matches nothing leaves the history unrestricted.
    pub fn repo_history(&self, since: DateTime<Utc>, pattern: Option<&str>) -> Result<Vec<CommitInfo>> {
        let mut args = log_args(since);
        if let Some(pattern) = pattern.filter(|p| !p.is_empty()) {
            let files = self.expand_pattern(pattern)?;
            if !files.is_empty() {
                args.push("--".to_string());
                args.extend(files);
            }
        }
        let out = self.git(args.as_slice())?.checked()?;
        Ok(parse_commit_history(&out.stdout_lossy()))
    }

    /// Tracked files matching a pathspec.
    pub fn expand_pattern(&self, pattern: &str) -> Result<Vec<String>> {
        let out = self.git(&["ls-files", pattern])?.checked()?;
        Ok(non_empty_lines(&out.stdout_lossy()))
    }

    /// `(user.name, user.email)` from git config.
    pub fn current_author(&self) -> Result<(String, String)> {
        let name = self.git(&["config", "user.name"])?.checked()?;
        let email = self.git(&["config", "user.email"])?.checked()?;
        Ok((
            name.stdout_lossy().trim().to_string(),
            email.stdout_lossy().trim().to_string(),
        ))
    }

    /// Commits reachable from `HEAD` touching `path` within `window` of now.
    pub fn recent_commit_count(&self, path: &str, window: Duration) -> Result<u64> {
        let since = Utc::now() - window;
        let args = vec![
            "rev-list".to_string(),
            "--count".to_string(),
            format_since(since),
            "HEAD".to_string(),
            "--".to_string(),
            path.to_string(),
        ];
        let out = self.git(args.as_slice())?.checked()?;
        let text = out.stdout_lossy();
        text.trim().parse().map_err(|_| GitError::InvalidOutput {
            command: out.command.clone(),
            detail: format!("invalid count: {:?}", text.trim()),
        })
    }
}

fn log_args(since: DateTime<Utc>) -> Vec<String> {
    vec![
        "log".to_string(),
        "--numstat".to_string(),
        HEADER_FORMAT.to_string(),
        format_since(since),
        "--no-merges".to_string(),
    ]
}
