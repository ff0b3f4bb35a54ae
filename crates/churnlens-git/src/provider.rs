//! Change-set queries against one repository.

use std::path::{Path, PathBuf};

use churnlens_types::{AnalysisParams, AnalysisScope, ChangedFile, DiffStats};
use tracing::debug;

use crate::cancel::CancelToken;
use crate::command::run_git;
use crate::error::{GitError, Result};
use crate::parse::{parse_name_status, parse_numstat_totals};

/// Object id of git's empty tree, the base of a root commit.
pub const EMPTY_TREE_HASH: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

/// Pseudo-ref for working-tree content.
pub const WORKING_REF: &str = "WORKING";
/// Pseudo-ref for index content.
pub const STAGED_REF: &str = "STAGED";
/// Alias of [`STAGED_REF`].
pub const INDEX_REF: &str = "INDEX";

/// Git access rooted at a repository's top level.
#[derive(Debug, Clone)]
pub struct GitProvider {
    repo_root: PathBuf,
    cancel: CancelToken,
}

impl GitProvider {
    /// Resolve `path` (any directory inside a work tree) to its top level.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let abs = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        let cancel = CancelToken::new();
        let out = match run_git(&abs, &["rev-parse", "--show-toplevel"], &cancel) {
            Ok(out) if out.success => out,
            Ok(_) | Err(GitError::Spawn { .. }) => {
                return Err(GitError::NotARepository { path: abs });
            }
            Err(other) => return Err(other),
        };
        let root = out.stdout_lossy().trim().to_string();
        if root.is_empty() {
            return Err(GitError::NotARepository { path: abs });
        }
        debug!(root = %root, "resolved repository root");
        Ok(Self {
            repo_root: PathBuf::from(root),
            cancel,
        })
    }

    /// Use `cancel` for every subsequent subprocess.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[must_use]
    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    #[must_use]
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// `true` when `<root>/.git` is a directory (false for worktrees).
    #[must_use]
    pub fn is_git_repo(&self) -> bool {
        self.repo_root.join(".git").is_dir()
    }

    pub(crate) fn git<S: AsRef<str>>(&self, args: &[S]) -> Result<crate::command::GitOutput> {
        run_git(&self.repo_root, args, &self.cancel)
    }

    /// Files touched by the change set the scope selects.
    pub fn changed_files(&self, params: &AnalysisParams) -> Result<Vec<ChangedFile>> {
        match params.scope {
            AnalysisScope::Staged => self.staged_files(),
            AnalysisScope::Wip => self.wip_files(),
            AnalysisScope::Commit => {
                let commit = params.base_ref.as_deref().unwrap_or("HEAD");
                let out = self
                    .git(&["diff-tree", "--no-commit-id", "--name-status", "-r", commit])?
                    .checked()?;
                Ok(parse_name_status(&out.stdout_lossy()))
            }
            AnalysisScope::Range => {
                let range = range_spec(params)?;
                let out = self
                    .git(&["diff", "--name-status", "--no-renames", range.as_str()])?
                    .checked()?;
                Ok(parse_name_status(&out.stdout_lossy()))
            }
        }
    }

    fn staged_files(&self) -> Result<Vec<ChangedFile>> {
        let out = self
            .git(&["diff", "--cached", "--name-status", "--no-renames"])?
            .checked()?;
        Ok(parse_name_status(&out.stdout_lossy()))
    }

    fn wip_files(&self) -> Result<Vec<ChangedFile>> {
        let out = self.git(&["diff", "HEAD", "--name-status", "--no-renames"])?;
        if !out.success {
            // no HEAD yet
            debug!(stderr = %out.stderr.trim(), "diff HEAD failed; falling back to staged");
            return self.staged_files();
        }
        Ok(parse_name_status(&out.stdout_lossy()))
    }

    /// Raw bytes of `path` at `reference`.
    ///
    /// `""` or [`WORKING_REF`] reads the working tree, [`STAGED_REF`] or
    /// [`INDEX_REF`] reads the index, anything else is passed to
    /// `git show <ref>:<path>`.
    pub fn file_content(&self, reference: &str, path: &str) -> Result<Vec<u8>> {
        if reference.is_empty() || reference == WORKING_REF {
            return Ok(std::fs::read(self.repo_root.join(path))?);
        }
        let spec = if reference == STAGED_REF || reference == INDEX_REF {
            format!(":{path}")
        } else {
            format!("{reference}:{path}")
        };
        let out = self.git(&["show", spec.as_str()])?.checked()?;
        Ok(out.stdout)
    }

    /// Line totals for the change set the scope selects.
    pub fn diff_stats(&self, params: &AnalysisParams) -> Result<DiffStats> {
        let args: Vec<String> = match params.scope {
            AnalysisScope::Staged => vec!["diff".into(), "--cached".into(), "--numstat".into()],
            AnalysisScope::Wip => vec!["diff".into(), "HEAD".into(), "--numstat".into()],
            AnalysisScope::Commit => vec![
                "diff-tree".into(),
                "--no-commit-id".into(),
                "--numstat".into(),
                "-r".into(),
                params.base_ref.clone().unwrap_or_else(|| "HEAD".into()),
            ],
            AnalysisScope::Range => vec!["diff".into(), "--numstat".into(), range_spec(params)?],
        };
        let out = self.git(args.as_slice())?.checked()?;
        Ok(parse_numstat_totals(&out.stdout_lossy()))
    }

    /// Ref the change set is compared against.
    ///
    /// A root commit has no parent; its base is [`EMPTY_TREE_HASH`].
    pub fn base_ref(&self, params: &AnalysisParams) -> Result<String> {
        match params.scope {
            AnalysisScope::Staged | AnalysisScope::Wip => Ok("HEAD".to_string()),
            AnalysisScope::Commit => {
                let commit = params.base_ref.as_deref().unwrap_or("HEAD");
                self.parent_commit(commit)
            }
            AnalysisScope::Range => params
                .base_ref
                .clone()
                .filter(|r| !r.is_empty())
                .ok_or(GitError::MissingBaseRef),
        }
    }

    fn parent_commit(&self, commit: &str) -> Result<String> {
        let parent = format!("{commit}^");
        let out = self.git(&["rev-parse", parent.as_str()])?;
        if !out.success {
            return Ok(EMPTY_TREE_HASH.to_string());
        }
        Ok(out.stdout_lossy().trim().to_string())
    }

    /// Ref whose content represents the change set.
    #[must_use]
    pub fn target_ref(params: &AnalysisParams) -> String {
        let non_empty = |r: &Option<String>| r.clone().filter(|s| !s.is_empty());
        match params.scope {
            AnalysisScope::Staged => STAGED_REF.to_string(),
            AnalysisScope::Wip => WORKING_REF.to_string(),
            AnalysisScope::Commit => non_empty(&params.base_ref).unwrap_or_else(|| "HEAD".into()),
            AnalysisScope::Range => non_empty(&params.target_ref).unwrap_or_else(|| "HEAD".into()),
        }
    }

    /// Every tracked file.
    pub fn list_all_files(&self) -> Result<Vec<String>> {
        let out = self.git(&["ls-files"])?.checked()?;
        Ok(non_empty_lines(&out.stdout_lossy()))
    }

    pub fn current_branch(&self) -> Result<String> {
        let out = self.git(&["rev-parse", "--abbrev-ref", "HEAD"])?.checked()?;
        Ok(out.stdout_lossy().trim().to_string())
    }

    pub fn commit_hash(&self, reference: &str) -> Result<String> {
        let out = self.git(&["rev-parse", reference])?.checked()?;
        Ok(out.stdout_lossy().trim().to_string())
    }
}

fn range_spec(params: &AnalysisParams) -> Result<String> {
    let base = params
        .base_ref
        .as_deref()
        .filter(|r| !r.is_empty())
        .ok_or(GitError::MissingBaseRef)?;
    let target = params
        .target_ref
        .as_deref()
        .filter(|r| !r.is_empty())
        .unwrap_or("HEAD");
    Ok(format!("{base}..{target}"))
}

pub(crate) fn non_empty_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
