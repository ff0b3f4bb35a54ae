//! Records produced by the VCS history source.
//!
//! These are transient: built fresh from subprocess output for one analysis
//! call and dropped once aggregated.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One non-merge commit with per-file line counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitInfo {
    pub hash: String,
    pub author_name: String,
    pub author_email: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_changes: Vec<FileChange>,
}

/// A numstat row attached to a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_path: Option<String>,
    pub lines_added: u64,
    pub lines_deleted: u64,
    pub status: ChangeStatus,
}

/// Status inferred from a numstat row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeStatus {
    #[serde(rename = "A")]
    Added,
    #[serde(rename = "M")]
    Modified,
    #[serde(rename = "D")]
    Deleted,
    #[serde(rename = "R")]
    Renamed,
}

impl ChangeStatus {
    /// Infer a status from line counts.
    ///
    /// A known old path wins over the counts.
    ///
    /// # Examples
    ///
    /// ```
    /// use churnlens_types::ChangeStatus;
    ///
    /// assert_eq!(ChangeStatus::infer(12, 0, false), ChangeStatus::Added);
    /// assert_eq!(ChangeStatus::infer(0, 4, false), ChangeStatus::Deleted);
    /// assert_eq!(ChangeStatus::infer(3, 3, false), ChangeStatus::Modified);
    /// assert_eq!(ChangeStatus::infer(12, 0, true), ChangeStatus::Renamed);
    /// ```
    #[must_use]
    pub fn infer(added: u64, deleted: u64, has_old_path: bool) -> ChangeStatus {
        if has_old_path {
            ChangeStatus::Renamed
        } else if added > 0 && deleted == 0 {
            ChangeStatus::Added
        } else if added == 0 && deleted > 0 {
            ChangeStatus::Deleted
        } else {
            ChangeStatus::Modified
        }
    }
}

/// Status letter from `--name-status` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileChangeStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
}

impl FileChangeStatus {
    /// Map the leading status letter; anything unrecognized is a modification.
    #[must_use]
    pub fn from_letter(status: &str) -> FileChangeStatus {
        match status.chars().next() {
            Some('A') => FileChangeStatus::Added,
            Some('D') => FileChangeStatus::Deleted,
            Some('R') => FileChangeStatus::Renamed,
            Some('C') => FileChangeStatus::Copied,
            _ => FileChangeStatus::Modified,
        }
    }
}

/// A file touched by the change set under analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangedFile {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_path: Option<String>,
    pub status: FileChangeStatus,
    #[serde(default)]
    pub lines_added: u64,
    #[serde(default)]
    pub lines_deleted: u64,
}

/// Totals over a `--numstat` listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiffStats {
    pub files_added: usize,
    pub files_modified: usize,
    pub files_deleted: usize,
    pub total_added: u64,
    pub total_deleted: u64,
}

impl DiffStats {
    #[must_use]
    pub fn total_lines(&self) -> u64 {
        self.total_added + self.total_deleted
    }

    #[must_use]
    pub fn size(&self) -> DiffSize {
        DiffSize::from_lines(self.total_lines())
    }
}

/// Coarse size bucket of a change set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffSize {
    Small,
    Medium,
    Large,
}

impl DiffSize {
    /// Under 10 changed lines is small, up to 50 medium, anything more large.
    #[must_use]
    pub fn from_lines(lines: u64) -> DiffSize {
        match lines {
            0..=9 => DiffSize::Small,
            10..=50 => DiffSize::Medium,
            _ => DiffSize::Large,
        }
    }
}

/// Which change set the change analyzer looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisScope {
    /// Index contents versus `HEAD`.
    Staged,
    /// Working tree (staged and unstaged) versus `HEAD`.
    #[default]
    Wip,
    /// One commit versus its parent.
    Commit,
    /// `base..target`.
    Range,
}

impl AnalysisScope {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisScope::Staged => "staged",
            AnalysisScope::Wip => "wip",
            AnalysisScope::Commit => "commit",
            AnalysisScope::Range => "range",
        }
    }
}

impl fmt::Display for AnalysisScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "staged" => Ok(AnalysisScope::Staged),
            "wip" => Ok(AnalysisScope::Wip),
            "commit" => Ok(AnalysisScope::Commit),
            "range" => Ok(AnalysisScope::Range),
            other => Err(format!("unknown scope: {other}")),
        }
    }
}
