//! Parsers for git porcelain output.
//!
//! All parsers are lenient: lines that do not fit the expected shape are
//! skipped and parsing continues.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use churnlens_types::{
    ChangeStatus, ChangedFile, CommitInfo, ContributorActivity, DiffStats, FileChange,
    FileChangeStatus,
};
use regex::Regex;

/// Separator used in the `--format` header.
pub const HEADER_FORMAT: &str = "--format=%H|%an|%ae|%at|%s";

/// Minimum length of the hash field for a line to count as a header.
const MIN_HASH_LEN: usize = 40;

static BRACE_RENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*)\{(.*) => (.*)\}(.*)$").expect("static rename regex is valid")
});

/// Format a timestamp for `--since`.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use churnlens_git::parse::format_since;
///
/// let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 0).unwrap();
/// assert_eq!(format_since(at), "--since=2024-03-09 07:05:00 +0000");
/// ```
#[must_use]
pub fn format_since(since: DateTime<Utc>) -> String {
    format!("--since={}", since.format("%Y-%m-%d %H:%M:%S +0000"))
}

/// Parse `--name-status` rows (`<letter>\t<path>[\t<path>]`).
///
/// Rename and copy rows carry the old path first.
#[must_use]
pub fn parse_name_status(output: &str) -> Vec<ChangedFile> {
    output
        .lines()
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let parts = split_fields(line, 3);
            if parts.len() < 2 {
                return None;
            }
            let status = parts[0];
            let renamed = status.starts_with('R') || status.starts_with('C');
            let (path, old_path) = if parts.len() >= 3 && renamed {
                (parts[2].to_string(), Some(parts[1].to_string()))
            } else {
                (parts[1].to_string(), None)
            };
            Some(ChangedFile {
                path,
                old_path,
                status: FileChangeStatus::from_letter(status),
                lines_added: 0,
                lines_deleted: 0,
            })
        })
        .collect()
}

/// Totals over `--numstat` rows. Binary rows (`-\t-\t`) count as zero lines.
#[must_use]
pub fn parse_numstat_totals(output: &str) -> DiffStats {
    let mut stats = DiffStats::default();
    for line in output.lines() {
        let Some((added, deleted, _)) = parse_numstat_line(line) else {
            continue;
        };
        stats.total_added += added;
        stats.total_deleted += deleted;
        match ChangeStatus::infer(added, deleted, false) {
            ChangeStatus::Added => stats.files_added += 1,
            ChangeStatus::Deleted => stats.files_deleted += 1,
            _ => stats.files_modified += 1,
        }
    }
    stats
}

/// Parse `log --numstat --format=%H|%an|%ae|%at|%s` output.
#[must_use]
pub fn parse_commit_history(output: &str) -> Vec<CommitInfo> {
    let mut commits = Vec::new();
    let mut current: Option<CommitInfo> = None;

    for line in output.lines() {
        if let Some(header) = parse_header(line) {
            if let Some(done) = current.replace(header) {
                commits.push(done);
            }
            continue;
        }
        let Some(commit) = current.as_mut() else {
            continue;
        };
        if let Some((added, deleted, raw_path)) = parse_numstat_line(line) {
            let (path, old_path) = parse_rename_path(raw_path);
            let status = ChangeStatus::infer(added, deleted, old_path.is_some());
            commit.file_changes.push(FileChange {
                path,
                old_path,
                lines_added: added,
                lines_deleted: deleted,
                status,
            });
        }
    }

    commits.extend(current);
    commits
}

/// Parse `log -L` output: only the headers matter, the patch text between
/// them is skipped.
#[must_use]
pub fn parse_symbol_history(output: &str) -> Vec<CommitInfo> {
    output.lines().filter_map(parse_header).collect()
}

/// Parse `shortlog -sne` output, sorted by change count descending, with
/// ownership shares over the listed total.
#[must_use]
pub fn parse_shortlog(output: &str) -> Vec<ContributorActivity> {
    let mut contributors: Vec<ContributorActivity> = output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let (count, name_email) = line.split_once('\t')?;
            let count: u64 = count.trim().parse().ok()?;
            let (name, email) = parse_name_email(name_email);
            Some(ContributorActivity {
                author_name: name,
                author_email: email,
                change_count: count,
                lines_added: 0,
                lines_deleted: 0,
                ownership_share: 0.0,
                last_change_at: DateTime::<Utc>::UNIX_EPOCH,
            })
        })
        .collect();

    let total: u64 = contributors.iter().map(|c| c.change_count).sum();
    if total > 0 {
        for c in &mut contributors {
            c.ownership_share = c.change_count as f64 / total as f64;
        }
    }
    contributors.sort_by(|a, b| b.change_count.cmp(&a.change_count));
    contributors
}

/// Split `Name <email>` at the last ` <`.
///
/// # Examples
///
/// ```
/// use churnlens_git::parse::parse_name_email;
///
/// assert_eq!(
///     parse_name_email("Ada Lovelace <ada@example.com>"),
///     ("Ada Lovelace".to_string(), "ada@example.com".to_string())
/// );
/// assert_eq!(parse_name_email("bot"), ("bot".to_string(), String::new()));
/// ```
#[must_use]
pub fn parse_name_email(s: &str) -> (String, String) {
    let s = s.trim();
    match s.rfind(" <") {
        Some(idx) => (
            s[..idx].to_string(),
            s[idx + 2..].trim_matches(['<', '>']).to_string(),
        ),
        None => (s.to_string(), String::new()),
    }
}

/// Decompose git's rename notation into `(new_path, old_path)`.
///
/// Handles `old => new` and `prefix{old => new}suffix`; an empty side of a
/// brace rename collapses the doubled separator.
///
/// # Examples
///
/// ```
/// use churnlens_git::parse::parse_rename_path;
///
/// assert_eq!(
///     parse_rename_path("src/{old => new}/lib.rs"),
///     ("src/new/lib.rs".to_string(), Some("src/old/lib.rs".to_string()))
/// );
/// assert_eq!(
///     parse_rename_path("a.txt => b.txt"),
///     ("b.txt".to_string(), Some("a.txt".to_string()))
/// );
/// assert_eq!(parse_rename_path("plain.rs"), ("plain.rs".to_string(), None));
/// ```
#[must_use]
pub fn parse_rename_path(path: &str) -> (String, Option<String>) {
    if !path.contains(" => ") {
        return (path.to_string(), None);
    }
    if path.contains('{') {
        if let Some(caps) = BRACE_RENAME.captures(path) {
            let prefix = &caps[1];
            let suffix = &caps[4];
            let new_path = collapse_separators(&format!("{prefix}{}{suffix}", &caps[3]));
            let old_path = collapse_separators(&format!("{prefix}{}{suffix}", &caps[2]));
            return (new_path, Some(old_path));
        }
    }
    let mut parts = path.split(" => ");
    match (parts.next(), parts.next(), parts.next()) {
        (Some(old), Some(new), None) => (new.trim().to_string(), Some(old.trim().to_string())),
        _ => (path.to_string(), None),
    }
}

fn collapse_separators(path: &str) -> String {
    path.replace("//", "/")
}

fn parse_header(line: &str) -> Option<CommitInfo> {
    let parts: Vec<&str> = line.splitn(5, '|').collect();
    if parts.len() < 4 || parts[0].len() < MIN_HASH_LEN {
        return None;
    }
    let hash = parts[0];
    if !hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let epoch: i64 = parts[3].trim().parse().unwrap_or(0);
    let timestamp = DateTime::<Utc>::from_timestamp(epoch, 0).unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    Some(CommitInfo {
        hash: hash.to_string(),
        author_name: parts[1].to_string(),
        author_email: parts[2].to_string(),
        timestamp,
        message: parts.get(4).map(|s| (*s).to_string()).unwrap_or_default(),
        file_changes: Vec::new(),
    })
}

/// `(added, deleted, path)` from one numstat row.
fn parse_numstat_line(line: &str) -> Option<(u64, u64, &str)> {
    if line.is_empty() {
        return None;
    }
    let parts = split_fields(line, 3);
    if parts.len() < 3 {
        return None;
    }
    let added = parse_count(parts[0])?;
    let deleted = parse_count(parts[1])?;
    let path = parts[2].trim();
    if path.is_empty() {
        return None;
    }
    Some((added, deleted, path))
}

fn parse_count(field: &str) -> Option<u64> {
    let field = field.trim();
    if field == "-" {
        return Some(0);
    }
    field.parse().ok()
}

/// Tab-separated fields, falling back to whitespace for hand-written input.
fn split_fields(line: &str, max: usize) -> Vec<&str> {
    if line.contains('\t') {
        line.splitn(max, '\t').collect()
    } else {
        line.splitn(max, char::is_whitespace)
            .filter(|s| !s.is_empty())
            .collect()
    }
}
