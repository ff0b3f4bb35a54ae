//! Integration tests against throwaway repositories.
//!
//! Every test returns early when no `git` binary is available.

use std::path::Path;
use std::process::Command;

use chrono::{Duration, Utc};
use churnlens_git::{CancelToken, EMPTY_TREE_HASH, GitError, GitProvider, git_available};
use churnlens_types::{AnalysisParams, AnalysisScope, FileChangeStatus};
use tempfile::TempDir;

/// `git` in `dir`, ignoring inherited `GIT_DIR`/`GIT_WORK_TREE`.
fn git_in(dir: &Path) -> Command {
    let mut cmd = Command::new("git");
    cmd.env_remove("GIT_DIR")
        .env_remove("GIT_WORK_TREE")
        .current_dir(dir);
    cmd
}

fn git_ok(dir: &Path, args: &[&str]) {
    let out = git_in(dir).args(args).output().unwrap();
    assert!(
        out.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
}

fn commit_as(dir: &Path, name: &str, email: &str, message: &str) {
    let out = git_in(dir)
        .args(["-c", &format!("user.name={name}"), "-c", &format!("user.email={email}")])
        .args(["commit", "-q", "-m", message])
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
}

fn write(dir: &Path, rel: &str, body: &str) {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, body).unwrap();
}

/// A repository with one commit containing `src/lib.go`.
fn seeded_repo() -> Option<TempDir> {
    if !git_available() {
        return None;
    }
    let dir = tempfile::tempdir().unwrap();
    git_ok(dir.path(), &["init", "-q"]);
    git_ok(dir.path(), &["config", "user.email", "test@example.com"]);
    git_ok(dir.path(), &["config", "user.name", "Test User"]);
    write(dir.path(), "src/lib.go", "package lib\n\nfunc A() {}\n");
    git_ok(dir.path(), &["add", "."]);
    commit_as(dir.path(), "Test User", "test@example.com", "seed");
    Some(dir)
}

fn scope(scope: AnalysisScope) -> AnalysisParams {
    AnalysisParams {
        scope,
        ..AnalysisParams::default()
    }
}

// ── Construction ─────────────────────────────────────────────────

#[test]
fn given_plain_directory_when_opened_then_not_a_repository() {
    if !git_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let err = GitProvider::new(dir.path()).unwrap_err();
    assert!(matches!(err, GitError::NotARepository { .. }), "{err}");
}

#[test]
fn given_subdirectory_when_opened_then_root_is_top_level() {
    let Some(repo) = seeded_repo() else { return };
    let provider = GitProvider::new(repo.path().join("src")).unwrap();
    let expected = std::fs::canonicalize(repo.path()).unwrap();
    let actual = std::fs::canonicalize(provider.repo_root()).unwrap();
    assert_eq!(actual, expected);
    assert!(provider.is_git_repo());
}

// ── Changed files ────────────────────────────────────────────────

#[test]
fn given_staged_new_file_when_listing_staged_then_reported_as_added() {
    let Some(repo) = seeded_repo() else { return };
    write(repo.path(), "src/new.go", "package lib\n");
    git_ok(repo.path(), &["add", "src/new.go"]);

    let provider = GitProvider::new(repo.path()).unwrap();
    let files = provider.changed_files(&scope(AnalysisScope::Staged)).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "src/new.go");
    assert_eq!(files[0].status, FileChangeStatus::Added);
}

#[test]
fn given_unstaged_edit_when_listing_wip_then_included() {
    let Some(repo) = seeded_repo() else { return };
    write(repo.path(), "src/lib.go", "package lib\n\nfunc A() { return }\n");

    let provider = GitProvider::new(repo.path()).unwrap();
    assert!(provider.changed_files(&scope(AnalysisScope::Staged)).unwrap().is_empty());
    let wip = provider.changed_files(&scope(AnalysisScope::Wip)).unwrap();
    assert_eq!(wip.len(), 1);
    assert_eq!(wip[0].status, FileChangeStatus::Modified);
}

#[test]
fn given_repo_without_commits_when_listing_wip_then_falls_back_to_staged() {
    if !git_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    git_ok(dir.path(), &["init", "-q"]);
    write(dir.path(), "main.go", "package main\n");
    git_ok(dir.path(), &["add", "main.go"]);

    let provider = GitProvider::new(dir.path()).unwrap();
    let files = provider.changed_files(&scope(AnalysisScope::Wip)).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "main.go");
}

#[test]
fn given_range_scope_without_base_when_listing_then_missing_base_ref() {
    let Some(repo) = seeded_repo() else { return };
    let provider = GitProvider::new(repo.path()).unwrap();
    let err = provider.changed_files(&scope(AnalysisScope::Range)).unwrap_err();
    assert!(matches!(err, GitError::MissingBaseRef));
}

#[test]
fn given_two_commits_when_listing_range_then_only_later_changes() {
    let Some(repo) = seeded_repo() else { return };
    write(repo.path(), "src/two.go", "package lib\n");
    git_ok(repo.path(), &["add", "."]);
    commit_as(repo.path(), "Test User", "test@example.com", "two");

    let provider = GitProvider::new(repo.path()).unwrap();
    let params = AnalysisParams {
        scope: AnalysisScope::Range,
        base_ref: Some("HEAD~1".into()),
        ..AnalysisParams::default()
    };
    let files = provider.changed_files(&params).unwrap();
    assert_eq!(files.iter().map(|f| f.path.as_str()).collect::<Vec<_>>(), ["src/two.go"]);
    let stats = provider.diff_stats(&params).unwrap();
    assert_eq!(stats.files_added, 1);
    assert_eq!(stats.total_added, 1);
}

// ── Refs and content ─────────────────────────────────────────────

#[test]
fn given_root_commit_when_resolving_base_then_empty_tree() {
    let Some(repo) = seeded_repo() else { return };
    let provider = GitProvider::new(repo.path()).unwrap();
    let base = provider.base_ref(&scope(AnalysisScope::Commit)).unwrap();
    assert_eq!(base, EMPTY_TREE_HASH);
}

#[test]
fn given_three_refs_when_reading_content_then_each_version_returned() {
    let Some(repo) = seeded_repo() else { return };
    write(repo.path(), "src/lib.go", "staged\n");
    git_ok(repo.path(), &["add", "src/lib.go"]);
    write(repo.path(), "src/lib.go", "working\n");

    let provider = GitProvider::new(repo.path()).unwrap();
    assert_eq!(provider.file_content("WORKING", "src/lib.go").unwrap(), b"working\n");
    assert_eq!(provider.file_content("", "src/lib.go").unwrap(), b"working\n");
    assert_eq!(provider.file_content("STAGED", "src/lib.go").unwrap(), b"staged\n");
    assert_eq!(provider.file_content("INDEX", "src/lib.go").unwrap(), b"staged\n");
    let head = provider.file_content("HEAD", "src/lib.go").unwrap();
    assert!(String::from_utf8_lossy(&head).contains("func A()"));
}

#[test]
fn given_missing_path_at_ref_when_reading_then_command_failed() {
    let Some(repo) = seeded_repo() else { return };
    let provider = GitProvider::new(repo.path()).unwrap();
    let err = provider.file_content("HEAD", "nope.go").unwrap_err();
    assert!(matches!(err, GitError::CommandFailed { .. }), "{err}");
}

// ── History ──────────────────────────────────────────────────────

#[test]
fn given_commits_by_two_authors_when_reading_history_then_numstat_attached() {
    let Some(repo) = seeded_repo() else { return };
    write(repo.path(), "src/lib.go", "package lib\n\nfunc A() {}\nfunc B() {}\n");
    git_ok(repo.path(), &["add", "."]);
    commit_as(repo.path(), "Alice", "alice@example.com", "add B | pipes ok");

    let provider = GitProvider::new(repo.path()).unwrap();
    let since = Utc::now() - Duration::days(7);
    let commits = provider.commit_history(since, &[]).unwrap();
    assert_eq!(commits.len(), 2);

    let latest = &commits[0];
    assert_eq!(latest.author_email, "alice@example.com");
    assert_eq!(latest.message, "add B | pipes ok");
    assert_eq!(latest.file_changes.len(), 1);
    assert_eq!(latest.file_changes[0].path, "src/lib.go");
    assert_eq!(latest.file_changes[0].lines_added, 1);

    let contributors = provider.file_contributors("src/lib.go", since).unwrap();
    assert_eq!(contributors.len(), 2);
    let shares: f64 = contributors.iter().map(|c| c.ownership_share).sum();
    assert!((shares - 1.0).abs() < 1e-9);

    assert_eq!(provider.recent_commit_count("src/lib.go", Duration::days(7)).unwrap(), 2);
}

#[test]
fn given_line_range_beyond_file_when_reading_symbol_history_then_empty() {
    let Some(repo) = seeded_repo() else { return };
    let provider = GitProvider::new(repo.path()).unwrap();
    let since = Utc::now() - Duration::days(30);
    let commits = provider.symbol_history("src/lib.go", 500, 600, since).unwrap();
    assert!(commits.is_empty());

    let within = provider.symbol_history("src/lib.go", 1, 3, since).unwrap();
    assert_eq!(within.len(), 1);
}

#[test]
fn given_pattern_when_reading_repo_history_then_restricted_to_matches() {
    let Some(repo) = seeded_repo() else { return };
    write(repo.path(), "web/app.ts", "export {}\n");
    git_ok(repo.path(), &["add", "."]);
    commit_as(repo.path(), "Test User", "test@example.com", "web");

    let provider = GitProvider::new(repo.path()).unwrap();
    let since = Utc::now() - Duration::days(1);
    let go_only = provider.repo_history(since, Some("*.go")).unwrap();
    assert_eq!(go_only.len(), 1);
    let all = provider.repo_history(since, None).unwrap();
    assert_eq!(all.len(), 2);
}

#[test]
fn given_configured_identity_when_reading_author_then_name_and_email() {
    let Some(repo) = seeded_repo() else { return };
    let provider = GitProvider::new(repo.path()).unwrap();
    let (name, email) = provider.current_author().unwrap();
    assert_eq!(name, "Test User");
    assert_eq!(email, "test@example.com");
    assert_eq!(provider.list_all_files().unwrap(), vec!["src/lib.go".to_string()]);
}

// ── Cancellation ─────────────────────────────────────────────────

#[test]
fn given_cancelled_token_when_querying_then_cancelled_error() {
    let Some(repo) = seeded_repo() else { return };
    let token = CancelToken::new();
    let provider = GitProvider::new(repo.path()).unwrap().with_cancel(token.clone());
    token.cancel();
    let err = provider.commit_history(Utc::now() - Duration::days(1), &[]).unwrap_err();
    assert!(err.is_cancelled());
}
