//! BDD-style scenarios for the engine and its JSON entry point.
//!
//! Scenarios that need a repository return early when no `git` binary is
//! available.

use std::collections::HashMap;
use std::path::Path;
use std::process::Command;

use anyhow::{Result, bail};
use churnlens_change::{ParsedFile, ParsedSymbol, SourceParser, SymbolIndex};
use churnlens_core::{Engine, ErrorCode, run_json};
use churnlens_git::{CancelToken, git_available};
use churnlens_types::{AnalysisParams, DuplicateKind, SymbolInfo};
use serde_json::Value;
use tempfile::TempDir;

fn git_ok(dir: &Path, args: &[&str]) {
    let out = Command::new("git")
        .env_remove("GIT_DIR")
        .env_remove("GIT_WORK_TREE")
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap();
    assert!(
        out.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );
}

fn commit_as(dir: &Path, name: &str, message: &str) {
    let email = format!("{}@example.com", name.to_lowercase());
    git_ok(
        dir,
        &[
            "-c",
            &format!("user.name={name}"),
            "-c",
            &format!("user.email={email}"),
            "commit",
            "-q",
            "-m",
            message,
        ],
    );
}

fn write(dir: &Path, rel: &str, body: &str) {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, body).unwrap();
}

const SUM: &str = "func sum(xs []int) int {\n\ttotal := 0\n\tfor _, x := range xs {\n\t\ttotal += x\n\t}\n\treturn total\n}\n";

/// `src/app.go` edited three times by Ann and Bob; `math.go` holds `sum`.
fn busy_repo() -> Option<TempDir> {
    if !git_available() {
        return None;
    }
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    git_ok(root, &["init", "-q"]);
    git_ok(root, &["config", "user.email", "test@example.com"]);
    git_ok(root, &["config", "user.name", "Test User"]);
    write(root, "math.go", &format!("package app\n\n{SUM}"));
    for (i, author) in ["Ann", "Bob", "Ann"].iter().enumerate() {
        write(root, "src/app.go", &format!("package app\n\nvar step = {i}\n"));
        git_ok(root, &["add", "."]);
        commit_as(root, author, &format!("step {i}"));
    }
    Some(dir)
}

fn data(envelope: &str) -> Value {
    let v: Value = serde_json::from_str(envelope).unwrap();
    assert_eq!(v["ok"], true, "unexpected error envelope: {envelope}");
    v["data"].clone()
}

fn error_code(envelope: &str) -> String {
    let v: Value = serde_json::from_str(envelope).unwrap();
    assert_eq!(v["ok"], false, "unexpected success envelope: {envelope}");
    v["error"]["code"].as_str().unwrap().to_string()
}

struct StaticIndex(HashMap<String, Vec<SymbolInfo>>);

impl SymbolIndex for StaticIndex {
    fn files(&self) -> Vec<String> {
        let mut files: Vec<String> = self.0.keys().cloned().collect();
        files.sort();
        files
    }

    fn symbols(&self, file_path: &str) -> Vec<SymbolInfo> {
        self.0.get(file_path).cloned().unwrap_or_default()
    }
}

struct StaticParser(HashMap<String, ParsedFile>);

impl SourceParser for StaticParser {
    fn parse(&self, file_path: &str, _content: &[u8]) -> Result<ParsedFile> {
        match self.0.get(file_path) {
            Some(parsed) => Ok(parsed.clone()),
            None => bail!("unsupported: {file_path}"),
        }
    }
}

// ── Opening ──────────────────────────────────────────────────────

mod opening {
    use super::*;

    #[test]
    fn given_plain_directory_when_opened_then_not_a_repository() {
        if !git_available() {
            return;
        }
        let dir = TempDir::new().unwrap();
        let err = Engine::open(dir.path()).err().unwrap();
        assert_eq!(err.code, ErrorCode::NotARepository);
    }

    #[test]
    fn given_config_file_when_opened_then_defaults_are_seeded() {
        let Some(repo) = busy_repo() else { return };
        write(repo.path(), "churnlens.toml", "[frequency]\ntop_n = 1\n[change]\nmax_findings = 4\n");
        let engine = Engine::open(repo.path()).unwrap();
        assert_eq!(engine.frequency_defaults().top_n, 1);
        assert_eq!(engine.analysis_defaults().max_findings, 4);
    }

    #[test]
    fn given_invalid_config_when_opened_then_invalid_settings() {
        let Some(repo) = busy_repo() else { return };
        write(repo.path(), ".churnlens.toml", "[cache]\nttl_secs = 0\n");
        let err = Engine::open(repo.path()).err().unwrap();
        assert_eq!(err.code, ErrorCode::InvalidSettings);
        assert!(err.message.contains("cache.ttl_secs"));
    }
}

// ── JSON envelope ────────────────────────────────────────────────

mod envelope {
    use super::*;

    #[test]
    fn given_version_mode_when_run_then_package_version() {
        let Some(repo) = busy_repo() else { return };
        let engine = Engine::open(repo.path()).unwrap();
        let out = data(&run_json(&engine, "version", "{}"));
        assert_eq!(out["version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn given_bad_input_when_run_then_error_codes_say_why() {
        let Some(repo) = busy_repo() else { return };
        let engine = Engine::open(repo.path()).unwrap();
        assert_eq!(error_code(&run_json(&engine, "frobnicate", "{}")), "unknown_mode");
        assert_eq!(error_code(&run_json(&engine, "frequency", "{not json")), "invalid_json");
        assert_eq!(error_code(&run_json(&engine, "frequency", "[1, 2]")), "invalid_json");
        assert_eq!(error_code(&run_json(&engine, "frequency", r#"{"top_n": "ten"}"#)), "invalid_settings");
        assert_eq!(error_code(&run_json(&engine, "file", "{}")), "invalid_settings");
    }

    #[test]
    fn given_cancelled_token_when_frequency_requested_then_cancelled() {
        let Some(repo) = busy_repo() else { return };
        let token = CancelToken::new();
        token.cancel();
        let engine = Engine::open(repo.path()).unwrap().with_cancel(token);
        assert_eq!(error_code(&run_json(&engine, "frequency", "")), "cancelled");
    }
}

// ── Frequency ────────────────────────────────────────────────────

mod frequency {
    use super::*;

    #[test]
    fn given_busy_file_when_frequency_requested_then_hotspot_and_collision() {
        let Some(repo) = busy_repo() else { return };
        let engine = Engine::open(repo.path()).unwrap();
        let out = data(&run_json(&engine, "frequency", r#"{"min_changes": 2, "time_window": "week"}"#));
        let hotspots = out["hotspots"].as_array().unwrap();
        assert_eq!(hotspots.len(), 1);
        assert_eq!(hotspots[0]["file_path"], "src/app.go");
        assert_eq!(out["collisions"][0]["path"], "src/app.go");
        assert_eq!(out["metadata"]["from_cache"], false);
    }

    #[test]
    fn given_repeated_request_when_frequency_requested_then_served_from_cache() {
        let Some(repo) = busy_repo() else { return };
        let engine = Engine::open(repo.path()).unwrap();
        data(&run_json(&engine, "frequency", "{}"));
        let again = data(&run_json(&engine, "frequency", "{}"));
        assert_eq!(again["metadata"]["from_cache"], true);
        assert!(engine.cache_stats().hits >= 1);

        data(&run_json(&engine, "invalidate", "{}"));
        let fresh = data(&run_json(&engine, "frequency", "{}"));
        assert_eq!(fresh["metadata"]["from_cache"], false);
    }

    #[test]
    fn given_two_authors_when_collision_risk_requested_then_zone() {
        let Some(repo) = busy_repo() else { return };
        let engine = Engine::open(repo.path()).unwrap();
        let zone = engine.collision_risk("src/app.go").unwrap().unwrap();
        assert_eq!(zone.contributors.len(), 2);
        let single = data(&run_json(&engine, "collision_risk", r#"{"file_path": "math.go"}"#));
        assert!(single.is_null());
    }

    #[test]
    fn given_file_mode_when_run_then_single_file_frequency() {
        let Some(repo) = busy_repo() else { return };
        let engine = Engine::open(repo.path()).unwrap();
        let out = data(&run_json(&engine, "file", r#"{"file_path": "src/app.go", "time_window": "7d"}"#));
        assert_eq!(out["file_path"], "src/app.go");
        assert_eq!(out["contributors"].as_array().unwrap().len(), 2);
    }
}

// ── Change analysis ──────────────────────────────────────────────

mod change {
    use super::*;

    fn staged_copy(repo: &Path) {
        write(repo, "calc.go", &format!("// total adds numbers\n{SUM}"));
        git_ok(repo, &["add", "calc.go"]);
    }

    fn ready_engine(repo: &Path) -> Engine {
        let mut index = HashMap::new();
        index.insert(
            "math.go".to_string(),
            vec![SymbolInfo {
                name: "sum".into(),
                symbol_type: "function".into(),
                line: 3,
                end_line: 9,
                content: SUM.trim_end().into(),
                ..SymbolInfo::default()
            }],
        );
        let mut parsed = HashMap::new();
        parsed.insert(
            "calc.go".to_string(),
            ParsedFile {
                symbols: vec![ParsedSymbol {
                    name: "total".into(),
                    symbol_type: "function".into(),
                    line: 1,
                    end_line: 8,
                }],
                ..ParsedFile::default()
            },
        );
        Engine::open(repo)
            .unwrap()
            .with_symbol_index(StaticIndex(index))
            .with_parser(StaticParser(parsed))
    }

    #[test]
    fn given_no_symbol_index_when_analyze_requested_then_not_ready() {
        let Some(repo) = busy_repo() else { return };
        let engine = Engine::open(repo.path()).unwrap();
        assert!(!engine.is_ready());
        assert_eq!(error_code(&run_json(&engine, "analyze", "{}")), "not_ready");
        let err = engine.analyze_changes(&AnalysisParams::default()).unwrap_err();
        assert!(err.is_not_ready());
    }

    #[test]
    fn given_staged_copy_of_existing_function_when_analyzed_then_exact_duplicate() {
        let Some(repo) = busy_repo() else { return };
        staged_copy(repo.path());
        let engine = ready_engine(repo.path());
        let report = engine.analyze_changes(&engine.analysis_defaults()).unwrap();
        assert_eq!(report.summary.files_changed, 1);
        assert_eq!(report.summary.symbols_added, 1);
        assert_eq!(report.duplicates.len(), 1);
        assert_eq!(report.duplicates[0].kind, DuplicateKind::Exact);
        assert_eq!(report.metadata.base_ref, "HEAD");
        assert_eq!(report.metadata.target_ref, "STAGED");
    }

    #[test]
    fn given_clean_index_when_analyzed_over_json_then_nothing_to_analyze() {
        let Some(repo) = busy_repo() else { return };
        let engine = ready_engine(repo.path());
        let out = data(&run_json(&engine, "analyze", r#"{"scope": "staged"}"#));
        assert_eq!(out["summary"]["top_recommendation"], "No changes to analyze");
    }

    #[test]
    fn given_range_without_base_when_analyzed_then_invalid_settings() {
        let Some(repo) = busy_repo() else { return };
        let engine = ready_engine(repo.path());
        assert_eq!(error_code(&run_json(&engine, "analyze", r#"{"scope": "range"}"#)), "invalid_settings");
    }

    #[test]
    fn given_staged_file_when_diff_stats_requested_then_added_counted() {
        let Some(repo) = busy_repo() else { return };
        staged_copy(repo.path());
        let engine = ready_engine(repo.path());
        let out = data(&run_json(&engine, "diff_stats", r#"{"scope": "staged"}"#));
        assert_eq!(out["files_added"], 1);
    }
}
