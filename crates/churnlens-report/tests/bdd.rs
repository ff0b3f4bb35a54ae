//! BDD-style scenario tests for report assembly.

use churnlens_report::{NO_CHANGES, ReportBuilder, SymbolCounts, duplicate_severity, risk_score};
use churnlens_types::{
    AnalysisScope, CodeLocation, DuplicateFinding, DuplicateKind, FindingSeverity, MetricsFinding,
    MetricsIssueType, NamingFinding, NamingIssueType, SymbolInfo,
};

fn dup(similarity: f64, lines: u32, suggestion: &str) -> DuplicateFinding {
    DuplicateFinding {
        severity: duplicate_severity(similarity, lines),
        description: format!("duplicate at {similarity}"),
        new_code: CodeLocation {
            file_path: "new.go".into(),
            start_line: 1,
            end_line: lines,
            symbol_name: Some("handler".into()),
            snippet: None,
        },
        existing_code: CodeLocation::default(),
        similarity,
        kind: if similarity >= 1.0 { DuplicateKind::Exact } else { DuplicateKind::Structural },
        suggestion: suggestion.into(),
    }
}

fn naming(severity: FindingSeverity, suggestion: &str) -> NamingFinding {
    NamingFinding {
        severity,
        description: "Similar name exists".into(),
        new_symbol: SymbolInfo::default(),
        similar_names: Vec::new(),
        issue_type: NamingIssueType::SimilarExists,
        issue: String::new(),
        suggestion: suggestion.into(),
    }
}

fn metric(severity: FindingSeverity) -> MetricsFinding {
    MetricsFinding {
        severity,
        description: "High complexity".into(),
        symbol: SymbolInfo::default(),
        issue_type: MetricsIssueType::HighComplexity,
        issue: String::new(),
        suggestion: "split it".into(),
        old_metrics: None,
        new_metrics: None,
    }
}

fn builder() -> ReportBuilder {
    ReportBuilder::new(AnalysisScope::Commit, "abc123", "HEAD")
}

// ── Risk score ───────────────────────────────────────────────────

mod risk {
    use super::*;

    #[test]
    fn given_one_critical_duplicate_when_built_then_risk_is_about_fifteen_percent() {
        let report = builder().build(vec![dup(1.0, 25, "extract helper")], Vec::new(), Vec::new());
        assert_eq!(report.duplicates[0].severity, FindingSeverity::Critical);
        assert!((0.14..=0.16).contains(&report.summary.risk_score));
    }

    #[test]
    fn given_a_lesser_finding_added_when_built_then_critical_suggestion_stays_on_top() {
        let report = builder().build(
            vec![dup(0.82, 5, "minor overlap"), dup(1.0, 25, "extract helper")],
            vec![naming(FindingSeverity::Warning, "rename")],
            Vec::new(),
        );
        assert_eq!(report.summary.top_recommendation, "extract helper");
    }

    #[test]
    fn given_only_metrics_findings_when_built_then_risk_is_zero() {
        let report = builder().build(Vec::new(), Vec::new(), vec![metric(FindingSeverity::Warning)]);
        assert_eq!(report.summary.risk_score, 0.0);
        assert_eq!(report.summary.metrics_issues_found, 1);
        assert!(report.summary.top_recommendation.is_empty());
    }

    #[test]
    fn given_many_findings_when_scored_then_capped_at_one() {
        let dups: Vec<_> = (0..20).map(|_| dup(0.91, 5, "x")).collect();
        assert_eq!(risk_score(&dups, &[]), 1.0);
    }
}

// ── Ranking and truncation ───────────────────────────────────────

mod truncation {
    use super::*;

    #[test]
    fn given_more_duplicates_than_cap_when_built_then_most_similar_are_kept_and_total_recorded() {
        let dups = vec![dup(0.81, 1, "a"), dup(0.99, 1, "b"), dup(0.85, 1, "c")];
        let report = builder().max_findings(2).build(dups, Vec::new(), Vec::new());
        let kept: Vec<f64> = report.duplicates.iter().map(|d| d.similarity).collect();
        assert_eq!(kept, vec![0.99, 0.85]);
        assert_eq!(report.summary.duplicates_found, 2);
        assert!(report.metadata.truncated);
        assert_eq!(report.metadata.total_duplicates, 3);
        assert_eq!(report.metadata.total_naming_issues, 0);
    }

    #[test]
    fn given_naming_issues_when_built_then_warnings_precede_info() {
        let names = vec![naming(FindingSeverity::Info, "i"), naming(FindingSeverity::Warning, "w")];
        let report = builder().build(Vec::new(), names, Vec::new());
        assert_eq!(report.naming_issues[0].suggestion, "w");
        assert!(!report.metadata.truncated);
    }

    #[test]
    fn given_zero_cap_when_built_then_default_of_twenty_applies() {
        let dups: Vec<_> = (0..25).map(|_| dup(0.9, 1, "x")).collect();
        let report = builder().max_findings(0).build(dups, Vec::new(), Vec::new());
        assert_eq!(report.duplicates.len(), 20);
        assert_eq!(report.metadata.total_duplicates, 25);
    }

    #[test]
    fn given_untruncated_report_when_serialized_then_totals_are_omitted() {
        let report = builder().build(vec![dup(0.9, 1, "x")], Vec::new(), Vec::new());
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["metadata"].get("truncated").is_none());
        assert!(json["metadata"].get("total_duplicates").is_none());
        assert_eq!(json["metadata"]["scope"], "commit");
    }
}

// ── Empty change set ─────────────────────────────────────────────

mod empty {
    use super::*;

    #[test]
    fn given_no_changes_when_reported_then_recommendation_explains() {
        let report = builder().symbols(SymbolCounts::default()).empty();
        assert_eq!(report.summary.top_recommendation, NO_CHANGES);
        assert_eq!(report.summary.files_changed, 0);
        assert!(report.duplicates.is_empty());
        assert_eq!(report.metadata.base_ref, "abc123");
    }
}
