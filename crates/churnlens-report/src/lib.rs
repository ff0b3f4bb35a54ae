//! # churnlens-report
//!
//! **Tier 2 (Report Assembly)**
//!
//! Turns raw change-analysis findings into a ranked, capped, risk-scored
//! [`AnalysisReport`].
//!
//! ## What belongs here
//! * Severity rules for duplicate and naming findings
//! * Risk score and top-recommendation selection
//! * Ranking and truncation bookkeeping
//!
//! ## What does NOT belong here
//! * Finding detection (use churnlens-change)
//! * Serialization formats (findings are plain serde records)

#![forbid(unsafe_code)]

mod rank;
mod severity;

use std::time::Instant;

use chrono::Utc;
use churnlens_types::{
    AnalysisReport, AnalysisScope, ChangedFile, DuplicateFinding, FileChangeStatus,
    FindingSeverity, MetricsFinding, NamingFinding, ReportMetadata, ReportSummary, SymbolInfo,
};
use tracing::debug;

pub use rank::{Capped, cap, rank_duplicates, rank_metrics, rank_naming};
pub use severity::{duplicate_severity, naming_severity};

/// Top recommendation of a report built from an empty change set.
pub const NO_CHANGES: &str = "No changes to analyze";

/// Summed severity weights of the findings, capped at `1.0`.
///
/// Duplicates weigh 0.15/0.08/0.03 and naming issues 0.10/0.05/0.02 for
/// critical/warning/info. Metrics findings do not contribute.
///
/// ```
/// use churnlens_report::risk_score;
///
/// assert_eq!(risk_score(&[], &[]), 0.0);
/// ```
#[must_use]
pub fn risk_score(duplicates: &[DuplicateFinding], naming: &[NamingFinding]) -> f64 {
    let dup: f64 = duplicates
        .iter()
        .map(|d| match d.severity {
            FindingSeverity::Critical => 0.15,
            FindingSeverity::Warning => 0.08,
            FindingSeverity::Info => 0.03,
        })
        .sum();
    let names: f64 = naming
        .iter()
        .map(|n| match n.severity {
            FindingSeverity::Critical => 0.10,
            FindingSeverity::Warning => 0.05,
            FindingSeverity::Info => 0.02,
        })
        .sum();
    (dup + names).min(1.0)
}

/// The single most important suggestion.
///
/// Preference: first critical duplicate, first critical naming issue, first
/// duplicate, first naming issue. Empty when there are no findings.
#[must_use]
pub fn top_recommendation<'a>(
    duplicates: &'a [DuplicateFinding],
    naming: &'a [NamingFinding],
) -> &'a str {
    let critical_dup = duplicates
        .iter()
        .find(|d| d.severity == FindingSeverity::Critical)
        .map(|d| d.suggestion.as_str());
    let critical_name = || {
        naming
            .iter()
            .find(|n| n.severity == FindingSeverity::Critical)
            .map(|n| n.suggestion.as_str())
    };
    critical_dup
        .or_else(critical_name)
        .or_else(|| duplicates.first().map(|d| d.suggestion.as_str()))
        .or_else(|| naming.first().map(|n| n.suggestion.as_str()))
        .unwrap_or("")
}

/// Symbol counts for the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SymbolCounts {
    pub added: usize,
    pub modified: usize,
    pub deleted: usize,
}

impl SymbolCounts {
    /// Symbols living in added files count as added; every other analyzed
    /// symbol counts as modified.
    #[must_use]
    pub fn classify(files: &[ChangedFile], symbols: &[SymbolInfo]) -> Self {
        let added = symbols
            .iter()
            .filter(|s| {
                files
                    .iter()
                    .any(|f| f.status == FileChangeStatus::Added && f.path == s.file_path)
            })
            .count();
        Self {
            added,
            modified: symbols.len() - added,
            deleted: 0,
        }
    }
}

/// Assembles an [`AnalysisReport`] and records how long the analysis took.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    scope: AnalysisScope,
    base_ref: String,
    target_ref: String,
    started: Instant,
    files_changed: usize,
    symbols: SymbolCounts,
    max_findings: usize,
}

impl ReportBuilder {
    /// Start timing now.
    #[must_use]
    pub fn new(scope: AnalysisScope, base_ref: impl Into<String>, target_ref: impl Into<String>) -> Self {
        Self::started_at(scope, base_ref, target_ref, Instant::now())
    }

    #[must_use]
    pub fn started_at(
        scope: AnalysisScope,
        base_ref: impl Into<String>,
        target_ref: impl Into<String>,
        started: Instant,
    ) -> Self {
        Self {
            scope,
            base_ref: base_ref.into(),
            target_ref: target_ref.into(),
            started,
            files_changed: 0,
            symbols: SymbolCounts::default(),
            max_findings: 20,
        }
    }

    #[must_use]
    pub fn files_changed(mut self, n: usize) -> Self {
        self.files_changed = n;
        self
    }

    #[must_use]
    pub fn symbols(mut self, counts: SymbolCounts) -> Self {
        self.symbols = counts;
        self
    }

    /// Per-category cap; zero keeps the default of 20.
    #[must_use]
    pub fn max_findings(mut self, n: usize) -> Self {
        if n > 0 {
            self.max_findings = n;
        }
        self
    }

    /// Rank, cap and score the findings.
    #[must_use]
    pub fn build(
        self,
        duplicates: Vec<DuplicateFinding>,
        naming: Vec<NamingFinding>,
        metrics: Vec<MetricsFinding>,
    ) -> AnalysisReport {
        let duplicates = cap(rank_duplicates(duplicates), self.max_findings);
        let naming = cap(rank_naming(naming), self.max_findings);
        let metrics = cap(rank_metrics(metrics), self.max_findings);

        let risk = risk_score(&duplicates.items, &naming.items);
        let top = top_recommendation(&duplicates.items, &naming.items).to_string();
        let truncated = duplicates.was_cut() || naming.was_cut() || metrics.was_cut();

        debug!(
            duplicates = duplicates.items.len(),
            naming = naming.items.len(),
            metrics = metrics.items.len(),
            risk,
            truncated,
            "change report assembled"
        );

        let mut metadata = self.metadata();
        metadata.truncated = truncated;
        metadata.total_duplicates = duplicates.cut_total();
        metadata.total_naming_issues = naming.cut_total();
        metadata.total_metrics_issues = metrics.cut_total();

        AnalysisReport {
            summary: ReportSummary {
                files_changed: self.files_changed,
                symbols_added: self.symbols.added,
                symbols_modified: self.symbols.modified,
                symbols_deleted: self.symbols.deleted,
                duplicates_found: duplicates.items.len(),
                naming_issues_found: naming.items.len(),
                metrics_issues_found: metrics.items.len(),
                risk_score: risk,
                top_recommendation: top,
            },
            duplicates: duplicates.items,
            naming_issues: naming.items,
            metrics_issues: metrics.items,
            metadata,
        }
    }

    /// A well-formed report for a change set with no files.
    #[must_use]
    pub fn empty(self) -> AnalysisReport {
        AnalysisReport {
            summary: ReportSummary {
                top_recommendation: NO_CHANGES.to_string(),
                ..ReportSummary::default()
            },
            duplicates: Vec::new(),
            naming_issues: Vec::new(),
            metrics_issues: Vec::new(),
            metadata: self.metadata(),
        }
    }

    fn metadata(&self) -> ReportMetadata {
        ReportMetadata {
            base_ref: self.base_ref.clone(),
            target_ref: self.target_ref.clone(),
            scope: self.scope,
            analyzed_at: Utc::now(),
            analysis_time_ms: u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX),
            truncated: false,
            total_duplicates: 0,
            total_naming_issues: 0,
            total_metrics_issues: 0,
        }
    }
}
