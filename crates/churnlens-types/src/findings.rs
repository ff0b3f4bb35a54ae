//! Findings produced by change analysis and the report that carries them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::FindingSeverity;
use crate::change::{CodeLocation, DuplicateKind, MetricsIssueType, NamingIssueType, SymbolInfo, SymbolMetrics};
use crate::frequency::AntiPattern;
use crate::vcs::AnalysisScope;

/// New code that repeats something already in the codebase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateFinding {
    pub severity: FindingSeverity,
    pub description: String,
    pub new_code: CodeLocation,
    pub existing_code: CodeLocation,
    pub similarity: f64,
    #[serde(rename = "type")]
    pub kind: DuplicateKind,
    pub suggestion: String,
}

/// A new symbol whose name is inconsistent with the codebase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamingFinding {
    pub severity: FindingSeverity,
    pub description: String,
    pub new_symbol: SymbolInfo,
    #[serde(default)]
    pub similar_names: Vec<SymbolInfo>,
    pub issue_type: NamingIssueType,
    pub issue: String,
    pub suggestion: String,
}

/// A function crossing a metric threshold or regressing against its prior version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsFinding {
    pub severity: FindingSeverity,
    pub description: String,
    pub symbol: SymbolInfo,
    pub issue_type: MetricsIssueType,
    pub issue: String,
    pub suggestion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_metrics: Option<SymbolMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_metrics: Option<SymbolMetrics>,
}

/// Any finding, with a uniform severity/location/suggestion view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    Duplicate(DuplicateFinding),
    Naming(NamingFinding),
    Metrics(MetricsFinding),
    AntiPattern(AntiPattern),
}

impl Finding {
    #[must_use]
    pub fn severity(&self) -> FindingSeverity {
        match self {
            Finding::Duplicate(f) => f.severity,
            Finding::Naming(f) => f.severity,
            Finding::Metrics(f) => f.severity,
            Finding::AntiPattern(p) => p.severity.as_finding_severity(),
        }
    }

    #[must_use]
    pub fn suggestion(&self) -> &str {
        match self {
            Finding::Duplicate(f) => &f.suggestion,
            Finding::Naming(f) => &f.suggestion,
            Finding::Metrics(f) => &f.suggestion,
            Finding::AntiPattern(p) => &p.suggestion,
        }
    }

    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Finding::Duplicate(f) => &f.description,
            Finding::Naming(f) => &f.description,
            Finding::Metrics(f) => &f.description,
            Finding::AntiPattern(p) => &p.description,
        }
    }

    /// Where the finding points. Anti-patterns only know their file.
    #[must_use]
    pub fn location(&self) -> CodeLocation {
        match self {
            Finding::Duplicate(f) => f.new_code.clone(),
            Finding::Naming(f) => f.new_symbol.location(),
            Finding::Metrics(f) => f.symbol.location(),
            Finding::AntiPattern(p) => CodeLocation {
                file_path: p.file_path.clone(),
                ..CodeLocation::default()
            },
        }
    }
}

impl From<DuplicateFinding> for Finding {
    fn from(f: DuplicateFinding) -> Self {
        Finding::Duplicate(f)
    }
}

impl From<NamingFinding> for Finding {
    fn from(f: NamingFinding) -> Self {
        Finding::Naming(f)
    }
}

impl From<MetricsFinding> for Finding {
    fn from(f: MetricsFinding) -> Self {
        Finding::Metrics(f)
    }
}

impl From<AntiPattern> for Finding {
    fn from(p: AntiPattern) -> Self {
        Finding::AntiPattern(p)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub files_changed: usize,
    pub symbols_added: usize,
    pub symbols_modified: usize,
    pub symbols_deleted: usize,
    pub duplicates_found: usize,
    pub naming_issues_found: usize,
    pub metrics_issues_found: usize,
    /// 0.0 is safe, 1.0 is risky.
    pub risk_score: f64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub top_recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub base_ref: String,
    pub target_ref: String,
    pub scope: AnalysisScope,
    pub analyzed_at: DateTime<Utc>,
    pub analysis_time_ms: u64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
    /// Pre-truncation counts; zero when nothing was cut.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub total_duplicates: usize,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub total_naming_issues: usize,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub total_metrics_issues: usize,
}

fn is_zero(v: &usize) -> bool {
    *v == 0
}

/// Result of a change-analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub summary: ReportSummary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub duplicates: Vec<DuplicateFinding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub naming_issues: Vec<NamingFinding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metrics_issues: Vec<MetricsFinding>,
    pub metadata: ReportMetadata,
}

impl AnalysisReport {
    /// All findings as one list, duplicates first.
    #[must_use]
    pub fn findings(&self) -> Vec<Finding> {
        self.duplicates
            .iter()
            .cloned()
            .map(Finding::from)
            .chain(self.naming_issues.iter().cloned().map(Finding::from))
            .chain(self.metrics_issues.iter().cloned().map(Finding::from))
            .collect()
    }
}
