//! # churnlens-types
//!
//! **Tier 0 (Report Contract)**
//!
//! Pure data structures shared by every churnlens crate. No I/O or business
//! logic beyond parsing and trivial derived accessors.
//!
//! ## What belongs here
//! * VCS records (`CommitInfo`, `FileChange`, `ChangedFile`)
//! * Frequency, collision, ownership and anti-pattern records
//! * Change-analysis findings and reports
//! * Closed enums with their wire spellings
//!
//! ## What does NOT belong here
//! * Scoring formulas (use churnlens-frequency / churnlens-report)
//! * Subprocess handling (use churnlens-git)
//! * Configuration files (use churnlens-settings)

#![forbid(unsafe_code)]

pub mod change;
pub mod findings;
pub mod frequency;
pub mod vcs;
pub mod window;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use change::{
    AnalysisParams, CodeLocation, DuplicateKind, FOCUS_DUPLICATES, FOCUS_METRICS, FOCUS_NAMING,
    MetricsIssueType, NamingIssueType, SideEffect, SideEffects, SymbolInfo, SymbolMetrics,
};
pub use findings::{
    AnalysisReport, DuplicateFinding, Finding, MetricsFinding, NamingFinding, ReportMetadata,
    ReportSummary,
};
pub use frequency::{
    AntiPattern, AntiPatternSeverity, AntiPatternType, ChangeFrequencyMetadata,
    ChangeFrequencyParams, ChangeFrequencyReport, ChangeFrequencySummary, CollisionZone,
    ContributorActivity, EntityType, FileChangeFrequency, FrequencyMetrics, ModuleOwnership,
    SymbolChangeFrequency,
};
pub use vcs::{
    AnalysisScope, ChangeStatus, ChangedFile, CommitInfo, DiffSize, DiffStats, FileChange,
    FileChangeStatus,
};
pub use window::{FrequencyFocus, Granularity, TimeWindow};

/// Version of the JSON report contract.
pub const SCHEMA_VERSION: u32 = 1;

/// Shared severity scale for duplicates, naming, metrics and collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingSeverity {
    Critical,
    Warning,
    #[default]
    Info,
}

impl FindingSeverity {
    /// Ordering weight: critical 3, warning 2, info 1.
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            FindingSeverity::Critical => 3,
            FindingSeverity::Warning => 2,
            FindingSeverity::Info => 1,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FindingSeverity::Critical => "critical",
            FindingSeverity::Warning => "warning",
            FindingSeverity::Info => "info",
        }
    }
}

impl fmt::Display for FindingSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
