//! Change-frequency records: per-entity metrics, contributors, collisions,
//! module ownership and structural anti-patterns.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::FindingSeverity;
use crate::window::{FrequencyFocus, Granularity, TimeWindow};

/// Churn measured for one entity over one window.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FrequencyMetrics {
    pub change_count: u64,
    pub lines_added: u64,
    pub lines_deleted: u64,
    pub unique_authors: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_change_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_change_at: Option<DateTime<Utc>>,
    /// Changes per day.
    pub change_rate: f64,
    /// Blended churn score in `[0, 1]`.
    pub volatility_score: f64,
}

impl FrequencyMetrics {
    #[must_use]
    pub fn lines_changed(&self) -> u64 {
        self.lines_added + self.lines_deleted
    }

    /// Fold one commit timestamp into the first/last bounds.
    pub fn observe(&mut self, at: DateTime<Utc>) {
        self.first_change_at = Some(self.first_change_at.map_or(at, |first| first.min(at)));
        self.last_change_at = Some(self.last_change_at.map_or(at, |last| last.max(at)));
    }
}

/// One author's share of the changes to an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributorActivity {
    pub author_name: String,
    pub author_email: String,
    pub change_count: u64,
    #[serde(default)]
    pub lines_added: u64,
    #[serde(default)]
    pub lines_deleted: u64,
    /// `change_count / total changes of the entity`.
    #[serde(default)]
    pub ownership_share: f64,
    pub last_change_at: DateTime<Utc>,
}

/// Per-file churn across one or more windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileChangeFrequency {
    pub file_path: String,
    pub metrics: BTreeMap<TimeWindow, FrequencyMetrics>,
    pub contributors: Vec<ContributorActivity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub anti_patterns: Vec<AntiPattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_count: Option<usize>,
}

impl FileChangeFrequency {
    /// An entity with a single, zeroed window.
    #[must_use]
    pub fn empty(file_path: impl Into<String>, window: TimeWindow) -> Self {
        let mut metrics = BTreeMap::new();
        metrics.insert(window, FrequencyMetrics::default());
        Self {
            file_path: file_path.into(),
            metrics,
            contributors: Vec::new(),
            anti_patterns: Vec::new(),
            line_count: None,
        }
    }

    #[must_use]
    pub fn window(&self, window: TimeWindow) -> Option<&FrequencyMetrics> {
        self.metrics.get(&window)
    }

    /// Metrics of the shortest window present.
    #[must_use]
    pub fn primary_metrics(&self) -> Option<&FrequencyMetrics> {
        self.metrics.values().next()
    }

    #[must_use]
    pub fn volatility(&self) -> f64 {
        self.primary_metrics().map_or(0.0, |m| m.volatility_score)
    }
}

/// Churn for a single symbol's line span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolChangeFrequency {
    pub symbol_name: String,
    #[serde(default)]
    pub symbol_type: String,
    pub file_path: String,
    pub start_line: u32,
    pub end_line: u32,
    pub metrics: BTreeMap<TimeWindow, FrequencyMetrics>,
    pub contributors: Vec<ContributorActivity>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    #[default]
    File,
    Symbol,
}

/// An entity recently edited by several people.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionZone {
    pub entity_type: EntityType,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_name: Option<String>,
    pub contributors: Vec<ContributorActivity>,
    pub collision_score: f64,
    pub severity: FindingSeverity,
    pub recommendation: String,
    pub recent_changes: u64,
}

/// Who owns a module (first two directory segments).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleOwnership {
    pub module_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_owner: Option<ContributorActivity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secondary_owners: Vec<ContributorActivity>,
    pub total_changes: u64,
    pub file_count: usize,
}

/// The six conflict-prone shapes the pattern detector knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AntiPatternType {
    RegistrationFunction,
    EnumAggregation,
    GodObject,
    BarrelFile,
    SwitchFactory,
    ConfigAggregation,
}

impl AntiPatternType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AntiPatternType::RegistrationFunction => "registration_function",
            AntiPatternType::EnumAggregation => "enum_aggregation",
            AntiPatternType::GodObject => "god_object",
            AntiPatternType::BarrelFile => "barrel_file",
            AntiPatternType::SwitchFactory => "switch_factory",
            AntiPatternType::ConfigAggregation => "config_aggregation",
        }
    }
}

impl fmt::Display for AntiPatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AntiPatternSeverity {
    High,
    Medium,
    Low,
}

impl AntiPatternSeverity {
    /// Project onto the shared finding scale.
    #[must_use]
    pub fn as_finding_severity(self) -> FindingSeverity {
        match self {
            AntiPatternSeverity::High => FindingSeverity::Critical,
            AntiPatternSeverity::Medium => FindingSeverity::Warning,
            AntiPatternSeverity::Low => FindingSeverity::Info,
        }
    }
}

/// A heuristic structural finding in one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AntiPattern {
    #[serde(rename = "type")]
    pub pattern_type: AntiPatternType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file_path: String,
    pub description: String,
    pub location: String,
    pub severity: AntiPatternSeverity,
    pub suggestion: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metrics: BTreeMap<String, u64>,
}

/// Request for a frequency report.
///
/// String-typed selectors are resolved leniently by the analyzer so that
/// requests carrying unknown spellings still produce a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeFrequencyParams {
    pub time_window: String,
    pub granularity: String,
    pub focus: Vec<String>,
    /// Restrict history to files matched by `git ls-files <pattern>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_pattern: Option<String>,
    /// Restrict history to a single file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol_start_line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol_end_line: Option<u32>,
    pub min_changes: u64,
    pub min_contributors: usize,
    pub top_n: usize,
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub skip_default_exclusions: bool,
}

impl Default for ChangeFrequencyParams {
    fn default() -> Self {
        Self {
            time_window: TimeWindow::Days30.as_str().to_string(),
            granularity: Granularity::File.as_str().to_string(),
            focus: vec![FrequencyFocus::All.as_str().to_string()],
            file_pattern: None,
            file_path: None,
            symbol_name: None,
            symbol_start_line: None,
            symbol_end_line: None,
            min_changes: 2,
            min_contributors: 2,
            top_n: 50,
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            skip_default_exclusions: false,
        }
    }
}

impl ChangeFrequencyParams {
    /// Empty focus or an explicit `all` enables every section.
    #[must_use]
    pub fn has_focus(&self, focus: FrequencyFocus) -> bool {
        self.focus.is_empty()
            || self
                .focus
                .iter()
                .any(|f| f == focus.as_str() || f == FrequencyFocus::All.as_str())
    }

    #[must_use]
    pub fn window(&self) -> TimeWindow {
        if self.time_window.is_empty() {
            TimeWindow::Days30
        } else {
            TimeWindow::parse(&self.time_window)
        }
    }

    #[must_use]
    pub fn granularity(&self) -> Granularity {
        Granularity::parse(&self.granularity)
    }

    /// Replace zero-valued limits with their defaults.
    pub fn apply_defaults(&mut self) {
        let defaults = Self::default();
        if self.top_n == 0 {
            self.top_n = defaults.top_n;
        }
        if self.min_changes == 0 {
            self.min_changes = defaults.min_changes;
        }
        if self.min_contributors == 0 {
            self.min_contributors = defaults.min_contributors;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChangeFrequencySummary {
    pub total_files_analyzed: usize,
    pub total_commits_analyzed: usize,
    pub hotspots_found: usize,
    pub collision_zones: usize,
    pub anti_patterns_found: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highest_churn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub most_active_contributor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeFrequencyMetadata {
    pub analyzed_at: DateTime<Utc>,
    pub time_window: TimeWindow,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_range: Option<String>,
    pub compute_time_ms: u64,
    pub from_cache: bool,
}

/// Result of a frequency analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeFrequencyReport {
    pub summary: ChangeFrequencySummary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hotspots: Vec<FileChangeFrequency>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collisions: Vec<CollisionZone>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub anti_patterns: Vec<AntiPattern>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub symbol_details: Vec<SymbolChangeFrequency>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ownership: Vec<ModuleOwnership>,
    pub metadata: ChangeFrequencyMetadata,
}

impl ChangeFrequencyReport {
    /// A well-formed report with nothing in it.
    #[must_use]
    pub fn empty(window: TimeWindow, window_start: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            summary: ChangeFrequencySummary::default(),
            hotspots: Vec::new(),
            collisions: Vec::new(),
            anti_patterns: Vec::new(),
            symbol_details: Vec::new(),
            ownership: Vec::new(),
            metadata: ChangeFrequencyMetadata {
                analyzed_at: now,
                time_window: window,
                window_start,
                window_end: now,
                commit_range: None,
                compute_time_ms: 0,
                from_cache: false,
            },
        }
    }
}
