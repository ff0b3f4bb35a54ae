//! # churnlens-patterns
//!
//! **Tier 2 (Heuristics)**
//!
//! Text-level detection of code shapes that attract merge conflicts:
//! registration hubs, constant dumps, god files, switch factories, barrel
//! files and config aggregates. Detection is regex and brace counting over
//! raw bytes; nothing here parses a language.
//!
//! ## What belongs here
//! * [`PatternDetector`] and its [`PatternThresholds`]
//! * Severity bucketing relative to a threshold
//! * Canned refactoring recommendations per pattern type
//!
//! ## What does NOT belong here
//! * Reading files or history (use churnlens-git)
//! * Deciding which files to scan (use churnlens-frequency)

#![forbid(unsafe_code)]

mod detect;
mod recommend;

use churnlens_types::{AntiPattern, AntiPatternSeverity, AntiPatternType, ContributorActivity};
use serde::{Deserialize, Serialize};

pub use recommend::pattern_recommendations;

/// Contributor count at which medium findings are escalated to high.
pub const COLLISION_CONTRIBUTORS: usize = 3;

/// Trigger levels for each detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternThresholds {
    pub registration_calls: usize,
    pub enum_values: usize,
    pub god_object_lines: usize,
    pub switch_cases: usize,
    pub config_fields: usize,
    /// Export statements per line at which an index file counts as a barrel.
    pub barrel_export_ratio: f64,
}

impl Default for PatternThresholds {
    fn default() -> Self {
        Self {
            registration_calls: 10,
            enum_values: 10,
            god_object_lines: 1500,
            switch_cases: 10,
            config_fields: 10,
            barrel_export_ratio: 0.5,
        }
    }
}

/// Runs every detector over one file's content.
#[derive(Debug, Clone, Default)]
pub struct PatternDetector {
    thresholds: PatternThresholds,
}

impl PatternDetector {
    #[must_use]
    pub fn new(thresholds: PatternThresholds) -> Self {
        Self { thresholds }
    }

    #[must_use]
    pub fn thresholds(&self) -> &PatternThresholds {
        &self.thresholds
    }

    /// All anti-patterns found in `content`, in detector order:
    /// registration, enum, god object, switch/select, barrel, config.
    #[must_use]
    pub fn detect_patterns(&self, content: &[u8], file_path: &str) -> Vec<AntiPattern> {
        let t = &self.thresholds;
        let mut found = Vec::new();
        found.extend(detect::registration_function(content, t.registration_calls));
        found.extend(detect::enum_aggregation(content, t.enum_values));
        found.extend(detect::god_object(content, t.god_object_lines));
        found.extend(detect::switch_factories(content, t.switch_cases));
        found.extend(detect::barrel_file(content, file_path, t.barrel_export_ratio));
        found.extend(detect::config_aggregation(content, file_path, t.config_fields));
        for pattern in &mut found {
            pattern.file_path = file_path.to_string();
        }
        found
    }

    /// [`detect_patterns`](Self::detect_patterns), escalating medium
    /// findings to high when the file has [`COLLISION_CONTRIBUTORS`] or more
    /// recent contributors.
    #[must_use]
    pub fn analyze_file_for_patterns(
        &self,
        content: &[u8],
        file_path: &str,
        contributors: &[ContributorActivity],
    ) -> Vec<AntiPattern> {
        let mut found = self.detect_patterns(content, file_path);
        if contributors.len() >= COLLISION_CONTRIBUTORS {
            for pattern in &mut found {
                if pattern.severity == AntiPatternSeverity::Medium {
                    pattern.severity = AntiPatternSeverity::High;
                    pattern.description.push_str(&format!(
                        " (high collision risk: {} contributors)",
                        contributors.len()
                    ));
                }
            }
        }
        found
    }

    /// Size-only check; no regexes run.
    #[must_use]
    pub fn quick_scan(&self, content: &[u8], file_path: &str) -> Option<AntiPattern> {
        let lines = newline_lines(content);
        (lines >= self.thresholds.god_object_lines).then(|| AntiPattern {
            pattern_type: AntiPatternType::GodObject,
            file_path: file_path.to_string(),
            description: format!("Large file with {lines} lines"),
            location: "entire file".to_string(),
            severity: AntiPatternSeverity::High,
            suggestion: "Consider splitting into smaller, focused modules".to_string(),
            metrics: Default::default(),
        })
    }
}

/// Bucket `count` by how far it overshoots `threshold`:
/// at least 2x is high, at least 1.5x is medium, anything else low.
#[must_use]
pub fn determine_severity(count: usize, threshold: usize) -> AntiPatternSeverity {
    let ratio = count as f64 / threshold as f64;
    if ratio >= 2.0 {
        AntiPatternSeverity::High
    } else if ratio >= 1.5 {
        AntiPatternSeverity::Medium
    } else {
        AntiPatternSeverity::Low
    }
}

/// Number of text lines; a trailing newline does not open a new line.
#[must_use]
pub fn count_file_lines(content: &[u8]) -> usize {
    if content.is_empty() {
        return 0;
    }
    let newlines = bytecount(content, b'\n');
    if content.ends_with(b"\n") {
        newlines
    } else {
        newlines + 1
    }
}

/// Newline count plus one; what the size detectors compare against.
pub(crate) fn newline_lines(content: &[u8]) -> usize {
    bytecount(content, b'\n') + 1
}

pub(crate) fn bytecount(content: &[u8], needle: u8) -> usize {
    content.iter().filter(|&&b| b == needle).count()
}
