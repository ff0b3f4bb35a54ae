//! # churnlens-settings
//!
//! **Tier 0 (Pure Settings)**
//!
//! The `churnlens.toml` file model. Every section and every key is
//! optional; an absent key keeps the built-in default of the component it
//! configures.
//!
//! ## What belongs here
//! * Serde types for the configuration file
//! * Discovery and loading of the file
//! * Seeding request parameters from configured values
//!
//! ## What does NOT belong here
//! * Building analyzers or caches (use churnlens-core)
//! * Request parsing

#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use churnlens_types::{AnalysisParams, ChangeFrequencyParams};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File names [`ChurnlensConfig::discover`] looks for, in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["churnlens.toml", ".churnlens.toml"];

/// Upper bound for `[cache]` durations: one year.
pub const MAX_DURATION_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = SettingsError> = std::result::Result<T, E>;

/// Root of `churnlens.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChurnlensConfig {
    /// `[frequency]`: defaults for change-frequency requests.
    pub frequency: FrequencyConfig,

    /// `[churn]`: which paths count toward churn.
    pub churn: ChurnConfig,

    /// `[change]`: defaults for change-analysis requests.
    pub change: ChangeConfig,

    /// `[metrics]`: function metric limits.
    pub metrics: MetricsConfig,

    /// `[cache]`: frequency cache sizing.
    pub cache: CacheConfig,

    /// `[patterns]`: anti-pattern detector thresholds.
    pub patterns: PatternsConfig,

    /// `[logging]`
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequencyConfig {
    /// "7d", "30d", "90d", "1y" or an alias such as "week".
    pub time_window: Option<String>,

    /// "file", "symbol" or "module".
    pub granularity: Option<String>,

    /// Report sections: "hotspots", "collisions", "ownership", "patterns", "all".
    pub focus: Option<Vec<String>>,

    pub min_changes: Option<u64>,
    pub min_contributors: Option<usize>,
    pub top_n: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChurnConfig {
    /// Globs that force a path into the analysis.
    pub include_patterns: Option<Vec<String>>,

    /// Globs excluded on top of the built-in exclusions.
    pub exclude_patterns: Option<Vec<String>>,

    /// Drop the built-in exclusions (lock files, vendored trees, docs).
    pub skip_default_exclusions: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeConfig {
    /// Detectors: "duplicates", "naming", "metrics" or "all".
    pub focus: Option<Vec<String>>,

    /// Minimum similarity, in `(0, 1]`, for structural duplicates and similar names.
    pub similarity_threshold: Option<f64>,

    /// Per-category cap on reported findings.
    pub max_findings: Option<usize>,

    pub fuzzy_metric: Option<FuzzyMetricKind>,
}

/// String similarity used by the similar-names check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuzzyMetricKind {
    #[default]
    JaroWinkler,
    Levenshtein,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub max_complexity: Option<u32>,
    pub max_lines: Option<u32>,
    pub max_nesting: Option<u32>,

    /// Complexity growth over the previous version, in percent.
    pub complexity_increase_pct: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: Option<u64>,
    pub max_entries: Option<usize>,
    pub cleanup_period_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternsConfig {
    pub registration_calls: Option<usize>,
    pub enum_values: Option<usize>,
    pub god_object_lines: Option<usize>,
    pub switch_cases: Option<usize>,
    pub config_fields: Option<usize>,

    /// Share of export lines, in `(0, 1]`, that makes a barrel file.
    pub barrel_export_ratio: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `"churnlens_git=debug,warn"`.
    pub filter: Option<String>,
}

impl ChurnlensConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load the first of [`CONFIG_FILE_NAMES`] present in `root`.
    ///
    /// `Ok(None)` when neither file exists; a file that exists but does not
    /// parse, or a path that cannot be inspected, is an error.
    pub fn discover(root: &Path) -> Result<Option<Self>> {
        for name in CONFIG_FILE_NAMES {
            let candidate = root.join(name);
            match std::fs::metadata(&candidate) {
                Ok(meta) if meta.is_file() => return Self::from_file(&candidate).map(Some),
                Ok(_) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(None)
    }

    /// Reject values no component can run with.
    pub fn validate(&self) -> Result<()> {
        if let Some(t) = self.change.similarity_threshold {
            check_unit("change.similarity_threshold", t)?;
        }
        if let Some(r) = self.patterns.barrel_export_ratio {
            check_unit("patterns.barrel_export_ratio", r)?;
        }
        if let Some(pct) = self.metrics.complexity_increase_pct
            && !(pct.is_finite() && pct > 0.0)
        {
            return Err(invalid(
                "metrics.complexity_increase_pct",
                format!("must be a positive percentage, got {pct}"),
            ));
        }
        check_duration("cache.ttl_secs", self.cache.ttl_secs)?;
        check_duration("cache.cleanup_period_secs", self.cache.cleanup_period_secs)?;
        check_positive("cache.max_entries", self.cache.max_entries)?;

        let p = &self.patterns;
        check_positive("patterns.registration_calls", p.registration_calls)?;
        check_positive("patterns.enum_values", p.enum_values)?;
        check_positive("patterns.god_object_lines", p.god_object_lines)?;
        check_positive("patterns.switch_cases", p.switch_cases)?;
        check_positive("patterns.config_fields", p.config_fields)?;
        Ok(())
    }

    /// Request defaults for change-frequency analysis with configured
    /// values applied.
    #[must_use]
    pub fn frequency_params(&self) -> ChangeFrequencyParams {
        let f = &self.frequency;
        let c = &self.churn;
        let mut params = ChangeFrequencyParams::default();
        if let Some(v) = &f.time_window {
            params.time_window.clone_from(v);
        }
        if let Some(v) = &f.granularity {
            params.granularity.clone_from(v);
        }
        if let Some(v) = &f.focus {
            params.focus.clone_from(v);
        }
        params.min_changes = f.min_changes.unwrap_or(params.min_changes);
        params.min_contributors = f.min_contributors.unwrap_or(params.min_contributors);
        params.top_n = f.top_n.unwrap_or(params.top_n);
        if let Some(v) = &c.include_patterns {
            params.include_patterns.clone_from(v);
        }
        if let Some(v) = &c.exclude_patterns {
            params.exclude_patterns.clone_from(v);
        }
        params.skip_default_exclusions = c.skip_default_exclusions.unwrap_or(params.skip_default_exclusions);
        params
    }

    /// Request defaults for change analysis with configured values applied.
    /// An empty focus list is spelled `all`, which means the same thing.
    #[must_use]
    pub fn analysis_params(&self) -> AnalysisParams {
        let c = &self.change;
        let mut params = AnalysisParams::default();
        if let Some(v) = &c.focus {
            params.focus = if v.is_empty() { vec!["all".to_string()] } else { v.clone() };
        }
        params.similarity_threshold = c.similarity_threshold.unwrap_or(params.similarity_threshold);
        params.max_findings = c.max_findings.unwrap_or(params.max_findings);
        params
    }
}

fn check_unit(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be in (0, 1], got {value}")))
    }
}

fn check_positive(field: &'static str, value: Option<usize>) -> Result<()> {
    match value {
        Some(0) => Err(invalid(field, "must be at least 1".into())),
        _ => Ok(()),
    }
}

fn check_duration(field: &'static str, secs: Option<u64>) -> Result<()> {
    match secs {
        Some(0) => Err(invalid(field, "must be at least 1".into())),
        Some(s) if s > MAX_DURATION_SECS => Err(invalid(
            field,
            format!("must be at most {MAX_DURATION_SECS} seconds, got {s}"),
        )),
        _ => Ok(()),
    }
}

fn invalid(field: &'static str, reason: String) -> SettingsError {
    SettingsError::Invalid { field, reason }
}
