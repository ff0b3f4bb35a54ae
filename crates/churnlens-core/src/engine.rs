//! The [`Engine`]: one repository, its configuration and its caches.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use churnlens_cache::{CacheConfig, CacheStats, FrequencyCache};
use churnlens_change::{ChangeAnalyzer, MetricsThresholds, NamingChecker, SourceParser, SymbolIndex};
use churnlens_frequency::FrequencyAnalyzer;
use churnlens_git::{CancelToken, GitProvider};
use churnlens_naming::FuzzyMetric;
use churnlens_patterns::{PatternDetector, PatternThresholds};
use churnlens_settings::{ChurnlensConfig, FuzzyMetricKind};
use churnlens_types::{
    AnalysisParams, AnalysisReport, ChangeFrequencyParams, ChangeFrequencyReport, CollisionZone,
    DiffStats, FileChangeFrequency, TimeWindow,
};
use tracing::debug;

use crate::error::CoreError;

type SharedIndex = Box<dyn SymbolIndex + Send + Sync>;
type SharedParser = Box<dyn SourceParser + Send + Sync>;

/// Entry point for embedding churnlens.
///
/// Frequency analysis needs only git. Change analysis also needs a symbol
/// index and a source parser; until both are attached it fails with
/// [`ErrorCode::NotReady`](crate::ErrorCode::NotReady).
pub struct Engine {
    git: GitProvider,
    config: ChurnlensConfig,
    frequency: FrequencyAnalyzer<GitProvider>,
    index: Option<SharedIndex>,
    parser: Option<SharedParser>,
}

impl Engine {
    /// Open the repository containing `path` and load its `churnlens.toml`
    /// if there is one.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let git = GitProvider::new(path)?;
        let config = ChurnlensConfig::discover(git.repo_root())?.unwrap_or_default();
        debug!(root = %git.repo_root().display(), "engine opened");
        Ok(Self::with_config(git, config))
    }

    #[must_use]
    pub fn with_config(git: GitProvider, config: ChurnlensConfig) -> Self {
        let cache = Arc::new(FrequencyCache::with_config(cache_config(&config)));
        let frequency = frequency_analyzer(&git, &config, cache);
        Self {
            git,
            config,
            frequency,
            index: None,
            parser: None,
        }
    }

    #[must_use]
    pub fn with_symbol_index(mut self, index: impl SymbolIndex + Send + Sync + 'static) -> Self {
        self.index = Some(Box::new(index));
        self
    }

    #[must_use]
    pub fn with_parser(mut self, parser: impl SourceParser + Send + Sync + 'static) -> Self {
        self.parser = Some(Box::new(parser));
        self
    }

    /// Route every subsequent git subprocess through `cancel`. The cache is
    /// kept.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.git = self.git.with_cancel(cancel);
        let cache = Arc::clone(self.frequency.cache());
        self.frequency = frequency_analyzer(&self.git, &self.config, cache);
        self
    }

    #[must_use]
    pub fn repo_root(&self) -> &Path {
        self.git.repo_root()
    }

    #[must_use]
    pub fn config(&self) -> &ChurnlensConfig {
        &self.config
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.index.is_some() && self.parser.is_some()
    }

    /// Frequency-request defaults seeded from the configuration.
    #[must_use]
    pub fn frequency_defaults(&self) -> ChangeFrequencyParams {
        self.config.frequency_params()
    }

    /// Change-analysis defaults seeded from the configuration.
    #[must_use]
    pub fn analysis_defaults(&self) -> AnalysisParams {
        self.config.analysis_params()
    }

    pub fn change_frequency(&self, params: &ChangeFrequencyParams) -> Result<ChangeFrequencyReport, CoreError> {
        Ok(self.frequency.analyze(params)?)
    }

    pub fn analyze_file(&self, file_path: &str, window: TimeWindow) -> Result<FileChangeFrequency, CoreError> {
        Ok(self.frequency.analyze_file(file_path, window)?)
    }

    pub fn collision_risk(&self, file_path: &str) -> Result<Option<CollisionZone>, CoreError> {
        Ok(self.frequency.collision_risk(file_path)?)
    }

    pub fn analyze_changes(&self, params: &AnalysisParams) -> Result<AnalysisReport, CoreError> {
        let index = self.index.as_deref().ok_or_else(|| CoreError::not_ready("symbol index"))?;
        let parser = self.parser.as_deref().ok_or_else(|| CoreError::not_ready("source parser"))?;
        let analyzer = ChangeAnalyzer::new(&self.git, index, parser)
            .with_naming(NamingChecker::new(fuzzy_metric(&self.config)))
            .with_thresholds(metrics_thresholds(&self.config));
        Ok(analyzer.analyze(params)?)
    }

    pub fn diff_stats(&self, params: &AnalysisParams) -> Result<DiffStats, CoreError> {
        Ok(self.git.diff_stats(params)?)
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.frequency.cache().stats()
    }

    /// Drop cached results for one file in every window, including
    /// reports requested for that file.
    pub fn invalidate_file(&self, file_path: &str) {
        self.frequency.cache().invalidate_file(file_path);
    }

    /// Drop cached reports for `pattern` in every window.
    pub fn invalidate_pattern(&self, pattern: &str) {
        self.frequency.cache().invalidate_pattern(pattern);
    }

    pub fn clear_cache(&self) {
        self.frequency.cache().clear();
    }
}

fn frequency_analyzer(
    git: &GitProvider,
    config: &ChurnlensConfig,
    cache: Arc<FrequencyCache>,
) -> FrequencyAnalyzer<GitProvider> {
    FrequencyAnalyzer::with_cache(git.clone(), cache)
        .with_detector(PatternDetector::new(pattern_thresholds(config)))
}

/// Configured cache sizing over [`CacheConfig::default`].
#[must_use]
pub fn cache_config(config: &ChurnlensConfig) -> CacheConfig {
    let c = &config.cache;
    let mut out = CacheConfig::default();
    if let Some(secs) = c.ttl_secs {
        out.ttl = Duration::from_secs(secs);
    }
    out.max_entries = c.max_entries.unwrap_or(out.max_entries);
    if let Some(secs) = c.cleanup_period_secs {
        out.cleanup_period = Duration::from_secs(secs);
    }
    out
}

#[must_use]
pub fn pattern_thresholds(config: &ChurnlensConfig) -> PatternThresholds {
    let p = &config.patterns;
    let d = PatternThresholds::default();
    PatternThresholds {
        registration_calls: p.registration_calls.unwrap_or(d.registration_calls),
        enum_values: p.enum_values.unwrap_or(d.enum_values),
        god_object_lines: p.god_object_lines.unwrap_or(d.god_object_lines),
        switch_cases: p.switch_cases.unwrap_or(d.switch_cases),
        config_fields: p.config_fields.unwrap_or(d.config_fields),
        barrel_export_ratio: p.barrel_export_ratio.unwrap_or(d.barrel_export_ratio),
    }
}

#[must_use]
pub fn metrics_thresholds(config: &ChurnlensConfig) -> MetricsThresholds {
    let m = &config.metrics;
    let d = MetricsThresholds::default();
    MetricsThresholds {
        max_complexity: m.max_complexity.unwrap_or(d.max_complexity),
        max_lines: m.max_lines.unwrap_or(d.max_lines),
        max_nesting: m.max_nesting.unwrap_or(d.max_nesting),
        complexity_increase_pct: m.complexity_increase_pct.unwrap_or(d.complexity_increase_pct),
    }
}

#[must_use]
pub fn fuzzy_metric(config: &ChurnlensConfig) -> FuzzyMetric {
    match config.change.fuzzy_metric.unwrap_or_default() {
        FuzzyMetricKind::JaroWinkler => FuzzyMetric::JaroWinkler,
        FuzzyMetricKind::Levenshtein => FuzzyMetric::Levenshtein,
    }
}
