//! The frequency analysis pipeline.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use churnlens_cache::FrequencyCache;
use churnlens_exclude::{ChurnFilter, ChurnFilterConfig};
use churnlens_patterns::{PatternDetector, count_file_lines};
use churnlens_types::{
    AntiPattern, ChangeFrequencyParams, ChangeFrequencyReport, CollisionZone, CommitInfo, FileChangeFrequency,
    FrequencyFocus, Granularity, SymbolChangeFrequency, TimeWindow,
};
use tracing::{debug, warn};

use crate::aggregate::{
    FileStats, aggregate_by_file, aggregate_file_stats, collision_zone, find_collisions,
    find_hotspots, most_active_contributor,
};
use crate::ownership::calculate_ownership;
use crate::source::CommitSource;

/// Runs frequency analysis over a [`CommitSource`], memoizing reports and
/// per-file results in a shared [`FrequencyCache`].
pub struct FrequencyAnalyzer<S> {
    source: S,
    cache: Arc<FrequencyCache>,
    detector: PatternDetector,
}

impl<S: CommitSource> FrequencyAnalyzer<S> {
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_cache(source, Arc::new(FrequencyCache::default()))
    }

    #[must_use]
    pub fn with_cache(source: S, cache: Arc<FrequencyCache>) -> Self {
        Self {
            source,
            cache,
            detector: PatternDetector::default(),
        }
    }

    #[must_use]
    pub fn with_detector(mut self, detector: PatternDetector) -> Self {
        self.detector = detector;
        self
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<FrequencyCache> {
        &self.cache
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Build a full report for `params`.
    ///
    /// Zero commits is a valid, empty report. Results are cached under
    /// [`report_cache_pattern`] and the window; a cached report comes back
    /// with `metadata.from_cache` set.
    pub fn analyze(&self, params: &ChangeFrequencyParams) -> Result<ChangeFrequencyReport> {
        let started = Instant::now();
        let mut params = params.clone();
        params.apply_defaults();

        let window = params.window();
        let pattern = report_cache_pattern(&params);
        if let Some(cached) = self.cache.get_report(&pattern, window) {
            debug!(pattern = %pattern, window = %window, "frequency report served from cache");
            let mut report = (*cached).clone();
            report.metadata.from_cache = true;
            return Ok(report);
        }

        let now = Utc::now();
        let since = now - window.duration();
        let commits = self.history(&params, since)?;

        let mut report = ChangeFrequencyReport::empty(window, since, now);
        report.summary.total_commits_analyzed = commits.len();

        let filter = ChurnFilter::new(&ChurnFilterConfig {
            include_patterns: params.include_patterns.clone(),
            exclude_patterns: params.exclude_patterns.clone(),
            skip_default_exclusions: params.skip_default_exclusions,
        });
        let stats = aggregate_by_file(&commits, window, &filter);
        report.summary.total_files_analyzed = stats.len();

        let want_hotspots = params.has_focus(FrequencyFocus::Hotspots);
        let want_patterns = params.has_focus(FrequencyFocus::Patterns);
        if want_hotspots || want_patterns {
            let mut hotspots = find_hotspots(&stats, params.min_changes, params.top_n);
            if want_patterns {
                report.anti_patterns = self.scan_hotspots(&mut hotspots);
                report.summary.anti_patterns_found = report.anti_patterns.len();
            }
            if want_hotspots {
                report.summary.hotspots_found = hotspots.len();
                report.summary.highest_churn = hotspots.first().map(|h| h.file_path.clone());
                report.hotspots = hotspots;
            }
        }

        if params.has_focus(FrequencyFocus::Collisions) {
            report.collisions = find_collisions(&stats, params.min_contributors, now);
            report.summary.collision_zones = report.collisions.len();
        }

        if params.has_focus(FrequencyFocus::Ownership) {
            report.ownership = calculate_ownership(&stats);
        }

        if params.granularity() == Granularity::Symbol {
            report.symbol_details = self.symbol_details(&params, window, since).into_iter().collect();
        }

        report.summary.most_active_contributor = most_active_contributor(&commits);
        report.metadata.compute_time_ms = elapsed_ms(started);

        debug!(
            commits = commits.len(),
            files = stats.len(),
            hotspots = report.hotspots.len(),
            collisions = report.collisions.len(),
            window = %window,
            "frequency analysis complete"
        );
        self.cache.set_report(&pattern, window, report.clone());
        Ok(report)
    }

    fn history(&self, params: &ChangeFrequencyParams, since: DateTime<Utc>) -> Result<Vec<CommitInfo>> {
        let commits = match (&params.file_path, &params.file_pattern) {
            (Some(path), _) if !path.is_empty() => self.source.file_history(path, since),
            (_, Some(pattern)) if !pattern.is_empty() => self.source.repo_history(since, Some(pattern)),
            _ => self.source.repo_history(since, None),
        };
        commits.context("failed to get commit history")
    }

    /// Run the pattern detector over each hotspot's current content,
    /// escalating by the hotspot's contributors. Unreadable files are skipped.
    fn scan_hotspots(&self, hotspots: &mut [FileChangeFrequency]) -> Vec<AntiPattern> {
        let mut found = Vec::new();
        for hotspot in hotspots.iter_mut() {
            let content = match self.source.file_content(&hotspot.file_path) {
                Ok(content) => content,
                Err(err) => {
                    warn!(path = %hotspot.file_path, error = %err, "skipping pattern scan");
                    continue;
                }
            };
            hotspot.line_count = Some(count_file_lines(&content));
            let patterns = self.detector.analyze_file_for_patterns(
                &content,
                &hotspot.file_path,
                &hotspot.contributors,
            );
            found.extend(patterns.iter().cloned());
            hotspot.anti_patterns = patterns;
        }
        found
    }

    fn symbol_details(
        &self,
        params: &ChangeFrequencyParams,
        window: TimeWindow,
        since: DateTime<Utc>,
    ) -> Option<SymbolChangeFrequency> {
        let path = params.file_path.as_deref().filter(|p| !p.is_empty())?;
        let name = params.symbol_name.as_deref().filter(|n| !n.is_empty())?;
        let start = params.symbol_start_line?;
        let end = params.symbol_end_line.unwrap_or(start);
        let commits = match self.source.symbol_history(path, start, end, since) {
            Ok(commits) => commits,
            Err(err) => {
                warn!(path, symbol = name, error = %err, "symbol history unavailable");
                return None;
            }
        };
        let freq = aggregate_file_stats(&commits, path, window)
            .unwrap_or_else(|| FileChangeFrequency::empty(path, window));
        Some(SymbolChangeFrequency {
            symbol_name: name.to_string(),
            symbol_type: String::new(),
            file_path: path.to_string(),
            start_line: start,
            end_line: end,
            metrics: freq.metrics,
            contributors: freq.contributors,
        })
    }

    /// Churn of one file over `window`, cached per file and window.
    pub fn analyze_file(&self, file_path: &str, window: TimeWindow) -> Result<FileChangeFrequency> {
        if let Some(cached) = self.cache.get_file_frequency(file_path, window) {
            return Ok((*cached).clone());
        }
        let since = Utc::now() - window.duration();
        let commits = self
            .source
            .file_history(file_path, since)
            .with_context(|| format!("failed to get history for {file_path}"))?;
        let freq = aggregate_file_stats(&commits, file_path, window)
            .unwrap_or_else(|| FileChangeFrequency::empty(file_path, window));
        self.cache.set_file_frequency(file_path, window, freq.clone());
        Ok(freq)
    }

    /// Collision zone for one file over 30 days; `None` with fewer than two
    /// contributors.
    pub fn collision_risk(&self, file_path: &str) -> Result<Option<CollisionZone>> {
        let freq = self.analyze_file(file_path, TimeWindow::Days30)?;
        if freq.contributors.len() < 2 {
            return Ok(None);
        }
        Ok(Some(collision_zone(&freq, Utc::now())))
    }

    /// Per-file stats over `window` for the whole repository.
    pub fn file_stats(&self, window: TimeWindow, filter: &ChurnFilter) -> Result<FileStats> {
        let since = Utc::now() - window.duration();
        let commits = self
            .source
            .repo_history(since, None)
            .context("failed to get commit history")?;
        Ok(aggregate_by_file(&commits, window, filter))
    }
}

/// The cache pattern for a report request.
///
/// The selector (file path, file pattern or `*`) alone when every other
/// setting is at its default, so that [`FrequencyCache::invalidate_pattern`]
/// on the selector drops it; otherwise the selector followed by the
/// non-default settings.
///
/// ```
/// use churnlens_frequency::report_cache_pattern;
/// use churnlens_types::ChangeFrequencyParams;
///
/// let mut params = ChangeFrequencyParams::default();
/// assert_eq!(report_cache_pattern(&params), "*");
/// params.file_pattern = Some("src/**".into());
/// params.top_n = 5;
/// assert_eq!(report_cache_pattern(&params), "src/**?top_n=5");
/// ```
#[must_use]
pub fn report_cache_pattern(params: &ChangeFrequencyParams) -> String {
    let selector = params
        .file_path
        .as_deref()
        .filter(|p| !p.is_empty())
        .or(params.file_pattern.as_deref().filter(|p| !p.is_empty()))
        .unwrap_or("*");

    let defaults = ChangeFrequencyParams::default();
    let mut parts: Vec<String> = Vec::new();
    if params.granularity() != defaults.granularity() {
        parts.push(format!("granularity={}", params.granularity().as_str()));
    }
    if params.focus != defaults.focus {
        parts.push(format!("focus={}", params.focus.join(",")));
    }
    if params.min_changes != defaults.min_changes {
        parts.push(format!("min_changes={}", params.min_changes));
    }
    if params.min_contributors != defaults.min_contributors {
        parts.push(format!("min_contributors={}", params.min_contributors));
    }
    if params.top_n != defaults.top_n {
        parts.push(format!("top_n={}", params.top_n));
    }
    if !params.include_patterns.is_empty() {
        parts.push(format!("include={}", params.include_patterns.join(",")));
    }
    if !params.exclude_patterns.is_empty() {
        parts.push(format!("exclude={}", params.exclude_patterns.join(",")));
    }
    if params.skip_default_exclusions {
        parts.push("skip_defaults".to_string());
    }
    if let (Some(name), Some(start)) = (&params.symbol_name, params.symbol_start_line) {
        let end = params.symbol_end_line.unwrap_or(start);
        parts.push(format!("symbol={name}@{start}-{end}"));
    }

    if parts.is_empty() {
        selector.to_string()
    } else {
        format!("{selector}?{}", parts.join("&"))
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
