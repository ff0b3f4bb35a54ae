//! Commit streams folded into per-file and per-symbol frequency records.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};
use churnlens_exclude::ChurnFilter;
use churnlens_path::{base_name, normalize_rel_path};
use churnlens_types::{
    CollisionZone, CommitInfo, ContributorActivity, EntityType, FileChangeFrequency,
    FrequencyMetrics, TimeWindow,
};

use crate::score::{
    RECENT_DAYS, change_rate, collision_recommendation, collision_score, collision_severity,
    volatility_score,
};

/// Per-file stats keyed by path.
pub type FileStats = BTreeMap<String, FileChangeFrequency>;

/// Fold `commits` into one record per non-excluded file.
///
/// Pass one accumulates counts, line totals and first/last timestamps and
/// merges contributors by email. Pass two derives unique authors, change
/// rate, volatility and ownership shares, and sorts contributors by change
/// count. Commit order does not matter.
#[must_use]
pub fn aggregate_by_file(commits: &[CommitInfo], window: TimeWindow, filter: &ChurnFilter) -> FileStats {
    let mut stats = FileStats::new();

    for commit in commits {
        for change in &commit.file_changes {
            if change.path.is_empty() || filter.should_exclude(&change.path) {
                continue;
            }
            let entry = stats
                .entry(change.path.clone())
                .or_insert_with(|| FileChangeFrequency::empty(change.path.clone(), window));
            if let Some(metrics) = entry.metrics.get_mut(&window) {
                metrics.change_count += 1;
                metrics.lines_added += change.lines_added;
                metrics.lines_deleted += change.lines_deleted;
                metrics.observe(commit.timestamp);
            }
            credit(&mut entry.contributors, commit, change.lines_added, change.lines_deleted);
        }
    }

    for entry in stats.values_mut() {
        let Some(metrics) = entry.metrics.get_mut(&window) else {
            continue;
        };
        finish(metrics, &mut entry.contributors, window);
    }
    stats
}

/// Aggregate a single file's history.
///
/// Every commit counts as one change of `file_path`; line totals come only
/// from file changes whose path [`matches_path`]. `None` for no commits.
#[must_use]
pub fn aggregate_file_stats(
    commits: &[CommitInfo],
    file_path: &str,
    window: TimeWindow,
) -> Option<FileChangeFrequency> {
    if commits.is_empty() {
        return None;
    }
    let mut freq = FileChangeFrequency::empty(file_path, window);
    let metrics = freq.metrics.get_mut(&window)?;
    for commit in commits {
        let (added, deleted) = commit
            .file_changes
            .iter()
            .filter(|c| matches_path(&c.path, file_path))
            .fold((0, 0), |(a, d), c| (a + c.lines_added, d + c.lines_deleted));
        metrics.change_count += 1;
        metrics.lines_added += added;
        metrics.lines_deleted += deleted;
        metrics.observe(commit.timestamp);
        credit(&mut freq.contributors, commit, added, deleted);
    }
    finish(metrics, &mut freq.contributors, window);
    Some(freq)
}

/// Same file after cleaning, or at least the same base name.
///
/// ```
/// use churnlens_frequency::matches_path;
///
/// assert!(matches_path("./src/a.go", "src/a.go"));
/// assert!(matches_path("old/dir/a.go", "src/a.go"));
/// assert!(!matches_path("src/b.go", "src/a.go"));
/// ```
#[must_use]
pub fn matches_path(a: &str, b: &str) -> bool {
    let a = normalize_rel_path(a);
    let b = normalize_rel_path(b);
    a == b || base_name(&a) == base_name(&b)
}

fn credit(contributors: &mut Vec<ContributorActivity>, commit: &CommitInfo, added: u64, deleted: u64) {
    if let Some(c) = contributors
        .iter_mut()
        .find(|c| c.author_email == commit.author_email)
    {
        c.change_count += 1;
        c.lines_added += added;
        c.lines_deleted += deleted;
        c.last_change_at = c.last_change_at.max(commit.timestamp);
        return;
    }
    contributors.push(ContributorActivity {
        author_name: commit.author_name.clone(),
        author_email: commit.author_email.clone(),
        change_count: 1,
        lines_added: added,
        lines_deleted: deleted,
        ownership_share: 0.0,
        last_change_at: commit.timestamp,
    });
}

fn finish(metrics: &mut FrequencyMetrics, contributors: &mut [ContributorActivity], window: TimeWindow) {
    let days = window.days() as f64;
    metrics.unique_authors = contributors.len();
    metrics.change_rate = change_rate(metrics.change_count, days);
    metrics.volatility_score = volatility_score(
        metrics.change_count,
        metrics.lines_changed(),
        metrics.unique_authors,
        days,
    );
    assign_shares(contributors, metrics.change_count);
}

/// Set ownership shares against `total` and sort by change count, largest first.
pub(crate) fn assign_shares(contributors: &mut [ContributorActivity], total: u64) {
    for c in contributors.iter_mut() {
        if total > 0 {
            c.ownership_share = c.change_count as f64 / total as f64;
        }
    }
    contributors.sort_by(|a, b| b.change_count.cmp(&a.change_count));
}

/// Files with at least `min_changes` changes, most volatile first, at most `top_n`.
#[must_use]
pub fn find_hotspots(stats: &FileStats, min_changes: u64, top_n: usize) -> Vec<FileChangeFrequency> {
    let mut hotspots: Vec<FileChangeFrequency> = stats
        .values()
        .filter(|f| f.primary_metrics().is_some_and(|m| m.change_count >= min_changes))
        .cloned()
        .collect();
    hotspots.sort_by(|a, b| b.volatility().total_cmp(&a.volatility()));
    hotspots.truncate(top_n);
    hotspots
}

/// Sum of change counts of contributors active after `now - 7 days`.
#[must_use]
pub fn recent_changes(contributors: &[ContributorActivity], now: DateTime<Utc>) -> u64 {
    let cutoff = now - Duration::days(RECENT_DAYS);
    contributors
        .iter()
        .filter(|c| c.last_change_at > cutoff)
        .map(|c| c.change_count)
        .sum()
}

/// Score one file's contributors as a collision zone.
#[must_use]
pub fn collision_zone(freq: &FileChangeFrequency, now: DateTime<Utc>) -> CollisionZone {
    let recent = recent_changes(&freq.contributors, now);
    let score = collision_score(&freq.contributors, recent);
    let severity = collision_severity(score);
    CollisionZone {
        entity_type: EntityType::File,
        path: freq.file_path.clone(),
        symbol_name: None,
        contributors: freq.contributors.clone(),
        collision_score: score,
        severity,
        recommendation: collision_recommendation(&freq.contributors, severity),
        recent_changes: recent,
    }
}

/// Files with at least `min_contributors` contributors, highest score first.
#[must_use]
pub fn find_collisions(stats: &FileStats, min_contributors: usize, now: DateTime<Utc>) -> Vec<CollisionZone> {
    let mut zones: Vec<CollisionZone> = stats
        .values()
        .filter(|f| f.contributors.len() >= min_contributors)
        .map(|f| collision_zone(f, now))
        .collect();
    zones.sort_by(|a, b| b.collision_score.total_cmp(&a.collision_score));
    zones
}

/// Name of the author with the most commits; ties go to the earliest seen.
#[must_use]
pub fn most_active_contributor(commits: &[CommitInfo]) -> Option<String> {
    let mut counts: HashMap<&str, (usize, usize, &str)> = HashMap::new();
    for (order, commit) in commits.iter().enumerate() {
        let slot = counts
            .entry(commit.author_email.as_str())
            .or_insert((0, order, commit.author_name.as_str()));
        slot.0 += 1;
        slot.2 = commit.author_name.as_str();
    }
    counts
        .into_values()
        .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
        .map(|(_, _, name)| name.to_string())
}
