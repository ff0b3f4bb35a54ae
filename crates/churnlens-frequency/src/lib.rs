//! # churnlens-frequency
//!
//! **Tier 3 (Frequency Analysis)**
//!
//! Folds commit history into per-file churn metrics and derives hotspots,
//! collision zones and module ownership from them.
//!
//! ## What belongs here
//! * Two-pass aggregation of commits into [`FileChangeFrequency`] records
//! * Volatility and collision scoring
//! * Hotspot, collision, ownership and anti-pattern sections of a report
//! * The [`CommitSource`] seam and its [`churnlens_git::GitProvider`] impl
//!
//! ## What does NOT belong here
//! * Running git or parsing its output (use churnlens-git)
//! * Deciding which paths count (use churnlens-exclude)
//! * Pattern heuristics themselves (use churnlens-patterns)
//!
//! [`FileChangeFrequency`]: churnlens_types::FileChangeFrequency

#![forbid(unsafe_code)]

mod aggregate;
mod analyzer;
mod ownership;
mod score;
mod source;

pub use aggregate::{
    FileStats, aggregate_by_file, aggregate_file_stats, collision_zone, find_collisions,
    find_hotspots, matches_path, most_active_contributor, recent_changes,
};
pub use analyzer::{FrequencyAnalyzer, report_cache_pattern};
pub use ownership::{SECONDARY_OWNER_SHARE, calculate_ownership};
pub use score::{
    RECENT_DAYS, change_rate, collision_recommendation, collision_score, collision_severity,
    volatility_score,
};
pub use source::CommitSource;
