//! Volatility and collision scoring.

use churnlens_math::{clamp_unit, safe_div, saturating_fraction};
use churnlens_types::{ContributorActivity, FindingSeverity};

/// Days of activity that count as "recent" for collision detection.
pub const RECENT_DAYS: i64 = 7;

/// Blend of change rate, churn rate and author diversity, in `[0, 1]`.
///
/// * 40%: changes per day, saturating at 1/day
/// * 40%: changed lines per day, saturating at 100/day
/// * 20%: unique authors, saturating at 5
///
/// A non-positive `window_days` is treated as 30.
///
/// ```
/// use churnlens_frequency::volatility_score;
///
/// assert_eq!(volatility_score(30, 3000, 5, 30.0), 1.0);
/// assert_eq!(volatility_score(0, 0, 0, 30.0), 0.0);
/// ```
#[must_use]
pub fn volatility_score(change_count: u64, lines_changed: u64, unique_authors: usize, window_days: f64) -> f64 {
    let days = effective_days(window_days);
    let change_rate = change_count as f64 / days;
    let churn_rate = lines_changed as f64 / days;
    clamp_unit(
        0.4 * saturating_fraction(change_rate, 1.0)
            + 0.4 * saturating_fraction(churn_rate, 100.0)
            + 0.2 * saturating_fraction(unique_authors as f64, 5.0),
    )
}

/// Changes per day over the window.
#[must_use]
pub fn change_rate(change_count: u64, window_days: f64) -> f64 {
    change_count as f64 / effective_days(window_days)
}

fn effective_days(window_days: f64) -> f64 {
    if window_days > 0.0 && window_days.is_finite() {
        window_days
    } else {
        30.0
    }
}

/// Collision risk from contributor spread and recent activity, in `[0, 1]`.
///
/// `contributors` must be sorted by change count, largest first.
///
/// * 40%: extra contributors beyond the first, saturating at 4
/// * 40%: recent changes, saturating at 10
/// * 20%: how close the runner-up's share is to the leader's; the ratio is
///   clamped to `[0, 1]` and the term is skipped when the leader's share is zero
///
/// Fewer than two contributors score zero.
#[must_use]
pub fn collision_score(contributors: &[ContributorActivity], recent_changes: u64) -> f64 {
    let [first, second, ..] = contributors else {
        return 0.0;
    };
    let authors = saturating_fraction((contributors.len() - 1) as f64, 4.0) * 0.4;
    let recency = saturating_fraction(recent_changes as f64, 10.0) * 0.4;
    let balance = if first.ownership_share > 0.0 {
        clamp_unit(safe_div(second.ownership_share, first.ownership_share)) * 0.2
    } else {
        0.0
    };
    clamp_unit(authors + recency + balance)
}

/// `>= 0.7` critical, `>= 0.4` warning, otherwise info.
#[must_use]
pub fn collision_severity(score: f64) -> FindingSeverity {
    if score >= 0.7 {
        FindingSeverity::Critical
    } else if score >= 0.4 {
        FindingSeverity::Warning
    } else {
        FindingSeverity::Info
    }
}

/// Advice for a collision zone; critical zones name the primary owner.
#[must_use]
pub fn collision_recommendation(contributors: &[ContributorActivity], severity: FindingSeverity) -> String {
    match severity {
        FindingSeverity::Critical => match contributors.first() {
            Some(owner) => format!(
                "High collision risk. Primary owner: {} ({:.0}%). Coordinate before making changes.",
                owner.author_name,
                owner.ownership_share * 100.0
            ),
            None => "High collision risk. Multiple developers actively editing. Coordinate changes."
                .to_string(),
        },
        FindingSeverity::Warning => {
            "Moderate collision risk. Consider notifying recent contributors.".to_string()
        }
        FindingSeverity::Info => {
            "Low collision risk, but multiple contributors. Be aware of potential conflicts."
                .to_string()
        }
    }
}
