//! Property-based tests for scoring and aggregation.

use chrono::{Duration, TimeZone, Utc};
use churnlens_exclude::ChurnFilter;
use churnlens_frequency::{aggregate_by_file, collision_score, volatility_score};
use churnlens_types::{ChangeStatus, CommitInfo, ContributorActivity, FileChange, TimeWindow};
use proptest::prelude::*;

fn contributor(count: u64, share: f64) -> ContributorActivity {
    ContributorActivity {
        author_name: "a".into(),
        author_email: "a@x".into(),
        change_count: count,
        lines_added: 0,
        lines_deleted: 0,
        ownership_share: share,
        last_change_at: Utc.timestamp_opt(0, 0).single().unwrap_or_default(),
    }
}

fn arb_commits() -> impl Strategy<Value = Vec<CommitInfo>> {
    prop::collection::vec(
        (
            0usize..4,
            0i64..20,
            prop::collection::vec((0usize..5, 0u64..200, 0u64..200), 1..4),
        ),
        0..30,
    )
    .prop_map(|rows| {
        let now = Utc::now();
        rows.into_iter()
            .enumerate()
            .map(|(i, (author, days, files))| CommitInfo {
                hash: format!("{i:040x}"),
                author_name: format!("dev{author}"),
                author_email: format!("dev{author}@example.com"),
                timestamp: now - Duration::days(days),
                message: String::new(),
                file_changes: files
                    .into_iter()
                    .map(|(f, added, deleted)| FileChange {
                        path: format!("src/f{f}.go"),
                        old_path: None,
                        lines_added: added,
                        lines_deleted: deleted,
                        status: ChangeStatus::Modified,
                    })
                    .collect(),
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn volatility_stays_in_unit_range(
        changes in 0u64..100_000,
        lines in 0u64..10_000_000,
        authors in 0usize..1000,
        days in -10.0f64..400.0,
    ) {
        let score = volatility_score(changes, lines, authors, days);
        prop_assert!(!score.is_nan());
        prop_assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn volatility_never_drops_with_more_changes(
        changes in 0u64..1000,
        extra in 0u64..1000,
        lines in 0u64..10_000,
        authors in 0usize..10,
    ) {
        let base = volatility_score(changes, lines, authors, 30.0);
        let more = volatility_score(changes + extra, lines, authors, 30.0);
        prop_assert!(more >= base);
    }

    #[test]
    fn collision_score_stays_in_unit_range(
        rows in prop::collection::vec((0u64..1000, -1.0f64..2.0), 0..8),
        recent in 0u64..10_000,
    ) {
        let contributors: Vec<_> = rows.into_iter().map(|(n, s)| contributor(n, s)).collect();
        let score = collision_score(&contributors, recent);
        prop_assert!(!score.is_nan());
        prop_assert!((0.0..=1.0).contains(&score));
        if contributors.len() < 2 {
            prop_assert_eq!(score, 0.0);
        }
    }

    #[test]
    fn aggregated_shares_sum_to_one(commits in arb_commits()) {
        let stats = aggregate_by_file(&commits, TimeWindow::Days30, ChurnFilter::default_filter());
        for freq in stats.values() {
            let metrics = freq.window(TimeWindow::Days30).unwrap();
            let counted: u64 = freq.contributors.iter().map(|c| c.change_count).sum();
            prop_assert_eq!(counted, metrics.change_count);
            prop_assert_eq!(freq.contributors.len(), metrics.unique_authors);

            let shares: f64 = freq.contributors.iter().map(|c| c.ownership_share).sum();
            prop_assert!((shares - 1.0).abs() < 1e-9, "{}", shares);
            prop_assert!(freq
                .contributors
                .windows(2)
                .all(|w| w[0].change_count >= w[1].change_count));
        }
    }
}
