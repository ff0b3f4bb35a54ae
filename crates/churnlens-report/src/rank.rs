//! Ordering and per-category caps.

use churnlens_types::{DuplicateFinding, MetricsFinding, NamingFinding};

/// Most similar first. Ties keep discovery order.
#[must_use]
pub fn rank_duplicates(mut findings: Vec<DuplicateFinding>) -> Vec<DuplicateFinding> {
    findings.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    findings
}

/// Most severe first. Ties keep discovery order.
#[must_use]
pub fn rank_naming(mut findings: Vec<NamingFinding>) -> Vec<NamingFinding> {
    findings.sort_by_key(|f| std::cmp::Reverse(f.severity.rank()));
    findings
}

#[must_use]
pub fn rank_metrics(mut findings: Vec<MetricsFinding>) -> Vec<MetricsFinding> {
    findings.sort_by_key(|f| std::cmp::Reverse(f.severity.rank()));
    findings
}

/// A list cut to a maximum length, remembering how long it was.
#[derive(Debug, Clone, PartialEq)]
pub struct Capped<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> Capped<T> {
    #[must_use]
    pub fn was_cut(&self) -> bool {
        self.total > self.items.len()
    }

    /// Pre-truncation length, or zero when nothing was dropped.
    #[must_use]
    pub fn cut_total(&self) -> usize {
        if self.was_cut() { self.total } else { 0 }
    }
}

/// Keep the first `max` items.
///
/// ```
/// use churnlens_report::cap;
///
/// let capped = cap(vec![1, 2, 3], 2);
/// assert_eq!(capped.items, [1, 2]);
/// assert_eq!(capped.total, 3);
/// assert!(capped.was_cut());
/// ```
#[must_use]
pub fn cap<T>(mut items: Vec<T>, max: usize) -> Capped<T> {
    let total = items.len();
    items.truncate(max);
    Capped { items, total }
}
