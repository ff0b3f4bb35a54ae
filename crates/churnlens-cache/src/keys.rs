//! Deterministic cache keys.

use churnlens_types::{Granularity, TimeWindow};

/// `freq:<path>:<window>:<granularity>`
///
/// ```
/// use churnlens_cache::cache_key;
/// use churnlens_types::{Granularity, TimeWindow};
///
/// assert_eq!(cache_key("src/a.go", TimeWindow::Days7, Granularity::File), "freq:src/a.go:7d:file");
/// ```
#[must_use]
pub fn cache_key(file_path: &str, window: TimeWindow, granularity: Granularity) -> String {
    format!("freq:{file_path}:{}:{}", window.as_str(), granularity.as_str())
}

/// File-granularity key for `file_path`.
#[must_use]
pub fn cache_key_file(file_path: &str, window: TimeWindow) -> String {
    cache_key(file_path, window, Granularity::File)
}

/// `freq:<path>:<symbol>:<window>:symbol`
#[must_use]
pub fn cache_key_symbol(file_path: &str, symbol_name: &str, window: TimeWindow) -> String {
    format!("freq:{file_path}:{symbol_name}:{}:symbol", window.as_str())
}

/// `freq:pattern:<pattern>:<window>`
#[must_use]
pub fn cache_key_pattern(pattern: &str, window: TimeWindow) -> String {
    format!("freq:pattern:{pattern}:{}", window.as_str())
}
