//! # churnlens-cache
//!
//! **Tier 2 (Caching)**
//!
//! In-memory TTL cache for frequency analysis results, safe to share across
//! threads.
//!
//! * Reads and writes go through a sharded [`DashMap`]; no global lock.
//! * Expired entries are dropped lazily on read and by a background sweep.
//! * The sweep runs at most once per cleanup period, on its own thread. The
//!   throttle is a small [`parking_lot::Mutex`] separate from the map.
//! * When live entries exceed capacity the sweep evicts the oldest-created.
//!
//! [`FrequencyCache::get_or_compute`] is not single-flight: concurrent
//! misses on one key each run the compute closure and the last write wins.

#![forbid(unsafe_code)]

mod keys;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use churnlens_types::{ChangeFrequencyReport, FileChangeFrequency, TimeWindow};
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, trace, warn};

pub use keys::{cache_key, cache_key_file, cache_key_pattern, cache_key_symbol};

pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);
pub const DEFAULT_MAX_ENTRIES: usize = 1000;
pub const DEFAULT_CLEANUP_PERIOD: Duration = Duration::from_secs(60);

/// Values the cache knows how to hold.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    FileFrequency(Arc<FileChangeFrequency>),
    Report(Arc<ChangeFrequencyReport>),
}

impl From<FileChangeFrequency> for CachedValue {
    fn from(v: FileChangeFrequency) -> Self {
        CachedValue::FileFrequency(Arc::new(v))
    }
}

impl From<ChangeFrequencyReport> for CachedValue {
    fn from(v: ChangeFrequencyReport) -> Self {
        CachedValue::Report(Arc::new(v))
    }
}

/// Sizing and expiry knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub max_entries: usize,
    pub cleanup_period: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            max_entries: DEFAULT_MAX_ENTRIES,
            cleanup_period: DEFAULT_CLEANUP_PERIOD,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: CachedValue,
    created_at: Instant,
    /// `None` when the TTL reaches past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now > at)
    }
}

/// Counters and size at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub entry_count: usize,
    pub ttl_seconds: u64,
}

type EntryMap = DashMap<String, Entry>;

#[derive(Debug)]
pub struct FrequencyCache {
    entries: Arc<EntryMap>,
    config: CacheConfig,
    hits: AtomicU64,
    misses: AtomicU64,
    last_cleanup: Mutex<Instant>,
}

impl Default for FrequencyCache {
    fn default() -> Self {
        Self::with_config(CacheConfig::default())
    }
}

impl FrequencyCache {
    /// A zero TTL falls back to ten minutes.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self::with_config(CacheConfig {
            ttl,
            ..CacheConfig::default()
        })
    }

    #[must_use]
    pub fn with_config(mut config: CacheConfig) -> Self {
        if config.ttl.is_zero() {
            config.ttl = DEFAULT_TTL;
        }
        Self {
            entries: Arc::new(DashMap::new()),
            config,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            last_cleanup: Mutex::new(Instant::now()),
        }
    }

    #[must_use]
    pub fn config(&self) -> CacheConfig {
        self.config
    }

    /// A live entry, or `None`. Expired entries are removed on the way.
    pub fn get(&self, key: &str) -> Option<CachedValue> {
        let now = Instant::now();
        let found = self
            .entries
            .get(key)
            .map(|e| (!e.is_expired(now)).then(|| e.value.clone()));
        match found {
            Some(Some(value)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                trace!(key, "cache hit");
                Some(value)
            }
            Some(None) => {
                self.entries.remove_if(key, |_, e| e.is_expired(now));
                self.misses.fetch_add(1, Ordering::Relaxed);
                trace!(key, "cache miss (expired)");
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                trace!(key, "cache miss");
                None
            }
        }
    }

    /// Store with the default TTL, replacing any previous entry.
    pub fn set(&self, key: impl Into<String>, value: impl Into<CachedValue>) {
        self.set_with_ttl(key, value, self.config.ttl);
    }

    pub fn set_with_ttl(&self, key: impl Into<String>, value: impl Into<CachedValue>, ttl: Duration) {
        self.maybe_cleanup();
        let now = Instant::now();
        self.entries.insert(
            key.into(),
            Entry {
                value: value.into(),
                created_at: now,
                expires_at: now.checked_add(ttl),
            },
        );
    }

    pub fn delete(&self, key: &str) {
        self.entries.remove(key);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of stored entries, expired or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        CacheStats {
            hits,
            misses,
            hit_rate: if total == 0 { 0.0 } else { hits as f64 / total as f64 },
            entry_count: self.entries.len(),
            ttl_seconds: self.config.ttl.as_secs(),
        }
    }

    #[must_use]
    pub fn get_file_frequency(&self, file_path: &str, window: TimeWindow) -> Option<Arc<FileChangeFrequency>> {
        match self.get(&cache_key_file(file_path, window))? {
            CachedValue::FileFrequency(freq) => Some(freq),
            CachedValue::Report(_) => None,
        }
    }

    pub fn set_file_frequency(&self, file_path: &str, window: TimeWindow, freq: FileChangeFrequency) {
        self.set(cache_key_file(file_path, window), freq);
    }

    #[must_use]
    pub fn get_report(&self, pattern: &str, window: TimeWindow) -> Option<Arc<ChangeFrequencyReport>> {
        match self.get(&cache_key_pattern(pattern, window))? {
            CachedValue::Report(report) => Some(report),
            CachedValue::FileFrequency(_) => None,
        }
    }

    pub fn set_report(&self, pattern: &str, window: TimeWindow, report: ChangeFrequencyReport) {
        self.set(cache_key_pattern(pattern, window), report);
    }

    /// Drop the file-granularity entries of `file_path` for every window,
    /// along with reports selected by that path.
    pub fn invalidate_file(&self, file_path: &str) {
        for window in TimeWindow::ALL {
            self.delete(&cache_key_file(file_path, window));
        }
        self.invalidate_pattern(file_path);
    }

    /// Drop the reports selected by `pattern` for every window, including
    /// those stored under `pattern?<settings>`.
    pub fn invalidate_pattern(&self, pattern: &str) {
        for window in TimeWindow::ALL {
            self.delete(&cache_key_pattern(pattern, window));
        }
        let scoped = format!("freq:pattern:{pattern}?");
        self.entries.retain(|key, _| !key.starts_with(&scoped));
    }

    /// Return the cached value or compute, store and return a fresh one.
    /// Errors are returned as-is and nothing is stored.
    pub fn get_or_compute<E>(
        &self,
        key: &str,
        compute: impl FnOnce() -> Result<CachedValue, E>,
    ) -> Result<CachedValue, E> {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }
        let value = compute()?;
        self.set(key, value.clone());
        Ok(value)
    }

    /// Pre-populate.
    pub fn warm(&self, entries: impl IntoIterator<Item = (String, CachedValue)>) {
        for (key, value) in entries {
            self.set(key, value);
        }
    }

    /// Run a sweep on the calling thread, ignoring the throttle.
    pub fn cleanup_now(&self) {
        sweep(&self.entries, self.config.max_entries);
    }

    fn maybe_cleanup(&self) {
        {
            let mut last = self.last_cleanup.lock();
            if last.elapsed() < self.config.cleanup_period {
                return;
            }
            *last = Instant::now();
        }
        let entries = Arc::clone(&self.entries);
        let max_entries = self.config.max_entries;
        let spawned = thread::Builder::new()
            .name("churnlens-cache-sweep".into())
            .spawn(move || sweep(&entries, max_entries));
        if let Err(err) = spawned {
            warn!(%err, "cache sweep thread not started");
        }
    }
}

/// Remove expired entries, then evict oldest-created down to `max_entries`.
fn sweep(entries: &EntryMap, max_entries: usize) {
    let now = Instant::now();
    let before = entries.len();
    entries.retain(|_, e| !e.is_expired(now));
    let live = entries.len();

    let mut evicted = 0;
    if live > max_entries {
        let mut by_age: Vec<(String, Instant)> = entries
            .iter()
            .map(|e| (e.key().clone(), e.value().created_at))
            .collect();
        by_age.sort_by_key(|(_, created)| *created);
        for (key, _) in by_age.into_iter().take(live - max_entries) {
            entries.remove(&key);
            evicted += 1;
        }
    }
    debug!(expired = before - live, evicted, remaining = entries.len(), "cache sweep");
}
