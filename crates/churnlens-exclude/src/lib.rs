//! # churnlens-exclude
//!
//! **Tier 1 (Churn Filter)**
//!
//! Decides whether a repository path counts toward churn analysis.
//!
//! ## Precedence
//! 1. Non-empty include patterns: the path must match one of them.
//! 2. Custom exclude patterns always win.
//! 3. `skip_default_exclusions` stops here.
//! 4. Exact default filenames (lock files, changelogs).
//! 5. Default glob set (docs, build output, binaries, media, vendored trees).
//!
//! Matching is case-insensitive and slash-direction-insensitive. A pattern
//! is tried against the full path and the base name; `prefix/*` also
//! matches `prefix/` at any depth, and `prefix**` matches any path that
//! starts with `prefix`.

#![forbid(unsafe_code)]

pub mod defaults;

use std::sync::LazyLock;

use churnlens_path::{base_name, normalize_rel_path, normalize_slashes};
use globset::{GlobBuilder, GlobMatcher};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub use defaults::{EXCLUDED_EXACT_FILES, EXCLUDED_FILE_PATTERNS};

/// User-facing filter settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChurnFilterConfig {
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub skip_default_exclusions: bool,
}

impl ChurnFilterConfig {
    /// Add an exclude pattern unless it is empty or already present after
    /// normalization. Returns `true` when inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use churnlens_exclude::ChurnFilterConfig;
    ///
    /// let mut config = ChurnFilterConfig::default();
    /// assert!(config.add_exclude_pattern("gen/*"));
    /// assert!(!config.add_exclude_pattern("./gen/*"));
    /// assert!(!config.add_exclude_pattern(""));
    /// ```
    pub fn add_exclude_pattern(&mut self, pattern: &str) -> bool {
        if pattern.is_empty() {
            return false;
        }
        let normalized = normalize_rel_path(pattern);
        if self
            .exclude_patterns
            .iter()
            .any(|p| normalize_rel_path(p) == normalized)
        {
            return false;
        }
        self.exclude_patterns.push(pattern.to_string());
        true
    }
}

/// One lowercased pattern with its precompiled glob.
#[derive(Debug, Clone)]
struct PathPattern {
    raw: String,
    glob: Option<GlobMatcher>,
}

impl PathPattern {
    fn compile(pattern: &str) -> Self {
        let raw = pattern.to_lowercase();
        let glob = if raw.contains('*') {
            match GlobBuilder::new(&raw).literal_separator(true).build() {
                Ok(glob) => Some(glob.compile_matcher()),
                Err(err) => {
                    warn!(pattern = %pattern, error = %err, "invalid churn glob pattern");
                    None
                }
            }
        } else {
            None
        };
        Self { raw, glob }
    }

    fn matches(&self, lower_path: &str, lower_base: &str) -> bool {
        if !self.raw.contains('*') {
            return lower_base == self.raw || lower_path == self.raw;
        }
        if let Some(glob) = &self.glob {
            if glob.is_match(lower_path) || glob.is_match(lower_base) {
                return true;
            }
        }
        if let Some(prefix) = self.raw.strip_suffix("/*") {
            if lower_path.starts_with(&format!("{prefix}/"))
                || lower_path.contains(&format!("/{prefix}/"))
            {
                return true;
            }
        }
        if let Some((prefix, _)) = self.raw.split_once("**") {
            if !prefix.is_empty() && lower_path.starts_with(prefix) {
                return true;
            }
        }
        false
    }
}

/// A compiled churn filter.
#[derive(Debug, Clone)]
pub struct ChurnFilter {
    include: Vec<PathPattern>,
    exclude: Vec<PathPattern>,
    skip_defaults: bool,
}

static DEFAULT_PATTERNS: LazyLock<Vec<PathPattern>> = LazyLock::new(|| {
    EXCLUDED_FILE_PATTERNS
        .iter()
        .map(|p| PathPattern::compile(p))
        .collect()
});

static DEFAULT_FILTER: LazyLock<ChurnFilter> =
    LazyLock::new(|| ChurnFilter::new(&ChurnFilterConfig::default()));

impl ChurnFilter {
    #[must_use]
    pub fn new(config: &ChurnFilterConfig) -> Self {
        Self {
            include: config
                .include_patterns
                .iter()
                .map(|p| PathPattern::compile(p))
                .collect(),
            exclude: config
                .exclude_patterns
                .iter()
                .map(|p| PathPattern::compile(p))
                .collect(),
            skip_defaults: config.skip_default_exclusions,
        }
    }

    /// The filter with no custom patterns.
    #[must_use]
    pub fn default_filter() -> &'static ChurnFilter {
        &DEFAULT_FILTER
    }

    /// `true` when `path` should not count toward churn.
    #[must_use]
    pub fn should_exclude(&self, path: &str) -> bool {
        let normalized = normalize_slashes(path);
        let lower_path = normalized.to_lowercase();
        let base = base_name(&normalized);
        let lower_base = base.to_lowercase();

        if !self.include.is_empty()
            && !self
                .include
                .iter()
                .any(|p| p.matches(&lower_path, &lower_base))
        {
            return true;
        }

        if self
            .exclude
            .iter()
            .any(|p| p.matches(&lower_path, &lower_base))
        {
            return true;
        }

        if self.skip_defaults {
            return false;
        }

        if EXCLUDED_EXACT_FILES.contains(&base) {
            return true;
        }

        DEFAULT_PATTERNS
            .iter()
            .any(|p| p.matches(&lower_path, &lower_base))
    }
}

/// Default-policy check.
///
/// # Examples
///
/// ```
/// use churnlens_exclude::should_exclude_from_churn;
///
/// assert!(should_exclude_from_churn("vendor/pkg/file.go"));
/// assert!(should_exclude_from_churn(r"vendor\pkg\file.go"));
/// assert!(!should_exclude_from_churn("internal/server/handler.go"));
/// ```
#[must_use]
pub fn should_exclude_from_churn(path: &str) -> bool {
    DEFAULT_FILTER.should_exclude(path)
}

/// One-shot check with custom settings. Prefer building a [`ChurnFilter`]
/// once when checking many paths.
#[must_use]
pub fn should_exclude_with_config(path: &str, config: &ChurnFilterConfig) -> bool {
    ChurnFilter::new(config).should_exclude(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_does_not_cross_directories() {
        let pattern = PathPattern::compile("*.md");
        assert!(pattern.matches("docs/readme.md", "readme.md"));
        let scoped = PathPattern::compile("src/*.rs");
        assert!(scoped.matches("src/lib.rs", "lib.rs"));
        assert!(!scoped.matches("src/nested/lib.rs", "lib.rs"));
    }

    #[test]
    fn dir_pattern_matches_at_any_depth() {
        let pattern = PathPattern::compile("node_modules/*");
        assert!(pattern.matches("web/node_modules/react/index.js", "index.js"));
        assert!(!pattern.matches("web/my_node_modules/x.js", "x.js"));
    }

    #[test]
    fn double_star_prefix_match() {
        let pattern = PathPattern::compile("generated/**");
        assert!(pattern.matches("generated/a/b/c.go", "c.go"));
        assert!(!pattern.matches("src/generated/c.go", "c.go"));
    }

    #[test]
    fn literal_pattern_matches_base_or_full_path() {
        let pattern = PathPattern::compile("Makefile");
        assert!(pattern.matches("build/makefile", "makefile"));
        let full = PathPattern::compile("cmd/tool/main.go");
        assert!(full.matches("cmd/tool/main.go", "main.go"));
        assert!(!full.matches("other/main.go", "main.go"));
    }

    #[test]
    fn invalid_glob_still_tries_structural_rules() {
        let pattern = PathPattern::compile("[gen/*");
        assert!(pattern.glob.is_none());
        assert!(!pattern.matches("src/lib.rs", "lib.rs"));
    }

    #[test]
    fn exact_filename_set_is_case_sensitive() {
        let filter = ChurnFilter::new(&ChurnFilterConfig {
            skip_default_exclusions: false,
            ..ChurnFilterConfig::default()
        });
        assert!(filter.should_exclude("Cargo.lock"));
        // the default glob set still catches the lowercase spelling
        assert!(filter.should_exclude("cargo.lock"));
    }
}
