//! # churnlens-near-dup
//!
//! **Tier 2 (Similarity)**
//!
//! Comparison primitives for symbol bodies:
//! 1. Normalize: trim lines, drop blank lines and `//` / `#` line comments
//! 2. Fingerprint the normalized text with FxHash for exact-match bucketing
//! 3. Tokenize on punctuation and whitespace, keeping punctuation as tokens
//! 4. Score two bodies by Jaccard similarity of their token sets
//!
//! ## What does NOT belong here
//! * Deciding which symbols to compare or how severe a match is
//!   (use churnlens-change / churnlens-report)

#![forbid(unsafe_code)]

use std::hash::{Hash, Hasher};

use rustc_hash::{FxHashMap, FxHashSet, FxHasher};

/// Characters that end a token. Non-whitespace delimiters are tokens too.
const DELIMITERS: &str = "(){}[];,.<>+-*/=!&|^~?:";

/// Default similarity at which two bodies count as structural duplicates.
pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// Trimmed, non-blank, non-comment lines joined with `\n`.
///
/// ```
/// use churnlens_near_dup::normalize_content;
///
/// let body = "  fn a() {\n\n    // note\n    # also\n    1\n  }\n";
/// assert_eq!(normalize_content(body), "fn a() {\n1\n}");
/// ```
#[must_use]
pub fn normalize_content(content: &str) -> String {
    content
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("//") && !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

fn is_delimiter(ch: char) -> bool {
    DELIMITERS.contains(ch) || is_whitespace(ch)
}

/// Split on delimiters. Whitespace is dropped; every other delimiter is
/// emitted as a one-character token.
///
/// ```
/// use churnlens_near_dup::tokenize;
///
/// assert_eq!(tokenize("f(a, b)"), ["f", "(", "a", ",", "b", ")"]);
/// ```
#[must_use]
pub fn tokenize(content: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    for (i, ch) in content.char_indices() {
        if !is_delimiter(ch) {
            if start.is_none() {
                start = Some(i);
            }
            continue;
        }
        if let Some(s) = start.take() {
            tokens.push(&content[s..i]);
        }
        if !is_whitespace(ch) {
            tokens.push(&content[i..i + ch.len_utf8()]);
        }
    }
    if let Some(s) = start {
        tokens.push(&content[s..]);
    }
    tokens
}

/// Distinct tokens of `content`.
#[must_use]
pub fn token_set(content: &str) -> FxHashSet<&str> {
    tokenize(content).into_iter().collect()
}

/// `|a ∩ b| / |a ∪ b|`; `0.0` when either side is empty.
#[must_use]
pub fn jaccard<T: Eq + Hash>(a: &FxHashSet<T>, b: &FxHashSet<T>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.iter().filter(|t| b.contains(*t)).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// Jaccard similarity of the two bodies' token sets.
#[must_use]
pub fn structural_similarity(a: &str, b: &str) -> f64 {
    jaccard(&token_set(a), &token_set(b))
}

/// FxHash of already-normalized content.
#[must_use]
pub fn fingerprint(normalized: &str) -> u64 {
    let mut hasher = FxHasher::default();
    normalized.hash(&mut hasher);
    hasher.finish()
}

/// A body prepared once for repeated comparison.
#[derive(Debug, Clone)]
pub struct PreparedBody {
    pub normalized: String,
    pub fingerprint: u64,
    tokens: FxHashSet<String>,
}

impl PreparedBody {
    #[must_use]
    pub fn new(content: &str) -> Self {
        let normalized = normalize_content(content);
        let fingerprint = fingerprint(&normalized);
        let tokens = tokenize(content).into_iter().map(str::to_string).collect();
        Self {
            normalized,
            fingerprint,
            tokens,
        }
    }

    /// Normalized texts are identical.
    #[must_use]
    pub fn is_exact(&self, other: &PreparedBody) -> bool {
        self.fingerprint == other.fingerprint && self.normalized == other.normalized
    }

    #[must_use]
    pub fn similarity(&self, other: &PreparedBody) -> f64 {
        jaccard(&self.tokens, &other.tokens)
    }
}

/// Prepared bodies bucketed by fingerprint, addressed by caller index.
#[derive(Debug, Default)]
pub struct BodyIndex {
    bodies: Vec<Option<PreparedBody>>,
    by_fingerprint: FxHashMap<u64, Vec<usize>>,
}

impl BodyIndex {
    /// Index `contents` by position; empty contents are kept as gaps.
    #[must_use]
    pub fn build<'a>(contents: impl IntoIterator<Item = &'a str>) -> Self {
        let mut index = Self::default();
        for (i, content) in contents.into_iter().enumerate() {
            if content.is_empty() {
                index.bodies.push(None);
                continue;
            }
            let body = PreparedBody::new(content);
            index.by_fingerprint.entry(body.fingerprint).or_default().push(i);
            index.bodies.push(Some(body));
        }
        index
    }

    #[must_use]
    pub fn get(&self, i: usize) -> Option<&PreparedBody> {
        self.bodies.get(i).and_then(Option::as_ref)
    }

    /// Positions whose normalized text equals `body`'s, in insertion order.
    #[must_use]
    pub fn exact_matches(&self, body: &PreparedBody) -> Vec<usize> {
        self.by_fingerprint
            .get(&body.fingerprint)
            .into_iter()
            .flatten()
            .copied()
            .filter(|&i| self.get(i).is_some_and(|b| b.normalized == body.normalized))
            .collect()
    }

    /// Every non-empty position with its prepared body.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &PreparedBody)> {
        self.bodies
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.as_ref().map(|b| (i, b)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}
