//! String similarity metrics in `[0, 1]`.

use serde::{Deserialize, Serialize};

/// A similarity score between two strings; 1.0 means identical.
pub trait SimilarityMetric: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;
}

/// Jaro similarity with the Winkler common-prefix boost (prefix capped at
/// four characters, scaling factor 0.1).
#[derive(Debug, Clone, Copy, Default)]
pub struct JaroWinkler;

/// `1 - edit_distance / longer_length`, over chars.
#[derive(Debug, Clone, Copy, Default)]
pub struct Levenshtein;

impl SimilarityMetric for JaroWinkler {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 1.0;
        }
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }
        let jaro = jaro(&a, &b);
        let prefix = a
            .iter()
            .zip(&b)
            .take_while(|(x, y)| x == y)
            .take(4)
            .count();
        jaro + 0.1 * prefix as f64 * (1.0 - jaro)
    }
}

fn jaro(a: &[char], b: &[char]) -> f64 {
    let window = (a.len().max(b.len()) / 2).saturating_sub(1);
    let mut a_matched = vec![false; a.len()];
    let mut b_matched = vec![false; b.len()];
    let mut matches = 0usize;

    for (i, ca) in a.iter().enumerate() {
        let lo = i.saturating_sub(window);
        let hi = (i + window + 1).min(b.len());
        for j in lo..hi {
            if !b_matched[j] && b[j] == *ca {
                a_matched[i] = true;
                b_matched[j] = true;
                matches += 1;
                break;
            }
        }
    }
    if matches == 0 {
        return 0.0;
    }

    let mut transpositions = 0usize;
    let mut k = 0usize;
    for (i, ca) in a.iter().enumerate() {
        if !a_matched[i] {
            continue;
        }
        while !b_matched[k] {
            k += 1;
        }
        if *ca != b[k] {
            transpositions += 1;
        }
        k += 1;
    }

    let m = matches as f64;
    let t = (transpositions / 2) as f64;
    (m / a.len() as f64 + m / b.len() as f64 + (m - t) / m) / 3.0
}

impl SimilarityMetric for Levenshtein {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        if a == b {
            return 1.0;
        }
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }
        let longest = a.len().max(b.len());
        1.0 - edit_distance(&a, &b) as f64 / longest as f64
    }
}

/// Single-row dynamic-programming edit distance.
fn edit_distance(a: &[char], b: &[char]) -> usize {
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            let next = (row[j] + 1).min(row[j + 1] + 1).min(diag + cost);
            diag = row[j + 1];
            row[j + 1] = next;
        }
    }
    row[b.len()]
}

/// Configurable choice of metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuzzyMetric {
    #[default]
    JaroWinkler,
    Levenshtein,
}

impl FuzzyMetric {
    /// Lenient parse; anything unrecognized is Jaro-Winkler.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "levenshtein" => FuzzyMetric::Levenshtein,
            _ => FuzzyMetric::JaroWinkler,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FuzzyMetric::JaroWinkler => "jaro_winkler",
            FuzzyMetric::Levenshtein => "levenshtein",
        }
    }
}

impl SimilarityMetric for FuzzyMetric {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        match self {
            FuzzyMetric::JaroWinkler => JaroWinkler.similarity(a, b),
            FuzzyMetric::Levenshtein => Levenshtein.similarity(a, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn jaro_winkler_reference_values() {
        assert!(close(JaroWinkler.similarity("martha", "marhta"), 0.961));
        assert!(close(JaroWinkler.similarity("dixon", "dicksonx"), 0.813));
        assert!(close(JaroWinkler.similarity("dwayne", "duane"), 0.84));
    }

    #[test]
    fn identical_and_empty() {
        assert_eq!(JaroWinkler.similarity("", ""), 1.0);
        assert_eq!(JaroWinkler.similarity("abc", ""), 0.0);
        assert_eq!(Levenshtein.similarity("", "abc"), 0.0);
        assert_eq!(Levenshtein.similarity("same", "same"), 1.0);
    }

    #[test]
    fn no_common_chars_is_zero() {
        assert_eq!(JaroWinkler.similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn levenshtein_normalizes_by_longer() {
        assert!(close(Levenshtein.similarity("kitten", "sitting"), 1.0 - 3.0 / 7.0));
        assert_eq!(edit_distance(&['a'], &[]), 1);
    }

    #[test]
    fn fuzzy_metric_parses_leniently() {
        assert_eq!(FuzzyMetric::parse("Levenshtein"), FuzzyMetric::Levenshtein);
        assert_eq!(FuzzyMetric::parse("jaro-winkler"), FuzzyMetric::JaroWinkler);
        assert_eq!(FuzzyMetric::parse("cosine"), FuzzyMetric::JaroWinkler);
        let m: FuzzyMetric = serde_json::from_str("\"levenshtein\"").unwrap();
        assert_eq!(m, FuzzyMetric::Levenshtein);
    }
}
