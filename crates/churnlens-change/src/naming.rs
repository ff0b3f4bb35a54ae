//! Naming consistency checks for new symbols.

use churnlens_naming::{
    CaseStyle, FuzzyMetric, Language, NameSplitter, SimilarityMetric, SymbolKind, WordSplitter,
    abbreviations_of, detect_case_style, expansions_of, expected_styles, format_expected_styles,
    is_valid_case_style,
};
use churnlens_report::naming_severity;
use churnlens_types::{FindingSeverity, NamingFinding, NamingIssueType, SymbolInfo};
use rustc_hash::FxHashMap;

/// How many similar names a finding lists.
const MAX_SIMILAR: usize = 3;

/// Runs the three naming checks: language case convention, similar
/// existing names and abbreviation consistency.
pub struct NamingChecker {
    metric: Box<dyn SimilarityMetric>,
    splitter: Box<dyn NameSplitter>,
}

impl Default for NamingChecker {
    fn default() -> Self {
        Self::new(FuzzyMetric::default())
    }
}

impl NamingChecker {
    #[must_use]
    pub fn new(metric: impl SimilarityMetric + 'static) -> Self {
        Self {
            metric: Box::new(metric),
            splitter: Box::new(WordSplitter),
        }
    }

    #[must_use]
    pub fn with_splitter(mut self, splitter: impl NameSplitter + 'static) -> Self {
        self.splitter = Box::new(splitter);
        self
    }

    /// Up to one finding per check per new symbol, in symbol order.
    #[must_use]
    pub fn check(&self, new: &[SymbolInfo], existing: &[SymbolInfo], threshold: f64) -> Vec<NamingFinding> {
        let mut by_type: FxHashMap<&str, Vec<&SymbolInfo>> = FxHashMap::default();
        for symbol in existing {
            by_type.entry(symbol.symbol_type.as_str()).or_default().push(symbol);
        }
        let existing_words: Vec<(&SymbolInfo, Vec<String>)> = existing
            .iter()
            .map(|s| (s, self.splitter.split(&s.name)))
            .collect();

        let mut findings = Vec::new();
        for symbol in new {
            findings.extend(case_style_finding(symbol));
            let same_type = by_type.get(symbol.symbol_type.as_str()).map_or(&[][..], Vec::as_slice);
            findings.extend(self.similar_names_finding(symbol, same_type, threshold));
            findings.extend(self.abbreviation_finding(symbol, &existing_words));
        }
        findings
    }

    /// Case-insensitive fuzzy match against existing names of the same type.
    /// The closest three are listed; severity follows the closest.
    fn similar_names_finding(
        &self,
        symbol: &SymbolInfo,
        candidates: &[&SymbolInfo],
        threshold: f64,
    ) -> Option<NamingFinding> {
        let lower = symbol.name.to_lowercase();
        let mut similar: Vec<(f64, &SymbolInfo)> = candidates
            .iter()
            .filter(|c| c.name != symbol.name)
            .map(|c| (self.metric.similarity(&lower, &c.name.to_lowercase()), *c))
            .filter(|(sim, _)| *sim >= threshold)
            .collect();
        if similar.is_empty() {
            return None;
        }
        similar.sort_by(|a, b| b.0.total_cmp(&a.0));
        similar.truncate(MAX_SIMILAR);

        let best = similar[0].0;
        let names: Vec<&str> = similar.iter().map(|(_, s)| s.name.as_str()).collect();
        Some(NamingFinding {
            severity: naming_severity(NamingIssueType::SimilarExists, best),
            description: describe(symbol),
            new_symbol: symbol.clone(),
            similar_names: similar.iter().map(|(_, s)| (*s).clone()).collect(),
            issue_type: NamingIssueType::SimilarExists,
            issue: format!("Similar names already exist: {}", names.join(", ")),
            suggestion: format!(
                "Consider using existing name '{}' or differentiate more clearly",
                names[0]
            ),
        })
    }

    /// First word of the new name whose abbreviation (or full form) appears
    /// in the other form somewhere in the codebase.
    fn abbreviation_finding(
        &self,
        symbol: &SymbolInfo,
        existing: &[(&SymbolInfo, Vec<String>)],
    ) -> Option<NamingFinding> {
        for word in self.splitter.split(&symbol.name) {
            if let Some(full_forms) = expansions_of(&word)
                && let Some((other, used)) = find_word(existing, |w| full_forms.iter().any(|f| *f == w))
            {
                return Some(abbreviation(
                    symbol,
                    other,
                    format!("Uses abbreviation '{word}' but codebase uses '{used}'"),
                    &word,
                    used,
                ));
            }
            let short_forms = abbreviations_of(&word);
            if short_forms.is_empty() {
                continue;
            }
            if let Some((other, used)) = find_word(existing, |w| short_forms.iter().any(|f| *f == w)) {
                return Some(abbreviation(
                    symbol,
                    other,
                    format!("Uses full form '{word}' but codebase uses abbreviation '{used}'"),
                    &word,
                    used,
                ));
            }
        }
        None
    }
}

fn find_word<'a>(
    existing: &'a [(&'a SymbolInfo, Vec<String>)],
    wanted: impl Fn(&str) -> bool,
) -> Option<(&'a SymbolInfo, &'a str)> {
    existing.iter().find_map(|(symbol, words)| {
        words
            .iter()
            .find(|w| wanted(w.as_str()))
            .map(|w| (*symbol, w.as_str()))
    })
}

fn abbreviation(symbol: &SymbolInfo, other: &SymbolInfo, issue: String, word: &str, used: &str) -> NamingFinding {
    NamingFinding {
        severity: FindingSeverity::Info,
        description: describe(symbol),
        new_symbol: symbol.clone(),
        similar_names: vec![other.clone()],
        issue_type: NamingIssueType::Abbreviation,
        issue,
        suggestion: format!("Consider using '{used}' instead of '{word}' for consistency"),
    }
}

/// A name breaking its language's convention for the symbol kind. Unknown
/// languages, kinds and styles are never flagged.
fn case_style_finding(symbol: &SymbolInfo) -> Option<NamingFinding> {
    let lang = Language::from_path(&symbol.file_path);
    let kind = SymbolKind::from_symbol_type(&symbol.symbol_type);
    if lang == Language::Unknown || kind == SymbolKind::Unknown {
        return None;
    }
    let style = detect_case_style(&symbol.name);
    if style == CaseStyle::Unknown || is_valid_case_style(lang, kind, style) {
        return None;
    }
    let expected = expected_styles(lang, kind).filter(|s| !s.is_empty())?;
    let expected = format_expected_styles(expected);
    Some(NamingFinding {
        severity: naming_severity(NamingIssueType::CaseMismatch, 0.0),
        description: describe(symbol),
        new_symbol: symbol.clone(),
        similar_names: Vec::new(),
        issue_type: NamingIssueType::CaseMismatch,
        issue: format!(
            "Uses {style} but {lang} convention for {} is {expected}",
            symbol.symbol_type
        ),
        suggestion: format!("Consider renaming to use {expected} style to match {lang} conventions"),
    })
}

fn describe(symbol: &SymbolInfo) -> String {
    format!("Naming inconsistency: {}", symbol.name)
}
