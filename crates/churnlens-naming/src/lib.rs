//! # churnlens-naming
//!
//! **Tier 2 (Naming Vocabulary)**
//!
//! Everything the change analyzer needs to judge a symbol name, minus the
//! judging itself: which case style a name uses, which styles a language
//! expects for a symbol kind, which words are abbreviations of which, how
//! alike two names are, and how a name splits into words.
//!
//! ## What belongs here
//! * [`detect_case_style`] and [`CaseStyle`]
//! * The static per-language convention table ([`expected_styles`])
//! * The abbreviation table ([`expansions_of`], [`abbreviations_of`])
//! * [`SimilarityMetric`] implementations and the [`NameSplitter`] seam
//!
//! ## What does NOT belong here
//! * Producing findings (use churnlens-change)
//! * Reading source files or symbol indexes

#![forbid(unsafe_code)]

mod abbrev;
mod case;
mod convention;
mod similarity;
mod split;

pub use abbrev::{ABBREVIATIONS, abbreviations_of, expansions_of};
pub use case::{CaseStyle, detect_case_style};
pub use convention::{
    Language, SymbolKind, expected_styles, format_expected_styles, is_valid_case_style,
};
pub use similarity::{FuzzyMetric, JaroWinkler, Levenshtein, SimilarityMetric};
pub use split::{NameSplitter, WordSplitter};
