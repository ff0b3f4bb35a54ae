//! Inputs and building blocks of change analysis: symbols, metrics
//! snapshots, side-effect categories and request parameters.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::vcs::AnalysisScope;

/// One side-effect category reported by the source parser.
///
/// Declaration order is the canonical reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SideEffect {
    ParamWrite,
    ReceiverWrite,
    GlobalWrite,
    ClosureWrite,
    FieldWrite,
    Io,
    Database,
    Network,
    Throw,
    Channel,
    Async,
    ExternalCall,
    DynamicCall,
    Reflection,
    Uncertain,
    IndirectWrite,
}

impl SideEffect {
    pub const ALL: [SideEffect; 16] = [
        SideEffect::ParamWrite,
        SideEffect::ReceiverWrite,
        SideEffect::GlobalWrite,
        SideEffect::ClosureWrite,
        SideEffect::FieldWrite,
        SideEffect::Io,
        SideEffect::Database,
        SideEffect::Network,
        SideEffect::Throw,
        SideEffect::Channel,
        SideEffect::Async,
        SideEffect::ExternalCall,
        SideEffect::DynamicCall,
        SideEffect::Reflection,
        SideEffect::Uncertain,
        SideEffect::IndirectWrite,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SideEffect::ParamWrite => "param-write",
            SideEffect::ReceiverWrite => "receiver-write",
            SideEffect::GlobalWrite => "global-write",
            SideEffect::ClosureWrite => "closure-write",
            SideEffect::FieldWrite => "field-write",
            SideEffect::Io => "io",
            SideEffect::Database => "database",
            SideEffect::Network => "network",
            SideEffect::Throw => "throw",
            SideEffect::Channel => "channel",
            SideEffect::Async => "async",
            SideEffect::ExternalCall => "external-call",
            SideEffect::DynamicCall => "dynamic-call",
            SideEffect::Reflection => "reflection",
            SideEffect::Uncertain => "uncertain",
            SideEffect::IndirectWrite => "indirect-write",
        }
    }

    /// Effects that make a brand-new function worth flagging.
    ///
    /// Writes through receivers, parameters or fields are routine for
    /// methods and do not count.
    #[must_use]
    pub fn is_significant(self) -> bool {
        matches!(
            self,
            SideEffect::Io | SideEffect::Network | SideEffect::Database | SideEffect::GlobalWrite
        )
    }

    fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

impl fmt::Display for SideEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bit set of [`SideEffect`] categories as handed over by a parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SideEffects(u32);

impl SideEffects {
    pub const NONE: SideEffects = SideEffects(0);

    #[must_use]
    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    #[must_use]
    pub fn bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn with(self, effect: SideEffect) -> Self {
        Self(self.0 | effect.bit())
    }

    #[must_use]
    pub fn contains(self, effect: SideEffect) -> bool {
        self.0 & effect.bit() != 0
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Categories present, in canonical order.
    #[must_use]
    pub fn categories(self) -> Vec<SideEffect> {
        SideEffect::ALL
            .into_iter()
            .filter(|e| self.contains(*e))
            .collect()
    }
}

impl FromIterator<SideEffect> for SideEffects {
    fn from_iter<I: IntoIterator<Item = SideEffect>>(iter: I) -> Self {
        iter.into_iter().fold(SideEffects::NONE, SideEffects::with)
    }
}

/// A symbol as compared by the change analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub symbol_type: String,
    pub file_path: String,
    pub line: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub end_line: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub complexity: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub lines_of_code: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub nesting_depth: u32,
    /// Raw source of the symbol; never serialized.
    #[serde(skip)]
    pub content: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_pure: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub side_effects: Vec<SideEffect>,
}

impl SymbolInfo {
    #[must_use]
    pub fn is_callable(&self) -> bool {
        matches!(self.symbol_type.as_str(), "function" | "method")
    }

    /// `end_line - line`, zero when the span is unknown.
    #[must_use]
    pub fn span_lines(&self) -> u32 {
        self.end_line.saturating_sub(self.line)
    }

    #[must_use]
    pub fn location(&self) -> CodeLocation {
        CodeLocation {
            file_path: self.file_path.clone(),
            start_line: self.line,
            end_line: self.end_line,
            symbol_name: Some(self.name.clone()),
            snippet: None,
        }
    }
}

fn is_zero(v: &u32) -> bool {
    *v == 0
}

/// Metric snapshot of one function, before or after a change.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SymbolMetrics {
    pub complexity: u32,
    pub lines_of_code: u32,
    pub nesting_depth: u32,
    pub is_pure: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub side_effects: Vec<SideEffect>,
}

impl SymbolMetrics {
    #[must_use]
    pub fn of(symbol: &SymbolInfo) -> Self {
        Self {
            complexity: symbol.complexity,
            lines_of_code: symbol.lines_of_code,
            nesting_depth: symbol.nesting_depth,
            is_pure: symbol.is_pure,
            side_effects: symbol.side_effects.clone(),
        }
    }
}

/// A span in a file, optionally tied to a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CodeLocation {
    pub file_path: String,
    pub start_line: u32,
    pub end_line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKind {
    /// Byte-equal after normalization.
    Exact,
    /// Token-set similarity above threshold.
    Structural,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingIssueType {
    CaseMismatch,
    SimilarExists,
    Abbreviation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricsIssueType {
    HighComplexity,
    LongFunction,
    DeepNesting,
    ComplexityIncrease,
    PurityLost,
    ImpureFunction,
}

impl MetricsIssueType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MetricsIssueType::HighComplexity => "high_complexity",
            MetricsIssueType::LongFunction => "long_function",
            MetricsIssueType::DeepNesting => "deep_nesting",
            MetricsIssueType::ComplexityIncrease => "complexity_increase",
            MetricsIssueType::PurityLost => "purity_lost",
            MetricsIssueType::ImpureFunction => "impure_function",
        }
    }
}

/// Detectors a change-analysis request can ask for.
pub const FOCUS_DUPLICATES: &str = "duplicates";
pub const FOCUS_NAMING: &str = "naming";
pub const FOCUS_METRICS: &str = "metrics";

/// Request for change analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    pub scope: AnalysisScope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_ref: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub focus: Vec<String>,
    pub similarity_threshold: f64,
    pub max_findings: usize,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            scope: AnalysisScope::Staged,
            base_ref: None,
            target_ref: None,
            focus: vec![FOCUS_DUPLICATES.to_string(), FOCUS_NAMING.to_string()],
            similarity_threshold: 0.8,
            max_findings: 20,
        }
    }
}

impl AnalysisParams {
    /// Empty focus or `all` enables every detector.
    #[must_use]
    pub fn has_focus(&self, focus: &str) -> bool {
        self.focus.is_empty() || self.focus.iter().any(|f| f == focus || f == "all")
    }

    /// Non-positive thresholds fall back to 0.8.
    #[must_use]
    pub fn effective_threshold(&self) -> f64 {
        if self.similarity_threshold > 0.0 && self.similarity_threshold.is_finite() {
            self.similarity_threshold
        } else {
            0.8
        }
    }

    /// Zero falls back to 20.
    #[must_use]
    pub fn effective_max_findings(&self) -> usize {
        if self.max_findings == 0 {
            20
        } else {
            self.max_findings
        }
    }
}
