//! # churnlens-change
//!
//! **Tier 3 (Change Analysis)**
//!
//! Compares the symbols of a change set against an existing symbol index
//! and reports duplicated code, naming inconsistencies and metric
//! regressions.
//!
//! ## What belongs here
//! * The [`ChangeAnalyzer`] pipeline
//! * The collaborator seams: [`ChangeSource`], [`SymbolIndex`], [`SourceParser`]
//! * Duplicate, naming and metrics detectors
//!
//! ## What does NOT belong here
//! * Building the symbol index or parsing source into ASTs
//! * Severity weights and risk scoring (use churnlens-report)
//! * Tokenizing and similarity primitives (use churnlens-near-dup, churnlens-naming)

#![forbid(unsafe_code)]

mod analyzer;
mod collab;
mod duplicates;
mod extract;
mod metrics;
mod naming;

pub use analyzer::ChangeAnalyzer;
pub use collab::{ChangeSource, FunctionMetrics, ParsedFile, ParsedSymbol, SourceParser, SymbolIndex};
pub use duplicates::find_duplicates;
pub use extract::{SUPPORTED_EXTENSIONS, extract_symbol_content, is_supported_file};
pub use metrics::{MetricsThresholds, check_metrics, metrics_severity};
pub use naming::NamingChecker;
