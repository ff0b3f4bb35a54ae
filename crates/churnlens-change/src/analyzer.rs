//! The change analysis pipeline.

use std::time::Instant;

use anyhow::{Context, Result};
use churnlens_report::{ReportBuilder, SymbolCounts};
use churnlens_types::{
    AnalysisParams, AnalysisReport, ChangedFile, FOCUS_DUPLICATES, FOCUS_METRICS, FOCUS_NAMING,
    FileChangeStatus, SymbolInfo,
};
use tracing::{debug, warn};

use crate::collab::{ChangeSource, ParsedFile, SourceParser, SymbolIndex};
use crate::duplicates::find_duplicates;
use crate::extract::{extract_symbol_content, is_supported_file};
use crate::metrics::{MetricsThresholds, check_metrics};
use crate::naming::NamingChecker;

/// Compares a change set against an existing symbol index.
pub struct ChangeAnalyzer<S, I, P> {
    source: S,
    index: I,
    parser: P,
    naming: NamingChecker,
    thresholds: MetricsThresholds,
}

impl<S: ChangeSource, I: SymbolIndex, P: SourceParser> ChangeAnalyzer<S, I, P> {
    #[must_use]
    pub fn new(source: S, index: I, parser: P) -> Self {
        Self {
            source,
            index,
            parser,
            naming: NamingChecker::default(),
            thresholds: MetricsThresholds::default(),
        }
    }

    #[must_use]
    pub fn with_naming(mut self, naming: NamingChecker) -> Self {
        self.naming = naming;
        self
    }

    #[must_use]
    pub fn with_thresholds(mut self, thresholds: MetricsThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Run the detectors `params.focus` asks for over the change set.
    ///
    /// An empty change set is a well-formed report. Failing to list the
    /// change set or resolve its refs is an error; a file that cannot be
    /// read or parsed is skipped.
    pub fn analyze(&self, params: &AnalysisParams) -> Result<AnalysisReport> {
        let started = Instant::now();
        let files = self
            .source
            .changed_files(params)
            .context("failed to get changed files")?;
        let base_ref = self
            .source
            .base_ref(params)
            .context("failed to resolve base ref")?;
        let target_ref = self.source.target_ref(params);
        let builder = ReportBuilder::started_at(params.scope, base_ref, target_ref.clone(), started)
            .max_findings(params.effective_max_findings());

        if files.is_empty() {
            debug!(scope = %params.scope, "no changed files");
            return Ok(builder.empty());
        }

        let symbols = self.parse_changed_files(&files, &target_ref);
        let existing = self.existing_symbols();
        let threshold = params.effective_threshold();

        let duplicates = if params.has_focus(FOCUS_DUPLICATES) {
            find_duplicates(&symbols, &existing, threshold)
        } else {
            Vec::new()
        };
        let naming = if params.has_focus(FOCUS_NAMING) {
            self.naming.check(&symbols, &existing, threshold)
        } else {
            Vec::new()
        };
        let metrics = if params.has_focus(FOCUS_METRICS) {
            check_metrics(&symbols, &existing, &self.thresholds)
        } else {
            Vec::new()
        };

        debug!(
            files = files.len(),
            symbols = symbols.len(),
            existing = existing.len(),
            "change analysis complete"
        );
        Ok(builder
            .files_changed(files.len())
            .symbols(SymbolCounts::classify(&files, &symbols))
            .build(duplicates, naming, metrics))
    }

    /// Symbols of every changed, supported, readable and parseable file.
    fn parse_changed_files(&self, files: &[ChangedFile], target_ref: &str) -> Vec<SymbolInfo> {
        let mut symbols = Vec::new();
        for file in files {
            if file.status == FileChangeStatus::Deleted || !is_supported_file(&file.path) {
                continue;
            }
            let content = match self.source.file_content(target_ref, &file.path) {
                Ok(content) => content,
                Err(err) => {
                    warn!(path = %file.path, error = %err, "skipping unreadable file");
                    continue;
                }
            };
            let parsed = match self.parser.parse(&file.path, &content) {
                Ok(parsed) => parsed,
                Err(err) => {
                    warn!(path = %file.path, error = %err, "skipping unparseable file");
                    continue;
                }
            };
            symbols.extend(symbols_of(&file.path, &content, parsed));
        }
        symbols
    }

    fn existing_symbols(&self) -> Vec<SymbolInfo> {
        self.index
            .files()
            .into_iter()
            .flat_map(|path| {
                let mut symbols = self.index.symbols(&path);
                for symbol in &mut symbols {
                    symbol.file_path.clone_from(&path);
                }
                symbols
            })
            .collect()
    }
}

/// Join parser spans with their metrics (by start line), side effects (by
/// name) and source text. A function is pure only when the parser
/// classified it and found nothing.
fn symbols_of(path: &str, content: &[u8], parsed: ParsedFile) -> Vec<SymbolInfo> {
    parsed
        .symbols
        .into_iter()
        .map(|sym| {
            let metrics = parsed.metrics.get(&sym.line).copied().unwrap_or_default();
            let effects = parsed.side_effects.get(&sym.name).copied();
            SymbolInfo {
                content: extract_symbol_content(content, sym.line, sym.end_line),
                file_path: path.to_string(),
                line: sym.line,
                end_line: sym.end_line,
                complexity: metrics.complexity,
                lines_of_code: metrics.lines_of_code,
                nesting_depth: metrics.nesting_depth,
                is_pure: effects.is_some_and(|e| e.is_empty()),
                side_effects: effects.map(|e| e.categories()).unwrap_or_default(),
                name: sym.name,
                symbol_type: sym.symbol_type,
            }
        })
        .collect()
}
