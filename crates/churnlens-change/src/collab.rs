//! Collaborators the change analyzer consumes but does not own.

use std::collections::{BTreeMap, HashMap};

use anyhow::Result;
use churnlens_git::GitProvider;
use churnlens_types::{AnalysisParams, ChangedFile, SideEffects, SymbolInfo};

/// The change set and the file contents it refers to.
pub trait ChangeSource {
    fn changed_files(&self, params: &AnalysisParams) -> Result<Vec<ChangedFile>>;

    /// Content of `path` at `reference` (a revision, `WORKING` or `STAGED`).
    fn file_content(&self, reference: &str, path: &str) -> Result<Vec<u8>>;

    fn base_ref(&self, params: &AnalysisParams) -> Result<String>;

    fn target_ref(&self, params: &AnalysisParams) -> String;
}

impl ChangeSource for GitProvider {
    fn changed_files(&self, params: &AnalysisParams) -> Result<Vec<ChangedFile>> {
        Ok(GitProvider::changed_files(self, params)?)
    }

    fn file_content(&self, reference: &str, path: &str) -> Result<Vec<u8>> {
        Ok(GitProvider::file_content(self, reference, path)?)
    }

    fn base_ref(&self, params: &AnalysisParams) -> Result<String> {
        Ok(GitProvider::base_ref(self, params)?)
    }

    fn target_ref(&self, params: &AnalysisParams) -> String {
        GitProvider::target_ref(params)
    }
}

/// A persistent index of the existing codebase.
pub trait SymbolIndex {
    /// Every indexed file path.
    fn files(&self) -> Vec<String>;

    /// Symbols of one indexed file. `content` is filled when the index keeps
    /// symbol bodies; duplicate detection skips symbols without one.
    fn symbols(&self, file_path: &str) -> Vec<SymbolInfo>;
}

/// Static metrics of one function body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FunctionMetrics {
    pub complexity: u32,
    pub lines_of_code: u32,
    pub nesting_depth: u32,
}

/// A symbol span as reported by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedSymbol {
    pub name: String,
    pub symbol_type: String,
    pub line: u32,
    pub end_line: u32,
}

/// What the parser knows about one file.
#[derive(Debug, Clone, Default)]
pub struct ParsedFile {
    pub symbols: Vec<ParsedSymbol>,
    /// Side-effect classification keyed by function name. A function
    /// without an entry was not classified.
    pub side_effects: HashMap<String, SideEffects>,
    /// Function metrics keyed by start line.
    pub metrics: BTreeMap<u32, FunctionMetrics>,
}

/// Parses a changed file. Implementations must honor the caller's deadline
/// themselves; an `Err` skips the file.
pub trait SourceParser {
    fn parse(&self, file_path: &str, content: &[u8]) -> Result<ParsedFile>;
}

impl<S: ChangeSource + ?Sized> ChangeSource for &S {
    fn changed_files(&self, params: &AnalysisParams) -> Result<Vec<ChangedFile>> {
        (**self).changed_files(params)
    }

    fn file_content(&self, reference: &str, path: &str) -> Result<Vec<u8>> {
        (**self).file_content(reference, path)
    }

    fn base_ref(&self, params: &AnalysisParams) -> Result<String> {
        (**self).base_ref(params)
    }

    fn target_ref(&self, params: &AnalysisParams) -> String {
        (**self).target_ref(params)
    }
}

impl<T: SymbolIndex + ?Sized> SymbolIndex for &T {
    fn files(&self) -> Vec<String> {
        (**self).files()
    }

    fn symbols(&self, file_path: &str) -> Vec<SymbolInfo> {
        (**self).symbols(file_path)
    }
}

impl<T: SourceParser + ?Sized> SourceParser for &T {
    fn parse(&self, file_path: &str, content: &[u8]) -> Result<ParsedFile> {
        (**self).parse(file_path, content)
    }
}
