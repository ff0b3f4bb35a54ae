use churnlens_path::extension_lower;

/// Extensions the change analyzer parses, lowercase with the dot.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    ".go", ".js", ".jsx", ".ts", ".tsx", ".py", ".rs", ".java", ".c", ".cpp", ".cc", ".h", ".hpp",
    ".cs", ".php", ".rb", ".swift", ".kt", ".scala", ".zig", ".vue", ".svelte",
];

/// ```
/// use churnlens_change::is_supported_file;
///
/// assert!(is_supported_file("web/App.TSX"));
/// assert!(!is_supported_file("README.md"));
/// ```
#[must_use]
pub fn is_supported_file(path: &str) -> bool {
    SUPPORTED_EXTENSIONS.contains(&extension_lower(path).as_str())
}

/// Lines `start..=end` (1-based) of `content`, without the final newline.
///
/// An `end` before `start` yields the start line alone; an `end` past the
/// last line runs to the end of the content. Empty when `start` is zero or
/// beyond the content.
#[must_use]
pub fn extract_symbol_content(content: &[u8], start: u32, end: u32) -> String {
    if start == 0 || content.is_empty() {
        return String::new();
    }
    let end = end.max(start);
    let text = String::from_utf8_lossy(content);
    let lines: Vec<&str> = text
        .split('\n')
        .skip(start as usize - 1)
        .take((end - start) as usize + 1)
        .collect();
    if lines.is_empty() {
        return String::new();
    }
    lines.join("\n")
}
