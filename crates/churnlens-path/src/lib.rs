//! Single-responsibility helpers for repository-relative paths.
//!
//! Git reports paths with `/`, but callers (and Windows checkouts) hand us
//! `\`-separated paths. Everything downstream matches on the forward-slash
//! form produced here.

#![forbid(unsafe_code)]

/// Normalize path separators to `/`.
///
/// # Examples
///
/// ```
/// use churnlens_path::normalize_slashes;
///
/// assert_eq!(normalize_slashes(r"vendor\pkg\file.go"), "vendor/pkg/file.go");
/// assert_eq!(normalize_slashes("already/fine"), "already/fine");
/// ```
#[must_use]
pub fn normalize_slashes(path: &str) -> String {
    if path.contains('\\') {
        path.replace('\\', "/")
    } else {
        path.to_string()
    }
}

/// Normalize a relative path for matching:
/// - converts `\` to `/`
/// - strips one leading `./`
///
/// # Examples
///
/// ```
/// use churnlens_path::normalize_rel_path;
///
/// assert_eq!(normalize_rel_path("./src/main.rs"), "src/main.rs");
/// assert_eq!(normalize_rel_path(r".\src\main.rs"), "src/main.rs");
/// ```
#[must_use]
pub fn normalize_rel_path(path: &str) -> String {
    let normalized = normalize_slashes(path);
    match normalized.strip_prefix("./") {
        Some(stripped) => stripped.to_string(),
        None => normalized,
    }
}

/// Final path component, accepting either separator.
///
/// Trailing separators are ignored, so `"docs/"` yields `"docs"`.
///
/// # Examples
///
/// ```
/// use churnlens_path::base_name;
///
/// assert_eq!(base_name("internal/server/handler.go"), "handler.go");
/// assert_eq!(base_name(r"vendor\pkg\file.go"), "file.go");
/// assert_eq!(base_name("README.md"), "README.md");
/// ```
#[must_use]
pub fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    match trimmed.rfind(['/', '\\']) {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Lowercased extension including the leading dot, or `""` when absent.
///
/// Dotfiles such as `.gitignore` have no extension.
///
/// # Examples
///
/// ```
/// use churnlens_path::extension_lower;
///
/// assert_eq!(extension_lower("src/App.TSX"), ".tsx");
/// assert_eq!(extension_lower("Makefile"), "");
/// assert_eq!(extension_lower(".gitignore"), "");
/// ```
#[must_use]
pub fn extension_lower(path: &str) -> String {
    let name = base_name(path);
    match name.rfind('.') {
        Some(0) | None => String::new(),
        Some(idx) => name[idx..].to_ascii_lowercase(),
    }
}

/// Split a path into its non-empty segments, accepting either separator.
#[must_use]
pub fn segments(path: &str) -> Vec<&str> {
    path.split(['/', '\\']).filter(|s| !s.is_empty()).collect()
}
