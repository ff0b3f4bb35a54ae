//! Single-responsibility module-key derivation for ownership grouping.
//!
//! A module is the leading directories of a file, at most
//! [`DEFAULT_MODULE_DEPTH`] of them. Files at the repository root share the
//! [`ROOT_MODULE`] key.

#![forbid(unsafe_code)]

use churnlens_path::segments;

/// Key shared by every root-level file.
pub const ROOT_MODULE: &str = ".";

/// Directory depth used for ownership grouping.
pub const DEFAULT_MODULE_DEPTH: usize = 2;

/// Compute the ownership module of `path` using the default depth.
///
/// # Examples
///
/// ```
/// use churnlens_module_key::module_key;
///
/// assert_eq!(module_key("internal/git/provider.go"), "internal/git");
/// assert_eq!(module_key("internal/git/sub/deep.go"), "internal/git");
/// assert_eq!(module_key("cmd/main.go"), "cmd");
/// assert_eq!(module_key("go.mod"), ".");
/// ```
#[must_use]
pub fn module_key(path: &str) -> String {
    module_key_with_depth(path, DEFAULT_MODULE_DEPTH)
}

/// Compute the module of `path` keeping up to `depth` directory segments.
///
/// A depth of zero is treated as one. Either separator is accepted; the key
/// is always `/`-joined.
#[must_use]
pub fn module_key_with_depth(path: &str, depth: usize) -> String {
    let parts = segments(path);
    if parts.len() <= 1 {
        return ROOT_MODULE.to_string();
    }
    let dirs = &parts[..parts.len() - 1];
    let keep = depth.max(1).min(dirs.len());
    dirs[..keep].join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_file_maps_to_dot() {
        assert_eq!(module_key("README.md"), ".");
        assert_eq!(module_key(""), ".");
    }

    #[test]
    fn backslash_paths_group_like_forward_slash() {
        assert_eq!(module_key(r"pkg\server\handler.go"), "pkg/server");
    }

    #[test]
    fn zero_depth_behaves_as_one() {
        assert_eq!(module_key_with_depth("a/b/c.rs", 0), "a");
    }
}
