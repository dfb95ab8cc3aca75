//! paths
//!
//! Pure translation between logical document paths and repository paths.
//!
//! # Architecture
//!
//! All storage locations are routed through this module. A *logical path*
//! is the client-visible identifier, relative to the configured base
//! directory and independent of the repository layout. A *repository path*
//! is the path stored in the repository, prefixed with the base directory.
//!
//! **Hard rule:** no code outside this module may concatenate the base
//! directory onto a path. Handlers and the store client always go through
//! [`to_repo_path`] / [`to_logical_path`].
//!
//! # Mapping rules
//!
//! `to_repo_path` applies, in order:
//! 1. Empty or `/` input maps to the base directory itself
//! 2. Leading slashes are stripped
//! 3. Input that already carries the base-directory prefix passes through
//!    unchanged (no double-prefixing)
//! 4. Anything else is prefixed with `<base_dir>/`
//!
//! Rule 3 makes the mapping tolerant of callers that submit repository
//! paths directly. A document whose logical name happens to equal the base
//! directory name is indistinguishable from such input and is treated as
//! already mapped.
//!
//! # Example
//!
//! ```
//! use gitshelf::paths::{to_logical_path, to_repo_path};
//!
//! assert_eq!(to_repo_path("docs", "guide/intro.md"), "docs/guide/intro.md");
//! assert_eq!(to_repo_path("docs", "/guide/intro.md"), "docs/guide/intro.md");
//! assert_eq!(to_repo_path("docs", "docs/guide/intro.md"), "docs/guide/intro.md");
//!
//! assert_eq!(to_logical_path("docs", "docs/guide/intro.md"), "guide/intro.md");
//! ```

/// Base directory used when none is configured.
pub const DEFAULT_BASE_DIR: &str = "docs";

/// Normalize a configured base directory.
///
/// Strips trailing slashes and falls back to [`DEFAULT_BASE_DIR`] when the
/// value is absent or empty. Normalization is idempotent: normalizing an
/// already-normalized value returns it unchanged.
pub fn normalize_base_dir(raw: Option<&str>) -> String {
    let trimmed = raw.unwrap_or(DEFAULT_BASE_DIR).trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_BASE_DIR.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Map a logical path to its repository path.
///
/// `base_dir` must already be normalized (no trailing slash). The result is
/// stable under re-application: `to_repo_path(b, to_repo_path(b, p))` equals
/// `to_repo_path(b, p)` for every `p`.
pub fn to_repo_path(base_dir: &str, logical: &str) -> String {
    let stripped = logical.trim_start_matches('/');
    if stripped.is_empty() {
        return base_dir.to_string();
    }
    if stripped == base_dir || stripped.starts_with(&format!("{}/", base_dir)) {
        return stripped.to_string();
    }
    format!("{}/{}", base_dir, stripped)
}

/// Map a repository path back to its logical path.
///
/// The inverse of [`to_repo_path`]: the base directory itself maps to the
/// empty string, paths under it lose the prefix, and paths outside the base
/// directory pass through unchanged.
pub fn to_logical_path(base_dir: &str, repo_path: &str) -> String {
    if repo_path == base_dir {
        return String::new();
    }
    match repo_path.strip_prefix(&format!("{}/", base_dir)) {
        Some(rest) => rest.to_string(),
        None => repo_path.to_string(),
    }
}

/// Final path segment of a repository or logical path.
///
/// Used to derive a document name when the backing store does not return
/// one (e.g. after a delete).
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
