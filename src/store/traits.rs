//! store::traits
//!
//! Content-store trait definition and shared value types.
//!
//! # Design
//!
//! The `ContentStore` trait is async because every operation involves
//! network I/O against the backing repository host. All methods take
//! *logical* paths; the implementation maps them to repository paths
//! internally so callers never see the storage layout.
//!
//! Every value returned here is short-lived: constructed for a single
//! request, handed to the HTTP layer, and dropped. The store holds no
//! document state between calls.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Errors from content-store operations.
///
/// These map the backing store's failure modes into the service's own
/// taxonomy. An expected absence (`NotFound`) is an outcome, not a fault:
/// callers use it to distinguish "document does not exist" from "backing
/// store unreachable or misbehaving".
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The document or directory does not exist in the backing store.
    #[error("not found: {0}")]
    NotFound(String),

    /// The path resolved to a directory (or other non-file object) where a
    /// file was expected.
    #[error("not a file: {0}")]
    NotAFile(String),

    /// The backing store answered with a non-2xx, non-404 status.
    #[error("backing store error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the backing store
        message: String,
    },

    /// Network or connection error reaching the backing store.
    #[error("network error: {0}")]
    Network(String),

    /// The configured credential could not be used.
    #[error("credential error: {0}")]
    Credential(String),

    /// Content could not be decoded from the transport encoding.
    #[error("content encoding error: {0}")]
    Encoding(String),
}

/// A document read from the backing store.
///
/// Constructed fresh per read, never cached, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Logical path, relative to the document namespace.
    pub path: String,
    /// Repository path, including the base-directory prefix.
    pub repo_path: String,
    /// File name (final path segment).
    pub name: String,
    /// Revision marker assigned by the backing store. Required for any
    /// subsequent update or delete of this document.
    pub sha: String,
    /// Decoded text content.
    pub content: String,
}

/// Entry kind in a directory listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A regular file.
    File,
    /// A directory.
    Dir,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::File => write!(f, "file"),
            EntryKind::Dir => write!(f, "dir"),
        }
    }
}

/// One entry of a directory listing.
///
/// Paths are logical; directory entries carry a trailing slash in addition
/// to their kind tag so the two representations agree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// File or directory name (final path segment).
    pub name: String,
    /// Logical path; ends with `/` for directories.
    pub path: String,
    /// Entry kind.
    pub kind: EntryKind,
}

/// Commit metadata echoed back from the backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Commit identifier.
    pub sha: String,
    /// Commit message.
    pub message: String,
}

/// Result of a successful mutation (put or delete).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitResult {
    /// Logical path of the affected document.
    pub path: String,
    /// File name (final path segment).
    pub name: String,
    /// Revision marker of the new content; `None` after a delete.
    pub content_sha: Option<String>,
    /// The commit that recorded the mutation.
    pub commit: CommitInfo,
}

/// The content-store abstraction over the backing repository host.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a single store can serve
/// concurrent requests.
///
/// # Concurrency
///
/// `put` and `delete` follow a read-then-write protocol: the current
/// revision marker is discovered with a read, then submitted with the
/// write. The sequence is a best-effort precondition, not a lock; a
/// concurrent writer can invalidate the marker between the two calls, in
/// which case the backing store rejects the write and the conflict
/// surfaces as [`StoreError::Api`]. No retries happen here.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Read a single document.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no document exists at the path
    /// - `NotAFile` if the path names a directory
    /// - `Api` / `Network` for backing-store failures
    async fn get(&self, logical_path: &str) -> Result<Document, StoreError>;

    /// Create or update a document (upsert).
    ///
    /// A discovery read decides between create and update: `NotFound` means
    /// create (no revision marker submitted), success means update (the
    /// discovered marker is submitted). Any other discovery failure aborts
    /// the operation without writing.
    ///
    /// When `message` is `None`, a default of the form
    /// `"Create <repo_path>"` or `"Update <repo_path>"` is generated.
    async fn put(
        &self,
        logical_path: &str,
        content: &str,
        message: Option<&str>,
    ) -> Result<CommitResult, StoreError>;

    /// Delete a document.
    ///
    /// The current revision marker is discovered with a read first; the
    /// backing store requires it. If the document is absent the whole
    /// operation fails with `NotFound` and no delete call is issued.
    async fn delete(
        &self,
        logical_path: &str,
        message: Option<&str>,
    ) -> Result<CommitResult, StoreError>;

    /// List a directory.
    ///
    /// The empty path lists the namespace root. If the path names a single
    /// file the result is a one-element sequence, so callers always receive
    /// a sequence.
    async fn list(&self, logical_dir: &str) -> Result<Vec<Entry>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_kind_display() {
        assert_eq!(format!("{}", EntryKind::File), "file");
        assert_eq!(format!("{}", EntryKind::Dir), "dir");
    }

    #[test]
    fn entry_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&EntryKind::File).unwrap(), "\"file\"");
        assert_eq!(serde_json::to_string(&EntryKind::Dir).unwrap(), "\"dir\"");
    }

    #[test]
    fn store_error_display() {
        assert_eq!(
            format!("{}", StoreError::NotFound("a/b.md".into())),
            "not found: a/b.md"
        );
        assert_eq!(
            format!("{}", StoreError::NotAFile("a".into())),
            "not a file: a"
        );
        assert_eq!(
            format!(
                "{}",
                StoreError::Api {
                    status: 409,
                    message: "sha mismatch".into()
                }
            ),
            "backing store error: 409 - sha mismatch"
        );
        assert_eq!(
            format!("{}", StoreError::Network("connection refused".into())),
            "network error: connection refused"
        );
        assert_eq!(
            format!("{}", StoreError::Encoding("invalid base64".into())),
            "content encoding error: invalid base64"
        );
    }
}
