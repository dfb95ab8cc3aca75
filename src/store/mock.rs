//! store::mock
//!
//! Mock content store for deterministic testing.
//!
//! # Design
//!
//! The mock store keeps documents in memory and mints sequential revision
//! markers, so upsert and delete behave like the real backing store without
//! network I/O. Failure scenarios can be scripted per operation, and every
//! call is recorded for verification (e.g. asserting that a rejected
//! request never reached the store).
//!
//! # Example
//!
//! ```
//! use gitshelf::store::mock::MockStore;
//! use gitshelf::store::ContentStore;
//!
//! # tokio_test::block_on(async {
//! let store = MockStore::new();
//!
//! let written = store.put("guide.md", "# Guide", None).await.unwrap();
//! assert_eq!(written.path, "guide.md");
//! assert!(written.content_sha.is_some());
//!
//! let doc = store.get("guide.md").await.unwrap();
//! assert_eq!(doc.content, "# Guide");
//! # });
//! ```

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use super::traits::{
    CommitInfo, CommitResult, ContentStore, Document, Entry, EntryKind, StoreError,
};
use crate::paths::{file_name, to_logical_path, to_repo_path};

/// Base directory the mock pretends to be configured with.
const MOCK_BASE_DIR: &str = "docs";

/// Mock content store for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone)]
pub struct MockStore {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockStoreInner>>,
}

/// Internal mutable state.
#[derive(Debug)]
struct MockStoreInner {
    /// Stored documents by logical path. BTreeMap keeps listings ordered.
    docs: BTreeMap<String, MockDoc>,
    /// Next revision number to assign.
    next_rev: u64,
    /// Operation to fail (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// A stored document.
#[derive(Debug, Clone)]
struct MockDoc {
    sha: String,
    content: String,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail get with the given error.
    Get(StoreError),
    /// Fail put with the given error.
    Put(StoreError),
    /// Fail delete with the given error.
    Delete(StoreError),
    /// Fail list with the given error.
    List(StoreError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    Get { path: String },
    Put { path: String, message: Option<String> },
    Delete { path: String, message: Option<String> },
    List { dir: String },
}

impl MockStore {
    /// Create a new empty mock store.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockStoreInner {
                docs: BTreeMap::new(),
                next_rev: 1,
                fail_on: None,
                operations: Vec::new(),
            })),
        }
    }

    /// Create a mock store with pre-existing documents.
    ///
    /// # Example
    ///
    /// ```
    /// use gitshelf::store::mock::MockStore;
    ///
    /// let store = MockStore::with_docs(vec![
    ///     ("a.md", "alpha"),
    ///     ("guide/b.md", "beta"),
    /// ]);
    /// ```
    pub fn with_docs(docs: Vec<(&str, &str)>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.inner.lock().expect("mock store lock poisoned");
            for (path, content) in docs {
                let rev = inner.next_rev;
                inner.next_rev += 1;
                inner.docs.insert(
                    path.to_string(),
                    MockDoc {
                        sha: format!("sha-{}", rev),
                        content: content.to_string(),
                    },
                );
            }
        }
        store
    }

    /// Configure the mock to fail on a specific operation.
    ///
    /// # Example
    ///
    /// ```
    /// use gitshelf::store::mock::{FailOn, MockStore};
    /// use gitshelf::store::StoreError;
    ///
    /// let store = MockStore::new();
    /// store.set_fail_on(FailOn::Get(StoreError::Network("boom".into())));
    /// ```
    pub fn set_fail_on(&self, fail_on: FailOn) {
        self.inner.lock().expect("mock store lock poisoned").fail_on = Some(fail_on);
    }

    /// Get the recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.inner
            .lock()
            .expect("mock store lock poisoned")
            .operations
            .clone()
    }

    /// Current sha of a stored document, if present.
    pub fn sha_of(&self, path: &str) -> Option<String> {
        self.inner
            .lock()
            .expect("mock store lock poisoned")
            .docs
            .get(path)
            .map(|d| d.sha.clone())
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for MockStore {
    async fn get(&self, logical_path: &str) -> Result<Document, StoreError> {
        let mut inner = self.inner.lock().expect("mock store lock poisoned");
        let logical = canonical(logical_path);
        inner.operations.push(MockOperation::Get {
            path: logical.clone(),
        });
        if let Some(FailOn::Get(err)) = &inner.fail_on {
            return Err(err.clone());
        }
        let doc = inner
            .docs
            .get(&logical)
            .ok_or_else(|| StoreError::NotFound(logical.clone()))?;
        Ok(Document {
            repo_path: to_repo_path(MOCK_BASE_DIR, &logical),
            name: file_name(&logical).to_string(),
            sha: doc.sha.clone(),
            content: doc.content.clone(),
            path: logical,
        })
    }

    async fn put(
        &self,
        logical_path: &str,
        content: &str,
        message: Option<&str>,
    ) -> Result<CommitResult, StoreError> {
        let mut inner = self.inner.lock().expect("mock store lock poisoned");
        let logical = canonical(logical_path);
        inner.operations.push(MockOperation::Put {
            path: logical.clone(),
            message: message.map(str::to_string),
        });
        if let Some(FailOn::Put(err)) = &inner.fail_on {
            return Err(err.clone());
        }

        let repo_path = to_repo_path(MOCK_BASE_DIR, &logical);
        let existed = inner.docs.contains_key(&logical);
        let default_message = if existed {
            format!("Update {}", repo_path)
        } else {
            format!("Create {}", repo_path)
        };
        let message = message.map(str::to_string).unwrap_or(default_message);

        let rev = inner.next_rev;
        inner.next_rev += 1;
        let sha = format!("sha-{}", rev);
        inner.docs.insert(
            logical.clone(),
            MockDoc {
                sha: sha.clone(),
                content: content.to_string(),
            },
        );

        Ok(CommitResult {
            name: file_name(&logical).to_string(),
            path: logical,
            content_sha: Some(sha),
            commit: CommitInfo {
                sha: format!("commit-{}", rev),
                message,
            },
        })
    }

    async fn delete(
        &self,
        logical_path: &str,
        message: Option<&str>,
    ) -> Result<CommitResult, StoreError> {
        let mut inner = self.inner.lock().expect("mock store lock poisoned");
        let logical = canonical(logical_path);
        inner.operations.push(MockOperation::Delete {
            path: logical.clone(),
            message: message.map(str::to_string),
        });
        if let Some(FailOn::Delete(err)) = &inner.fail_on {
            return Err(err.clone());
        }

        if inner.docs.remove(&logical).is_none() {
            return Err(StoreError::NotFound(logical));
        }
        let repo_path = to_repo_path(MOCK_BASE_DIR, &logical);
        let message = message
            .map(str::to_string)
            .unwrap_or_else(|| format!("Delete {}", repo_path));
        let rev = inner.next_rev;
        inner.next_rev += 1;

        Ok(CommitResult {
            name: file_name(&logical).to_string(),
            path: logical,
            content_sha: None,
            commit: CommitInfo {
                sha: format!("commit-{}", rev),
                message,
            },
        })
    }

    async fn list(&self, logical_dir: &str) -> Result<Vec<Entry>, StoreError> {
        let mut inner = self.inner.lock().expect("mock store lock poisoned");
        let dir = canonical(logical_dir);
        inner.operations.push(MockOperation::List { dir: dir.clone() });
        if let Some(FailOn::List(err)) = &inner.fail_on {
            return Err(err.clone());
        }

        // Listing a file path yields that file alone, like the backing store.
        if inner.docs.contains_key(&dir) {
            return Ok(vec![Entry {
                name: file_name(&dir).to_string(),
                path: dir,
                kind: EntryKind::File,
            }]);
        }

        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{}/", dir)
        };
        let mut files = Vec::new();
        let mut dirs = BTreeSet::new();
        for path in inner.docs.keys() {
            let Some(rest) = path.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                Some((child, _)) => {
                    dirs.insert(format!("{}{}", prefix, child));
                }
                None => files.push(path.clone()),
            }
        }
        if files.is_empty() && dirs.is_empty() && !dir.is_empty() {
            return Err(StoreError::NotFound(dir));
        }

        let mut entries: Vec<Entry> = dirs
            .into_iter()
            .map(|d| Entry {
                name: file_name(&d).to_string(),
                path: format!("{}/", d),
                kind: EntryKind::Dir,
            })
            .collect();
        entries.extend(files.into_iter().map(|f| Entry {
            name: file_name(&f).to_string(),
            path: f,
            kind: EntryKind::File,
        }));
        Ok(entries)
    }
}

/// Normalize a caller-supplied logical path the way the real store does.
fn canonical(logical: &str) -> String {
    let repo = to_repo_path(MOCK_BASE_DIR, logical);
    to_logical_path(MOCK_BASE_DIR, &repo)
}
