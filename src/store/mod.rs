//! store
//!
//! Content-store client for the backing repository host.
//!
//! # Architecture
//!
//! The `ContentStore` trait defines the four document operations the HTTP
//! layer needs (get, put, delete, list) in terms of *logical* paths. The
//! GitHub implementation maps them onto the repository contents API and
//! owns the read-before-write protocol that the API's optimistic
//! concurrency contract requires.
//!
//! # Modules
//!
//! - `traits`: Core `ContentStore` trait, error taxonomy, and value types
//! - [`github`]: GitHub implementation over the contents REST API
//! - [`mock`]: In-memory implementation for deterministic testing
//!
//! # Example
//!
//! ```ignore
//! use gitshelf::store::{ContentStore, github::GitHubStore};
//!
//! let store = GitHubStore::new(&config);
//! let doc = store.get("guide/intro.md").await?;
//! println!("{} @ {}", doc.path, doc.sha);
//! ```

pub mod github;
pub mod mock;
mod traits;

pub use traits::*;
