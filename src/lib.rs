//! Gitshelf - an HTTP document store backed by a GitHub repository
//!
//! Gitshelf maps a logical document namespace onto files in a GitHub
//! repository and uses the repository's contents API as its persistence
//! layer. Every mutation becomes a commit on a configured branch.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`server`] - HTTP layer (authentication, routing, JSON rendering)
//! - [`store`] - Content-store client for the GitHub contents API
//! - [`paths`] - Pure logical-path / repository-path translation
//! - [`config`] - Immutable service configuration
//!
//! # Correctness Invariants
//!
//! Gitshelf maintains the following invariants:
//!
//! 1. Path normalization is idempotent; mapping a logical path to a
//!    repository path twice yields the same repository path
//! 2. Every update or delete first reads the current content sha so the
//!    backing store's optimistic-concurrency contract is honored
//! 3. An absent document is a `NotFound` outcome, never confused with a
//!    backing-store failure
//! 4. Requests without a valid bearer token are rejected before any
//!    backing-store call is made

pub mod config;
pub mod paths;
pub mod server;
pub mod store;
