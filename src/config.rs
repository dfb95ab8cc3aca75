//! config
//!
//! Immutable service configuration.
//!
//! # Overview
//!
//! All settings are collected once at startup (from CLI flags with
//! environment fallbacks, see `src/main.rs`) into a [`Config`] value that is
//! passed into every component at construction. Nothing in the library
//! reads the environment; handlers and the store client only see this
//! struct.
//!
//! # Validation
//!
//! Values are validated after construction. The caller-facing bearer token
//! is deliberately *not* required here: its absence is a per-request server
//! error on protected routes, so a misconfigured deployment still serves
//! its liveness probe.

use thiserror::Error;

use crate::paths::normalize_base_dir;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration value is invalid.
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Service configuration, read-only after initialization.
#[derive(Clone)]
pub struct Config {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Branch that receives commits and serves reads.
    pub branch: String,
    /// Base directory inside the repository; normalized, no trailing slash.
    pub base_dir: String,
    /// Credential for the GitHub contents API.
    pub github_token: String,
    /// Bearer token required from callers. `None` means the service is
    /// misconfigured and every protected route fails with a server error.
    pub api_token: Option<String>,
    /// GitHub API base URL (overridable for GitHub Enterprise and tests).
    pub api_base: String,
}

// Custom Debug to avoid exposing tokens
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("base_dir", &self.base_dir)
            .field("has_github_token", &!self.github_token.is_empty())
            .field("has_api_token", &self.api_token.is_some())
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl Config {
    /// Build a configuration value, normalizing the base directory.
    ///
    /// # Example
    ///
    /// ```
    /// use gitshelf::config::Config;
    ///
    /// let config = Config::new(
    ///     "octocat",
    ///     "wiki",
    ///     "main",
    ///     Some("docs/"),
    ///     "ghp_xxx",
    ///     Some("callers-secret".to_string()),
    ///     "https://api.github.com",
    /// );
    /// assert_eq!(config.base_dir, "docs");
    /// ```
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        branch: impl Into<String>,
        base_dir: Option<&str>,
        github_token: impl Into<String>,
        api_token: Option<String>,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: branch.into(),
            base_dir: normalize_base_dir(base_dir),
            github_token: github_token.into(),
            api_token,
            api_base: api_base.into(),
        }
    }

    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.owner.is_empty() {
            return Err(ConfigError::InvalidValue("owner must not be empty".into()));
        }
        if self.repo.is_empty() {
            return Err(ConfigError::InvalidValue("repo must not be empty".into()));
        }
        if self.branch.is_empty() {
            return Err(ConfigError::InvalidValue(
                "branch must not be empty".into(),
            ));
        }
        if self.api_base.is_empty() || !self.api_base.starts_with("http") {
            return Err(ConfigError::InvalidValue(format!(
                "api_base must be an http(s) URL, got '{}'",
                self.api_base
            )));
        }
        Ok(())
    }
}
