//! Gitshelf binary entry point.
//!
//! Parses configuration from CLI flags (with environment fallbacks),
//! wires the GitHub content store into the HTTP server, and runs until
//! the process is stopped.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gitshelf::config::Config;
use gitshelf::server::{self, AppState};
use gitshelf::store::github::GitHubStore;

/// Gitshelf - HTTP document store backed by a GitHub repository
#[derive(Parser, Debug)]
#[command(name = "gitshelf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "GITSHELF_LISTEN", default_value = "0.0.0.0:8080")]
    listen: SocketAddr,

    /// Repository owner (user or organization)
    #[arg(long, env = "GITSHELF_OWNER")]
    owner: String,

    /// Repository name
    #[arg(long, env = "GITSHELF_REPO")]
    repo: String,

    /// Branch that receives commits and serves reads
    #[arg(long, env = "GITSHELF_BRANCH", default_value = "main")]
    branch: String,

    /// Base directory inside the repository
    #[arg(long, env = "GITSHELF_BASE_DIR", default_value = "docs")]
    base_dir: String,

    /// Credential for the GitHub contents API
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: String,

    /// Bearer token required from callers
    #[arg(long, env = "GITSHELF_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// GitHub API base URL (override for GitHub Enterprise)
    #[arg(long, env = "GITSHELF_API_BASE", default_value = "https://api.github.com")]
    api_base: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::new(
        cli.owner,
        cli.repo,
        cli.branch,
        Some(&cli.base_dir),
        cli.github_token,
        cli.api_token,
        cli.api_base,
    );
    config.validate().context("invalid configuration")?;
    if config.api_token.is_none() {
        warn!("no caller bearer token configured; protected routes will answer 500");
    }
    info!(?config, "starting gitshelf");

    let store = Arc::new(GitHubStore::new(&config));
    let state = AppState::new(&config, store);

    let listener = tokio::net::TcpListener::bind(cli.listen)
        .await
        .with_context(|| format!("failed to bind {}", cli.listen))?;
    server::serve(listener, state).await
}
