//! # GitHub Repo Searching
//!
//! A Rust library for querying GitHub repositories from the command line.
//! Its main job is turning GitHub code search hits into line numbers: the
//! search API only reports fragments, so every matched file is fetched and
//! matched again locally.
//!
//! ## Main Components
//!
//! - [`GitHubSearcher`]: runs the `search`, `info`, `list` and `cat` commands
//! - [`GitHubClient`]: authenticated requests against the REST API
//! - [`LineMatcher`]: finds the lines of a file that match a search term
//! - [`Config`]: token and API settings resolved from arguments and environment
//!
//! ## Example
//!
//! ```no_run
//! use github_repo_searching_lib::{Config, GitHubSearcher};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let config = Config::new("ghp_example", "https://api.github.com");
//!     let searcher = GitHubSearcher::new(&config)?;
//!
//!     // Print every line of kitty/myrepo matching the expression
//!     searcher
//!         .search(r"http\.StatusBadRequest", "kitty/myrepo", &mut std::io::stdout())
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod aggregate;
mod args;
pub mod client;
mod config;
pub mod content;
mod error;
mod github_searcher;
pub mod matcher;
pub mod models;
pub mod pagination;
pub mod repository;

// Re-export main components for documentation and external use
pub use crate::args::{Args, Command};
pub use crate::client::GitHubClient;
pub use crate::config::Config;
pub use crate::error::{Result, SearchError};
pub use crate::github_searcher::{
    FileMatches, GitHubSearcher, SearchQuery, SearchReport, SearchTarget, SEARCH_USAGE,
};
pub use crate::matcher::{LineMatcher, ResolvedMatch};
