use clap::{Parser, Subcommand};

use crate::config::DEFAULT_API_URL;

/// Repo is a tool for querying GitHub repositories from the command line.
#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about,
    long_about = "Query GitHub repositories from the command line: search file contents down to line numbers, list repositories and print files.",
    after_help = "Examples:

  Print a short summary of repository 'myrepo', owned by kitty
  $ repo info kitty/myrepo

  Search through user kitty's repository 'myrepo' for occurrences of the string
  \"http.StatusBadRequest\".
  $ repo search 'http\\.StatusBadRequest' kitty/myrepo

  Enclose multi-word search terms in quotes.
  $ repo search \"package main\" kitty"
)]
pub struct Args {
    /// GitHub API token for authentication.
    /// Falls back to GITHUB_API_TOKEN, then GITHUB_TOKEN.
    #[clap(short, long, global = true)]
    pub token: Option<String>,

    /// Base URL of the GitHub REST API.
    #[clap(
        long,
        global = true,
        env = "GITHUB_API_URL",
        default_value = DEFAULT_API_URL
    )]
    pub api_url: String,

    /// Maximum number of files resolved concurrently during a repository search.
    #[clap(short = 'c', long, global = true, default_value = "4")]
    pub concurrency: usize,

    /// Do not draw the progress spinner.
    #[clap(short, long, global = true)]
    pub quiet: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a brief summary about a repository.
    Info {
        /// Repository as <user>/<repository>.
        repository: String,
    },

    /// Search the file contents of a repository, or of every repository of a user.
    Search {
        /// Regular expression to search for. The literal text is sent to the
        /// GitHub search API; the expression is used to find matching lines.
        query: String,

        /// <user> or <user>/<repository>.
        target: String,
    },

    /// List all repositories pertaining to a user or organization.
    List {
        /// User or organization name.
        owner: String,
    },

    /// Print the contents of a file.
    Cat {
        /// File as <user>/<repository>/<path>.
        file: String,
    },
}
