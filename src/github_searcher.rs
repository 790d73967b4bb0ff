use std::fmt;
use std::io::Write;
use std::pin::pin;

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::time::Duration;
use tracing::{debug, info};

use crate::aggregate::{count_by_repository, matched_files};
use crate::client::{GitHubClient, TEXT_MATCH_MEDIA_TYPE};
use crate::config::Config;
use crate::content::fetch_file;
use crate::error::{Result, SearchError};
use crate::matcher::{LineMatcher, ResolvedMatch};
use crate::models::{SearchItem, SearchPage};
use crate::pagination::fetch_all_pages;

pub const SEARCH_USAGE: &str = "  Usage: repo search <query> <user>[/<repository>]";

/// What a search is restricted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTarget {
    /// Every repository of a user or organization.
    Owner(String),
    /// A single repository.
    Repository { owner: String, repo: String },
}

impl SearchTarget {
    /// Parse `<user>` or `<user>/<repository>`.
    pub fn parse(target: &str) -> Result<Self> {
        let parts: Vec<&str> = target.split('/').collect();
        match parts.as_slice() {
            [owner] if !owner.is_empty() => Ok(SearchTarget::Owner(owner.to_string())),
            [owner, repo] if !owner.is_empty() && !repo.is_empty() => {
                Ok(SearchTarget::Repository {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                })
            }
            _ => Err(SearchError::invalid_arguments(
                SEARCH_USAGE,
                format!(
                    "invalid search target '{}': expected <user> or <user>/<repository>",
                    target
                ),
            )),
        }
    }

    /// The search qualifier restricting results to this target.
    pub fn qualifier(&self) -> String {
        match self {
            SearchTarget::Owner(owner) => format!("user:{}", owner),
            SearchTarget::Repository { owner, repo } => format!("repo:{}/{}", owner, repo),
        }
    }
}

impl fmt::Display for SearchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchTarget::Owner(owner) => write!(f, "{}", owner),
            SearchTarget::Repository { owner, repo } => write!(f, "{}/{}", owner, repo),
        }
    }
}

/// A search term as typed by the user.
///
/// The term goes into the search URL percent-encoded, and is compiled as a
/// regular expression unchanged for line matching.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    term: String,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>) -> Self {
        SearchQuery { term: term.into() }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn escaped(&self) -> String {
        urlencoding::encode(&self.term).into_owned()
    }

    /// `/search/code` URL for this term, quoted as an exact phrase.
    pub fn search_url(&self, client: &GitHubClient, target: &SearchTarget) -> String {
        client.url(&format!(
            "/search/code?q=%22{}%22+{}",
            self.escaped(),
            target.qualifier()
        ))
    }

    pub fn matcher(&self) -> Result<LineMatcher> {
        Ok(LineMatcher::new(&self.term)?)
    }
}

/// Matching lines of one file.
#[derive(Debug, Clone)]
pub struct FileMatches {
    pub path: String,
    pub matches: Vec<ResolvedMatch>,
}

/// Totals of what a search printed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchReport {
    pub repositories: usize,
    pub files: usize,
    pub lines: usize,
}

pub struct GitHubSearcher {
    client: GitHubClient,
    progress: ProgressBar,
    concurrency: usize,
}

impl GitHubSearcher {
    /// Create a new GitHubSearcher instance
    pub fn new(config: &Config) -> Result<Self> {
        // Create HTTP client
        let client = GitHubClient::new(config)?;

        // Create progress display
        let progress = if config.progress {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {wide_msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner())
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
            );
            pb.enable_steady_tick(Duration::from_millis(80));
            pb
        } else {
            ProgressBar::hidden()
        };

        Ok(GitHubSearcher {
            client,
            progress,
            concurrency: config.concurrency.max(1),
        })
    }

    pub fn client(&self) -> &GitHubClient {
        &self.client
    }

    pub fn progress(&self) -> &ProgressBar {
        &self.progress
    }

    /// Run a code search and print the results to `out`.
    ///
    /// For a user, prints the number of matches per repository. For a
    /// repository, prints every matching line of every matched file. The
    /// first failure stops the search; nothing is printed for later files.
    pub async fn search<W: Write>(
        &self,
        term: &str,
        target: &str,
        out: &mut W,
    ) -> Result<SearchReport> {
        let result = self.run_search(term, target, out).await;
        self.progress.finish_and_clear();
        result
    }

    async fn run_search<W: Write>(
        &self,
        term: &str,
        target: &str,
        out: &mut W,
    ) -> Result<SearchReport> {
        let target = SearchTarget::parse(target)?;
        let query = SearchQuery::new(term);
        info!("Searching for '{}' in {}", query.term(), target);

        // Fetch all pages before aggregating
        let items = self.fetch_search_items(&query, &target).await?;

        // Owner searches stop at the counts; repository searches resolve lines
        match &target {
            SearchTarget::Owner(_) => self.print_repo_counts(&items, out),
            SearchTarget::Repository { owner, repo } => {
                self.print_file_matches(&query, owner, repo, &items, out).await
            }
        }
    }

    /// Every search hit for `query` within `target`, across all pages.
    pub async fn fetch_search_items(
        &self,
        query: &SearchQuery,
        target: &SearchTarget,
    ) -> Result<Vec<SearchItem>> {
        let url = query.search_url(&self.client, target);
        fetch_all_pages::<SearchPage>(
            &self.client,
            &url,
            Some(TEXT_MATCH_MEDIA_TYPE),
            &self.progress,
        )
        .await
    }

    fn print_repo_counts<W: Write>(
        &self,
        items: &[SearchItem],
        out: &mut W,
    ) -> Result<SearchReport> {
        let counts = count_by_repository(items);
        info!("{} repositories with matches", counts.len());

        self.progress.suspend(|| -> Result<()> {
            for (repo, count) in &counts {
                writeln!(out, "  {}: {} matches", repo, count)?;
            }
            Ok(())
        })?;

        Ok(SearchReport {
            repositories: counts.len(),
            ..SearchReport::default()
        })
    }

    async fn print_file_matches<W: Write>(
        &self,
        query: &SearchQuery,
        owner: &str,
        repo: &str,
        items: &[SearchItem],
        out: &mut W,
    ) -> Result<SearchReport> {
        let files = matched_files(items);
        info!("{} files with matches in {}/{}", files.len(), owner, repo);
        if files.is_empty() {
            return Ok(SearchReport::default());
        }

        // Compile the raw term before any file is fetched
        let matcher = query.matcher()?;

        // Resolve files concurrently, yielding them in path order
        let mut resolved = pin!(stream::iter(files.iter())
            .map(|path| self.resolve_file(owner, repo, path, &matcher))
            .buffered(self.concurrency));

        let mut report = SearchReport {
            repositories: 1,
            ..SearchReport::default()
        };
        while let Some(result) = resolved.next().await {
            // First failure ends the search
            let file = result?;
            self.progress.suspend(|| write_file_matches(&mut *out, &file))?;
            report.files += 1;
            report.lines += file.matches.len();
        }

        Ok(report)
    }

    /// Fetch one file and find its matching lines.
    pub async fn resolve_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        matcher: &LineMatcher,
    ) -> Result<FileMatches> {
        self.progress.set_message(format!("Resolving {}", path));

        let content = fetch_file(&self.client, owner, repo, path).await?;
        let matches = matcher.find_lines(path, &content);
        debug!("{} lines of '{}' match '{}'", matches.len(), path, matcher.as_str());

        Ok(FileMatches {
            path: path.to_string(),
            matches,
        })
    }
}

fn write_file_matches<W: Write>(out: &mut W, file: &FileMatches) -> Result<()> {
    writeln!(out, "{}:", file.path)?;
    for m in &file.matches {
        writeln!(out, "  {} {}", m.line, m.text)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GitHubClient {
        GitHubClient::new(&Config::new("token", "https://api.github.com")).unwrap()
    }

    #[test]
    fn target_with_one_segment_is_an_owner() {
        assert_eq!(
            SearchTarget::parse("kitty").unwrap(),
            SearchTarget::Owner("kitty".into())
        );
    }

    #[test]
    fn target_with_two_segments_is_a_repository() {
        let target = SearchTarget::parse("kitty/myrepo").unwrap();
        assert_eq!(
            target,
            SearchTarget::Repository {
                owner: "kitty".into(),
                repo: "myrepo".into()
            }
        );
        assert_eq!(target.qualifier(), "repo:kitty/myrepo");
        assert_eq!(target.to_string(), "kitty/myrepo");
    }

    #[test]
    fn other_target_shapes_are_invalid_arguments() {
        for bad in ["", "kitty/", "/myrepo", "kitty/myrepo/extra"] {
            let err = SearchTarget::parse(bad).unwrap_err();
            assert_eq!(err.usage(), Some(SEARCH_USAGE), "target {bad:?}");
        }
    }

    #[test]
    fn url_carries_escaped_term_and_matcher_the_raw_one() {
        let query = SearchQuery::new("a+b (c)");
        let url = query.search_url(&client(), &SearchTarget::Owner("kitty".into()));

        assert_eq!(
            url,
            "https://api.github.com/search/code?q=%22a%2Bb%20%28c%29%22+user:kitty"
        );
        assert_eq!(query.term(), "a+b (c)");
        assert_eq!(query.matcher().unwrap().as_str(), "a+b (c)");
    }

    #[test]
    fn invalid_term_fails_to_compile() {
        let err = SearchQuery::new("foo(").matcher().unwrap_err();
        assert!(matches!(err, SearchError::Pattern(_)));
    }

    #[test]
    fn file_block_lists_header_then_lines() {
        let file = FileMatches {
            path: "cmd/main.go".into(),
            matches: vec![ResolvedMatch {
                path: "cmd/main.go".into(),
                line: 1,
                text: "package main".into(),
            }],
        };
        let mut out = Vec::new();
        write_file_matches(&mut out, &file).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "cmd/main.go:\n  1 package main\n");
    }
}
