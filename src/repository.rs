//! The `info`, `list` and `cat` commands.

use std::io::Write;

use tracing::info;

use crate::content::fetch_file;
use crate::error::{Result, SearchError};
use crate::github_searcher::GitHubSearcher;
use crate::models::{Languages, Owner, Repository};
use crate::pagination::fetch_all_pages;

pub const INFO_USAGE: &str = "  Usage: repo info <user>/<repository>";
pub const LIST_USAGE: &str = "  Usage: repo list <user>";
pub const CAT_USAGE: &str = "  Usage: repo cat <user>/<repository>/<path>";

/// Split `<user>/<repository>`.
fn split_repository(repository: &str) -> Result<(&str, &str)> {
    match repository.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner, repo))
        }
        _ => Err(SearchError::invalid_arguments(
            INFO_USAGE,
            format!("invalid repository '{}'", repository),
        )),
    }
}

/// Split `<user>/<repository>/<path>`, where the path may contain further separators.
fn split_file(file: &str) -> Result<(&str, &str, &str)> {
    let mut parts = file.splitn(3, '/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(repo), Some(path))
            if !owner.is_empty() && !repo.is_empty() && !path.trim_matches('/').is_empty() =>
        {
            Ok((owner, repo, path.trim_start_matches('/')))
        }
        _ => Err(SearchError::invalid_arguments(
            CAT_USAGE,
            format!("invalid file '{}'", file),
        )),
    }
}

/// Summary printed by `repo info`.
pub fn format_info(repo: &Repository, langs: &Languages) -> String {
    format!(
        "Repository info\n  Name:        {}\n  Description: {}\n  Size:        {} KB\n  Languages:   {}\n",
        repo.full_name,
        repo.description.as_deref().unwrap_or(""),
        repo.size,
        langs
    )
}

impl GitHubSearcher {
    /// Print name, description, size and language breakdown of a repository.
    pub async fn info<W: Write>(&self, repository: &str, out: &mut W) -> Result<()> {
        let (owner, repo) = split_repository(repository)?;
        let client = self.client();

        self.progress().set_message(format!("Fetching {}/{}", owner, repo));
        let result = async {
            let details: Repository = client
                .get_json(
                    &client.url(&format!("/repos/{}/{}", owner, repo)),
                    "repository",
                )
                .await?;
            let langs: Languages = client
                .get_json(
                    &client.url(&format!("/repos/{}/{}/languages", owner, repo)),
                    "languages",
                )
                .await?;
            Ok::<_, SearchError>((details, langs))
        }
        .await;
        self.progress().finish_and_clear();

        let (details, langs) = result?;
        write!(out, "{}", format_info(&details, &langs))?;
        Ok(())
    }

    /// Print every repository of a user or organization.
    pub async fn list<W: Write>(&self, owner: &str, out: &mut W) -> Result<usize> {
        if owner.is_empty() || owner.contains('/') {
            return Err(SearchError::invalid_arguments(
                LIST_USAGE,
                format!("invalid user '{}'", owner),
            ));
        }

        let result = self.list_repositories(owner).await;
        self.progress().finish_and_clear();
        let repos = result?;

        writeln!(out, "Repositories: {}", repos.len())?;
        for repo in &repos {
            writeln!(out, "  {}", repo.full_name)?;
        }
        Ok(repos.len())
    }

    /// All repositories of `owner`, in API order.
    pub async fn list_repositories(&self, owner: &str) -> Result<Vec<Repository>> {
        let client = self.client();
        let account: Owner = client
            .get_json(&client.url(&format!("/users/{}", owner)), "user")
            .await?;

        let path = if account.is_organization() {
            format!("/orgs/{}/repos", owner)
        } else {
            format!("/users/{}/repos", owner)
        };
        let repos =
            fetch_all_pages::<Vec<Repository>>(client, &client.url(&path), None, self.progress())
                .await?;

        info!("{} has {} repositories", owner, repos.len());
        Ok(repos)
    }

    /// Print the decoded contents of a file.
    pub async fn cat<W: Write>(&self, file: &str, out: &mut W) -> Result<()> {
        let (owner, repo, path) = split_file(file)?;

        self.progress().set_message(format!("Fetching {}", path));
        let result = fetch_file(self.client(), owner, repo, path).await;
        self.progress().finish_and_clear();
        let text = result?;

        write!(out, "{}", text)?;
        if !text.ends_with('\n') {
            writeln!(out)?;
        }
        Ok(())
    }
}
