//! Page-by-page fetching driven by the `Link: rel="next"` header.

use indicatif::ProgressBar;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::client::{GitHubClient, RateLimit};
use crate::error::Result;
use crate::models::SearchPage;

/// A decoded page body that yields a list of items.
pub trait Page: DeserializeOwned {
    type Item;

    fn into_items(self) -> Vec<Self::Item>;
}

impl Page for SearchPage {
    type Item = crate::models::SearchItem;

    fn into_items(self) -> Vec<Self::Item> {
        self.items
    }
}

/// Endpoints such as `/users/{owner}/repos` answer with a bare array.
impl<T: DeserializeOwned> Page for Vec<T> {
    type Item = T;

    fn into_items(self) -> Vec<T> {
        self
    }
}

/// Items of one response plus whether another page follows.
#[derive(Debug)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub has_more: bool,
    pub rate_limit: Option<RateLimit>,
}

/// Append `page=<n>` to a URL that may or may not already carry a query.
pub fn page_url(url: &str, page: u32) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}page={}", url, separator, page)
}

/// Fetch a single page.
pub async fn fetch_page<P: Page>(
    client: &GitHubClient,
    url: &str,
    page: u32,
    accept: Option<&str>,
) -> Result<PageResult<P::Item>> {
    let response = client.get(&page_url(url, page), accept).await?;
    let body: P = response.json(&format!("page {} of {}", page, url))?;

    Ok(PageResult {
        items: body.into_items(),
        has_more: response.has_next_page(),
        rate_limit: response.rate_limit(),
    })
}

/// Fetch every page of `url` in order, starting at page 1.
///
/// Stops after the first page whose response lacks a `rel="next"` link. Any
/// failing page fails the whole fetch and the items gathered so far are dropped.
pub async fn fetch_all_pages<P: Page>(
    client: &GitHubClient,
    url: &str,
    accept: Option<&str>,
    pb: &ProgressBar,
) -> Result<Vec<P::Item>> {
    let mut items = Vec::new();
    let mut page: u32 = 1;

    loop {
        pb.set_message(format!("Fetching page {}", page));

        // Search this page
        let result = fetch_page::<P>(client, url, page, accept).await?;
        debug!("Page {} returned {} items", page, result.items.len());
        items.extend(result.items);

        // No next link means this was the last page
        if !result.has_more {
            break;
        }

        // Check rate limit and wait if needed
        if let Some(wait) = result.rate_limit.and_then(|limit| limit.wait_time()) {
            warn!("Rate limit reached. Waiting {} seconds...", wait.as_secs());
            pb.set_message(format!("Rate limited - waiting {} seconds", wait.as_secs()));
            tokio::time::sleep(wait).await;
        }

        page += 1;
        pb.tick();
    }

    info!("Fetched {} items over {} pages", items.len(), page);
    Ok(items)
}
