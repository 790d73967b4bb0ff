use chrono::Utc;
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION, LINK};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::error::{Result, SearchError};
use crate::models::ErrorEnvelope;

/// Media type that makes the search API include `text_matches` fragments.
pub const TEXT_MATCH_MEDIA_TYPE: &str = "application/vnd.github.v3.text-match+json";

/// Authenticated GET requests against the GitHub REST API.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    token: String,
    api_url: String,
}

impl GitHubClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("github-repo-searching/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(GitHubClient {
            client,
            token: config.token.clone(),
            api_url: config.api_url.clone(),
        })
    }

    /// Absolute URL for an API path such as `/repos/kitty/myrepo`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Issue a GET and read the whole body. Non-success statuses are not
    /// errors at this level; callers decide how to read the body.
    pub async fn get(&self, url: &str, accept: Option<&str>) -> Result<ApiResponse> {
        debug!("Requesting URL: {}", url);

        let mut request = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        debug!("{} returned {} ({} bytes)", url, status, body.len());
        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }

    /// GET a JSON document, turning error statuses into [`SearchError::Remote`].
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        self.get(url, None).await?.json(what)
    }
}

/// A fully read HTTP response.
#[derive(Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// True when a `Link` header advertises a `rel="next"` page.
    pub fn has_next_page(&self) -> bool {
        self.headers
            .get_all(LINK)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .any(|link| link.contains("rel=\"next\""))
    }

    pub fn rate_limit(&self) -> Option<RateLimit> {
        RateLimit::from_headers(&self.headers)
    }

    /// The `message` of an error envelope, if the body is one and it is non-empty.
    pub fn error_message(&self) -> Option<String> {
        serde_json::from_slice::<ErrorEnvelope>(&self.body)
            .ok()
            .and_then(|envelope| envelope.message)
            .filter(|message| !message.is_empty())
    }

    /// Decode the body as `T`, failing with the API's message on a non-success status.
    pub fn json<T: DeserializeOwned>(&self, what: &str) -> Result<T> {
        if !self.status.is_success() {
            let message = self
                .error_message()
                .unwrap_or_else(|| format!("API error: {} while fetching {}", self.status, what));
            return Err(SearchError::Remote {
                status: Some(self.status),
                message,
            });
        }

        serde_json::from_slice(&self.body).map_err(|e| SearchError::decode(what, e))
    }
}

/// Rate-limit state reported with every API response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub remaining: u32,
    pub limit: Option<u32>,
    /// Unix timestamp at which the budget refills.
    pub reset: Option<i64>,
}

impl RateLimit {
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let number = |name: &str| headers.get(name)?.to_str().ok()?.trim().parse::<i64>().ok();

        let remaining = u32::try_from(number("X-RateLimit-Remaining")?).ok()?;
        Some(RateLimit {
            remaining,
            limit: number("X-RateLimit-Limit").and_then(|l| u32::try_from(l).ok()),
            reset: number("X-RateLimit-Reset"),
        })
    }

    /// How long to wait before the next request, if the budget is spent.
    pub fn wait_time(&self) -> Option<Duration> {
        self.wait_time_at(Utc::now().timestamp())
    }

    fn wait_time_at(&self, now: i64) -> Option<Duration> {
        if self.remaining > 0 {
            return None;
        }
        let reset = self.reset?;
        (reset > now).then(|| Duration::from_secs((reset - now) as u64 + 1))
    }
}
