use std::env;

use tracing::debug;

use crate::error::{Result, SearchError};
use crate::Args;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Environment variables consulted for the token, in order.
const TOKEN_VARS: [&str; 2] = ["GITHUB_API_TOKEN", "GITHUB_TOKEN"];

/// Settings shared by every command, resolved once before dispatch.
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub api_url: String,
    pub concurrency: usize,
    pub progress: bool,
}

impl Config {
    pub fn new(token: impl Into<String>, api_url: impl Into<String>) -> Self {
        Config {
            token: token.into(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            concurrency: 1,
            progress: false,
        }
    }

    /// Build the configuration from parsed arguments and the environment.
    pub fn from_args(args: &Args) -> Result<Self> {
        let token = resolve_token(args.token.as_deref(), |name| env::var(name).ok())?;

        let mut config = Config::new(token, args.api_url.as_str());
        config.concurrency = args.concurrency.max(1);
        config.progress = !args.quiet;

        debug!(
            "Using API at {} with concurrency {}",
            config.api_url, config.concurrency
        );
        Ok(config)
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

/// Pick the first non-blank token from the flag, then the environment.
fn resolve_token(flag: Option<&str>, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
    if let Some(token) = flag.filter(|t| !t.trim().is_empty()) {
        return Ok(token.to_string());
    }

    for name in TOKEN_VARS {
        match lookup(name) {
            Some(token) if !token.trim().is_empty() => {
                debug!("Using token from {}", name);
                return Ok(token);
            }
            _ => {}
        }
    }

    Err(SearchError::MissingToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins_over_environment() {
        let token = resolve_token(Some("from-flag"), |_| Some("from-env".into())).unwrap();
        assert_eq!(token, "from-flag");
    }

    #[test]
    fn falls_back_through_environment_in_order() {
        let token = resolve_token(Some("  "), |name| match name {
            "GITHUB_API_TOKEN" => Some(String::new()),
            "GITHUB_TOKEN" => Some("second".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(token, "second");
    }

    #[test]
    fn missing_token_is_an_error() {
        let err = resolve_token(None, |_| None).unwrap_err();
        assert!(matches!(err, SearchError::MissingToken));
    }

    #[test]
    fn api_url_loses_trailing_slash() {
        let config = Config::new("t", "http://localhost:8080/");
        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(config.with_concurrency(0).concurrency, 1);
    }
}
