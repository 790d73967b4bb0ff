//! Error type shared by every command.

use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can end a command.
///
/// None of these are retried. The binary decides how each one maps to an
/// exit status; the library only propagates them.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The command line had the wrong shape. Carries the usage line to show.
    #[error("{reason}")]
    InvalidArguments { usage: &'static str, reason: String },

    #[error("repo needs GITHUB_API_TOKEN (or GITHUB_TOKEN) to be set to a valid GitHub API token")]
    MissingToken,

    /// Connection-level failure from the HTTP client.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A response body did not have the expected JSON shape.
    #[error("could not decode {what}: {source}")]
    Decode {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not decode base64 content of '{path}': {source}")]
    Base64 {
        path: String,
        #[source]
        source: base64::DecodeError,
    },

    /// The contents API returned the file in a form other than base64,
    /// which it does for files over 1 MB.
    #[error("cannot read '{path}': contents returned with encoding '{encoding}'")]
    UnsupportedEncoding { path: String, encoding: String },

    /// GitHub answered with an explicit error message.
    #[error("{message}")]
    Remote {
        status: Option<StatusCode>,
        message: String,
    },

    /// The search term is not a valid regular expression.
    #[error("invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("could not write output: {0}")]
    Io(#[from] std::io::Error),
}

impl SearchError {
    pub fn invalid_arguments(usage: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            usage,
            reason: reason.into(),
        }
    }

    pub fn decode(what: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            what: what.into(),
            source,
        }
    }

    /// Usage line to print alongside the error, if the error is about arguments.
    pub fn usage(&self) -> Option<&'static str> {
        match self {
            Self::InvalidArguments { usage, .. } => Some(usage),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_argument_errors_carry_usage() {
        let err = SearchError::invalid_arguments("  Usage: repo search <query> <user>", "bad target");
        assert_eq!(err.usage(), Some("  Usage: repo search <query> <user>"));
        assert_eq!(err.to_string(), "bad target");

        let remote = SearchError::Remote {
            status: None,
            message: "Not Found".into(),
        };
        assert!(remote.usage().is_none());
        assert_eq!(remote.to_string(), "Not Found");
    }
}
