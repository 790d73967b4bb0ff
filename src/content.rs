//! Fetching and decoding file contents through `/repos/{owner}/{repo}/contents`.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use reqwest::StatusCode;
use serde::de::Error as _;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::client::GitHubClient;
use crate::error::{Result, SearchError};

/// Body of the contents endpoint: either a file or an error message.
#[derive(Debug, PartialEq, Eq)]
pub enum ContentEnvelope {
    Failure { message: String },
    File { content: String },
}

/// The fields of a file body this tool reads.
#[derive(Deserialize)]
struct FileBody {
    content: String,
    #[serde(default)]
    encoding: Option<String>,
}

impl ContentEnvelope {
    /// Classify a contents response.
    ///
    /// A non-empty `message` is always a failure, as is any non-success
    /// status. Otherwise the body must be an object with a base64 `content`.
    pub fn from_body(status: StatusCode, body: &[u8], path: &str) -> Result<Self> {
        let what = || format!("contents of '{}'", path);
        let parsed = serde_json::from_slice::<Value>(body);

        // Error message first, whatever the status
        let message = parsed
            .as_ref()
            .ok()
            .and_then(|value| value.get("message"))
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty());
        if let Some(message) = message {
            return Ok(ContentEnvelope::Failure {
                message: message.to_string(),
            });
        }

        if !status.is_success() {
            return Ok(ContentEnvelope::Failure {
                message: format!("API error: {} while fetching {}", status, what()),
            });
        }

        // Directory listings come back as arrays
        let value = parsed.map_err(|e| SearchError::decode(what(), e))?;
        if !value.is_object() {
            return Err(SearchError::decode(
                what(),
                serde_json::Error::custom("expected a file object"),
            ));
        }

        let file: FileBody =
            serde_json::from_value(value).map_err(|e| SearchError::decode(what(), e))?;
        match file.encoding.as_deref() {
            None | Some("base64") => Ok(ContentEnvelope::File {
                content: file.content,
            }),
            Some(other) => Err(SearchError::UnsupportedEncoding {
                path: path.to_string(),
                encoding: other.to_string(),
            }),
        }
    }
}

/// Decode GitHub's base64 payload, which is wrapped with newlines.
pub fn decode_content(encoded: &str, path: &str) -> Result<String> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let bytes = BASE64_STANDARD
        .decode(compact)
        .map_err(|source| SearchError::Base64 {
            path: path.to_string(),
            source,
        })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// `/repos/{owner}/{repo}/contents/{path}` with each path segment percent-encoded.
pub fn contents_path(owner: &str, repo: &str, path: &str) -> String {
    let encoded: Vec<_> = path.split('/').map(urlencoding::encode).collect();
    format!("/repos/{}/{}/contents/{}", owner, repo, encoded.join("/"))
}

/// Fetch the decoded text of `path` in `owner/repo`.
///
/// An error envelope or error status from the API is fatal and returned as
/// [`SearchError::Remote`], with the API's message verbatim when it sent one.
pub async fn fetch_file(
    client: &GitHubClient,
    owner: &str,
    repo: &str,
    path: &str,
) -> Result<String> {
    let url = client.url(&contents_path(owner, repo, path));
    let response = client.get(&url, None).await?;

    match ContentEnvelope::from_body(response.status, &response.body, path)? {
        ContentEnvelope::Failure { message } => {
            debug!("Fetching '{}' from {}/{} failed: {}", path, owner, repo, message);
            Err(SearchError::Remote {
                status: Some(response.status),
                message,
            })
        }
        ContentEnvelope::File { content } => {
            let text = decode_content(&content, path)?;
            debug!("Fetched '{}' ({} bytes)", path, text.len());
            Ok(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_takes_precedence() {
        let body = br#"{"message":"Not Found","documentation_url":"https://docs.github.com","content":"Zm9v"}"#;
        assert_eq!(
            ContentEnvelope::from_body(StatusCode::OK, body, "x.go").unwrap(),
            ContentEnvelope::Failure {
                message: "Not Found".into()
            }
        );
    }

    #[test]
    fn empty_message_falls_through_to_content() {
        let body = br#"{"message":"","content":"Zm9v\n","encoding":"base64"}"#;
        assert_eq!(
            ContentEnvelope::from_body(StatusCode::OK, body, "x.go").unwrap(),
            ContentEnvelope::File {
                content: "Zm9v\n".into()
            }
        );
    }

    #[test]
    fn error_status_without_message_is_a_failure() {
        for body in [&b"{}"[..], &b"<html>bad gateway</html>"[..]] {
            match ContentEnvelope::from_body(StatusCode::INTERNAL_SERVER_ERROR, body, "x.go") {
                Ok(ContentEnvelope::Failure { message }) => {
                    assert!(message.contains("500"), "message {message:?}")
                }
                other => panic!("unexpected result {other:?}"),
            }
        }
    }

    #[test]
    fn directory_listing_is_a_decode_error() {
        let err = ContentEnvelope::from_body(StatusCode::OK, b"[]", "src").unwrap_err();
        assert!(matches!(err, SearchError::Decode { .. }));
    }

    #[test]
    fn missing_content_is_a_decode_error() {
        let body = br#"{"name":"x.go","encoding":"base64"}"#;
        let err = ContentEnvelope::from_body(StatusCode::OK, body, "x.go").unwrap_err();
        assert!(matches!(err, SearchError::Decode { .. }));
    }

    #[test]
    fn large_file_without_base64_is_rejected() {
        let body = br#"{"name":"big.txt","encoding":"none","content":""}"#;
        let err = ContentEnvelope::from_body(StatusCode::OK, body, "big.txt").unwrap_err();
        match err {
            SearchError::UnsupportedEncoding { path, encoding } => {
                assert_eq!(path, "big.txt");
                assert_eq!(encoding, "none");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn path_segments_are_percent_encoded() {
        assert_eq!(
            contents_path("kitty", "myrepo", "docs/c#.md"),
            "/repos/kitty/myrepo/contents/docs/c%23.md"
        );
        assert_eq!(
            contents_path("kitty", "myrepo", "a b/100%?.txt"),
            "/repos/kitty/myrepo/contents/a%20b/100%25%3F.txt"
        );
    }

    #[test]
    fn decodes_line_wrapped_base64() {
        let encoded = BASE64_STANDARD.encode("foo\nbar\nfoobar\n");
        let (head, tail) = encoded.split_at(8);
        let wrapped = format!("{}\n{}\n", head, tail);
        assert_eq!(decode_content(&wrapped, "a.txt").unwrap(), "foo\nbar\nfoobar\n");
    }

    #[test]
    fn invalid_base64_is_fatal() {
        let err = decode_content("not*base64", "a.txt").unwrap_err();
        assert!(matches!(err, SearchError::Base64 { .. }));
    }
}
