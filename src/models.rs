//! Shapes of the GitHub JSON bodies this tool reads.
//!
//! Only the fields the commands use are declared; everything else in the
//! responses is ignored by serde.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

/// One page of `GET /search/code`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

/// A single code search hit.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    pub repository: Repository,
    pub path: String,
    /// Present only when the text-match media type was requested.
    #[serde(default)]
    pub text_matches: Vec<TextMatch>,
}

impl SearchItem {
    /// Path relative to the repository root, without any leading separator.
    pub fn normalized_path(&self) -> &str {
        self.path.trim_start_matches('/')
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextMatch {
    #[serde(default)]
    pub fragment: String,
    #[serde(default)]
    pub matches: Vec<MatchIndices>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchIndices {
    #[serde(default)]
    pub indices: Vec<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Repository {
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Size in kilobytes, as reported by the API.
    #[serde(default)]
    pub size: u64,
}

/// Body of `GET /users/{owner}`; only the account type matters.
#[derive(Debug, Deserialize)]
pub struct Owner {
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl Owner {
    pub fn is_organization(&self) -> bool {
        self.kind == "Organization"
    }
}

/// Error body GitHub returns alongside failures.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub message: Option<String>,
}

/// Bytes of code per language, from `GET /repos/{owner}/{repo}/languages`.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct Languages(pub BTreeMap<String, u64>);

impl Languages {
    /// Each language's share of the total in percent, largest first.
    pub fn shares(&self) -> Vec<(&str, f64)> {
        let total: u64 = self.0.values().sum();
        if total == 0 {
            return Vec::new();
        }

        let mut shares: Vec<(&str, f64)> = self
            .0
            .iter()
            .map(|(name, bytes)| (name.as_str(), 100.0 * *bytes as f64 / total as f64))
            .collect();
        // BTreeMap order breaks ties by name.
        shares.sort_by(|a, b| b.1.total_cmp(&a.1));
        shares
    }
}

impl fmt::Display for Languages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .shares()
            .into_iter()
            .map(|(name, share)| format!("{}: {:.2}%", name, share))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn search_item_strips_leading_separator() {
        let item: SearchItem = serde_json::from_value(json!({
            "repository": { "full_name": "kitty/myrepo" },
            "path": "/cmd/main.go",
            "text_matches": [{ "fragment": "package main", "matches": [{ "indices": [0, 7] }] }]
        }))
        .unwrap();

        assert_eq!(item.normalized_path(), "cmd/main.go");
        assert_eq!(item.text_matches.len(), 1);
        assert_eq!(item.text_matches[0].matches[0].indices, vec![0, 7]);
    }

    #[test]
    fn search_page_without_items_is_empty() {
        let page: SearchPage = serde_json::from_str("{\"total_count\": 0}").unwrap();
        assert!(page.items.is_empty());
    }

    #[test]
    fn languages_render_as_sorted_percentages() {
        let langs: Languages =
            serde_json::from_value(json!({ "Go": 300, "Shell": 100, "C": 100 })).unwrap();
        assert_eq!(langs.to_string(), "Go: 60.00%, C: 20.00%, Shell: 20.00%");
        assert_eq!(Languages::default().to_string(), "");
    }

    #[test]
    fn owner_type_detects_organizations() {
        let org: Owner = serde_json::from_value(json!({ "type": "Organization" })).unwrap();
        let user: Owner = serde_json::from_value(json!({ "type": "User" })).unwrap();
        assert!(org.is_organization());
        assert!(!user.is_organization());
    }
}
