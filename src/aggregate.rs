//! Reduces raw search hits to per-repository counts or a set of files.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::SearchItem;

/// Total text-match fragments per repository full name, in name order.
pub type RepoCounts = BTreeMap<String, usize>;

/// Distinct matched file paths, in path order.
pub type FileSet = BTreeSet<String>;

/// Sum the text-match fragments of each hit under its repository.
///
/// The count is of fragments reported by the search index, not of lines.
pub fn count_by_repository(items: &[SearchItem]) -> RepoCounts {
    let mut counts = RepoCounts::new();
    for item in items {
        *counts
            .entry(item.repository.full_name.clone())
            .or_insert(0) += item.text_matches.len();
    }
    counts
}

/// Collect the distinct, normalized paths of the hits.
pub fn matched_files(items: &[SearchItem]) -> FileSet {
    items
        .iter()
        .map(|item| item.normalized_path().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Repository, TextMatch};

    fn item(repo: &str, path: &str, fragments: usize) -> SearchItem {
        SearchItem {
            repository: Repository {
                full_name: repo.to_string(),
                ..Repository::default()
            },
            path: path.to_string(),
            text_matches: vec![TextMatch::default(); fragments],
        }
    }

    #[test]
    fn counts_fragments_per_repository() {
        let items = vec![
            item("a", "x.go", 2),
            item("a", "y.go", 1),
            item("b", "x.go", 3),
        ];
        let counts = count_by_repository(&items);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts["a"], 3);
        assert_eq!(counts["b"], 3);
    }

    #[test]
    fn collapses_duplicate_and_prefixed_paths() {
        let items = vec![
            item("r", "/x.go", 1),
            item("r", "x.go", 4),
            item("r", "y.go", 1),
        ];
        let files = matched_files(&items);
        assert_eq!(files.len(), 2);
        assert_eq!(
            files.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["x.go", "y.go"]
        );
    }

    #[test]
    fn empty_input_gives_empty_aggregates() {
        assert!(count_by_repository(&[]).is_empty());
        assert!(matched_files(&[]).is_empty());
    }
}
