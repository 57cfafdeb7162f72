//! Repository tuples: the path/content pairs exchanged with the store

use std::cmp::Ordering;
use std::collections::BTreeSet;

/// A single node of persisted configuration.
///
/// `path` is a slash-delimited hierarchical key. `content` is a serialized
/// YAML payload, or `None` for a structural node that carries no leaf value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryTuple {
    path: String,
    content: Option<String>,
}

impl RepositoryTuple {
    /// Create a tuple carrying content.
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: Some(content.into()),
        }
    }

    /// Create a structural tuple with no content.
    pub fn node(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: None,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Re-root this tuple under `prefix`.
    pub fn under(&self, prefix: &str) -> Self {
        let prefix = prefix.trim_end_matches('/');
        let path = self.path.trim_start_matches('/');
        Self {
            path: format!("{}/{}", prefix, path),
            content: self.content.clone(),
        }
    }

    /// Strip `prefix` from the path, returning `None` if the tuple is not below it.
    pub fn relative_to(&self, prefix: &str) -> Option<Self> {
        let prefix = prefix.trim_end_matches('/');
        let rest = self.path.strip_prefix(prefix)?.strip_prefix('/')?;
        if rest.is_empty() {
            return None;
        }
        Some(Self {
            path: rest.to_string(),
            content: self.content.clone(),
        })
    }
}

impl PartialOrd for RepositoryTuple {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RepositoryTuple {
    fn cmp(&self, other: &Self) -> Ordering {
        self.path
            .cmp(&other.path)
            .then_with(|| self.content.cmp(&other.content))
    }
}

/// Return the first path that occurs more than once in a write batch.
pub fn first_duplicate_path(tuples: &[RepositoryTuple]) -> Option<&str> {
    let mut seen = BTreeSet::new();
    tuples
        .iter()
        .map(RepositoryTuple::path)
        .find(|path| !seen.insert(*path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_by_path() {
        let mut tuples = vec![
            RepositoryTuple::new("sharding/tables/t_order", "a"),
            RepositoryTuple::node("sharding"),
            RepositoryTuple::new("authority", "b"),
        ];
        tuples.sort();
        let paths: Vec<_> = tuples.iter().map(|t| t.path()).collect();
        assert_eq!(paths, vec!["authority", "sharding", "sharding/tables/t_order"]);
    }

    #[test]
    fn test_under_and_relative_to() {
        let tuple = RepositoryTuple::new("sharding/tables/t_order", "x");
        let rooted = tuple.under("/metadata/db/rules/");
        assert_eq!(rooted.path(), "/metadata/db/rules/sharding/tables/t_order");
        assert_eq!(rooted.relative_to("/metadata/db/rules"), Some(tuple));
    }

    #[test]
    fn test_relative_to_rejects_sibling_prefix() {
        let tuple = RepositoryTuple::new("/metadata/db10/rules", "x");
        assert_eq!(tuple.relative_to("/metadata/db1"), None);
        assert_eq!(tuple.relative_to("/metadata/db10/rules"), None);
    }

    #[test]
    fn test_first_duplicate_path() {
        let tuples = vec![
            RepositoryTuple::new("a", "1"),
            RepositoryTuple::new("b", "2"),
            RepositoryTuple::new("a", "3"),
        ];
        assert_eq!(first_duplicate_path(&tuples), Some("a"));
        assert_eq!(first_duplicate_path(&tuples[..2]), None);
    }

    #[test]
    fn test_node_has_no_content() {
        assert_eq!(RepositoryTuple::node("/metadata/db").content(), None);
    }
}
