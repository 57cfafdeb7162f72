//! In-memory repository

use crate::{Error, NodePath, PersistRepository, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory coordination store.
///
/// Parent nodes exist implicitly while they have descendants, matching the
/// behavior of hierarchical stores. Compare-and-swap is linearized by the
/// internal write lock.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    nodes: RwLock<BTreeMap<String, String>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes that carry content.
    pub fn len(&self) -> usize {
        self.read().map(|nodes| nodes.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All content-bearing paths, sorted.
    pub fn paths(&self) -> Result<Vec<String>> {
        Ok(self.read()?.keys().cloned().collect())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<String, String>>> {
        self.nodes
            .read()
            .map_err(|_| Error::unavailable("memory repository lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<String, String>>> {
        self.nodes
            .write()
            .map_err(|_| Error::unavailable("memory repository lock poisoned"))
    }
}

fn child_prefix(path: &NodePath) -> String {
    if path.is_root() {
        "/".to_string()
    } else {
        format!("{}/", path.as_str())
    }
}

impl PersistRepository for MemoryRepository {
    fn get(&self, path: &str) -> Result<Option<String>> {
        let path = NodePath::new(path);
        Ok(self.read()?.get(path.as_str()).cloned())
    }

    fn get_children_keys(&self, path: &str) -> Result<Vec<String>> {
        let prefix = child_prefix(&NodePath::new(path));
        let nodes = self.read()?;
        let children: BTreeSet<String> = nodes
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter_map(|(key, _)| key[prefix.len()..].split('/').next())
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        Ok(children.into_iter().collect())
    }

    fn persist(&self, path: &str, content: &str) -> Result<()> {
        let path = NodePath::new(path);
        self.write()?.insert(path.as_str().to_string(), content.to_string());
        Ok(())
    }

    fn compare_and_swap(&self, path: &str, expected: Option<&str>, new: &str) -> Result<bool> {
        let path = NodePath::new(path);
        let mut nodes = self.write()?;
        if nodes.get(path.as_str()).map(String::as_str) != expected {
            return Ok(false);
        }
        nodes.insert(path.as_str().to_string(), new.to_string());
        Ok(true)
    }

    fn delete(&self, path: &str) -> Result<()> {
        let path = NodePath::new(path);
        let prefix = child_prefix(&path);
        let mut nodes = self.write()?;
        nodes.retain(|key, _| key != path.as_str() && !key.starts_with(&prefix));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_absent_returns_none() {
        let repo = MemoryRepository::new();
        assert_eq!(repo.get("/metadata").unwrap(), None);
        assert!(repo.is_empty());
    }

    #[test]
    fn test_children_are_distinct_and_sorted() {
        let repo = MemoryRepository::new();
        repo.persist("/metadata/db_b/rules/x", "1").unwrap();
        repo.persist("/metadata/db_a", "").unwrap();
        repo.persist("/metadata/db_b/rules/y", "2").unwrap();
        repo.persist("/metadataX/other", "3").unwrap();
        repo.persist("/metadata/db_a-b", "").unwrap();

        assert_eq!(repo.get_children_keys("/metadata").unwrap(), vec!["db_a", "db_a-b", "db_b"]);
        assert_eq!(repo.get_children_keys("/").unwrap(), vec!["metadata", "metadataX"]);
        assert!(repo.get_children_keys("/missing").unwrap().is_empty());
    }

    #[test]
    fn test_implicit_parent_exists_without_content() {
        let repo = MemoryRepository::new();
        repo.persist("/metadata/db/rules/x", "1").unwrap();
        assert_eq!(repo.get("/metadata/db").unwrap(), None);
        assert!(repo.exists("/metadata/db").unwrap());
        assert!(!repo.exists("/metadata/other").unwrap());
    }

    #[test]
    fn test_compare_and_swap() {
        let repo = MemoryRepository::new();
        assert!(repo.compare_and_swap("/a", None, "0").unwrap());
        assert!(!repo.compare_and_swap("/a", None, "1").unwrap());
        assert!(!repo.compare_and_swap("/a", Some("5"), "1").unwrap());
        assert!(repo.compare_and_swap("/a", Some("0"), "1").unwrap());
        assert_eq!(repo.get("/a").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_delete_removes_subtree_only() {
        let repo = MemoryRepository::new();
        repo.persist("/metadata/db", "").unwrap();
        repo.persist("/metadata/db/schemas/s/tables/t", "x").unwrap();
        repo.persist("/metadata/db2", "").unwrap();

        repo.delete("/metadata/db").unwrap();

        assert_eq!(repo.paths().unwrap(), vec!["/metadata/db2"]);
    }
}
