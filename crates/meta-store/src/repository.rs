//! The coordination store contract

use crate::Result;

/// Client of a hierarchical, path-keyed coordination store.
///
/// Every call may block (network round trip) and no timeout is imposed by
/// callers; timeout and reconnect policy belong to the implementation.
/// Transport failures surface as [`crate::Error::Unavailable`].
pub trait PersistRepository: Send + Sync {
    /// Content stored at `path`, or `None` for an absent or structural node.
    fn get(&self, path: &str) -> Result<Option<String>>;

    /// Names of the direct children of `path`, sorted.
    fn get_children_keys(&self, path: &str) -> Result<Vec<String>>;

    /// Create or overwrite the node at `path`. Not atomic with respect to
    /// concurrent writers of the same path.
    fn persist(&self, path: &str, content: &str) -> Result<()>;

    /// Atomically replace the content at `path` with `new` if it currently
    /// equals `expected`. `expected = None` means "create only if absent".
    ///
    /// Returns `false` when the current content did not match.
    fn compare_and_swap(&self, path: &str, expected: Option<&str>, new: &str) -> Result<bool>;

    /// Remove the node at `path` together with its subtree.
    fn delete(&self, path: &str) -> Result<()>;

    /// Whether the node exists, either with content or as a parent of other nodes.
    fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.get(path)?.is_some() || !self.get_children_keys(path)?.is_empty())
    }
}
