//! Slash-hierarchical node paths

use crate::{Error, Result};

/// An absolute, normalized node path in the coordination store.
///
/// Always starts with `/`, never ends with `/` (except the root itself) and
/// never contains empty segments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodePath {
    inner: String,
}

impl NodePath {
    /// The root node `/`.
    pub fn root() -> Self {
        Self {
            inner: "/".to_string(),
        }
    }

    /// Create a path from any slash-delimited string, collapsing empty segments.
    pub fn new(path: impl AsRef<str>) -> Self {
        let segments: Vec<&str> = path
            .as_ref()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();
        if segments.is_empty() {
            return Self::root();
        }
        Self {
            inner: format!("/{}", segments.join("/")),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    pub fn is_root(&self) -> bool {
        self.inner == "/"
    }

    /// Append one or more segments (`child` may itself contain slashes).
    pub fn join(&self, child: impl AsRef<str>) -> Self {
        Self::new(format!("{}/{}", self.inner, child.as_ref()))
    }

    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        let idx = self.inner.rfind('/')?;
        Some(Self::new(&self.inner[..idx]))
    }

    /// The last segment, or `None` for the root.
    pub fn name(&self) -> Option<&str> {
        if self.is_root() {
            return None;
        }
        self.inner.rsplit('/').next()
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.inner.split('/').filter(|segment| !segment.is_empty())
    }

    /// Path of `self` relative to `ancestor`, without a leading slash.
    pub fn relative_to(&self, ancestor: &NodePath) -> Option<String> {
        if ancestor.is_root() {
            return Some(self.inner.trim_start_matches('/').to_string());
        }
        let rest = self.inner.strip_prefix(&ancestor.inner)?;
        let rest = rest.strip_prefix('/')?;
        Some(rest.to_string())
    }

    /// Validate every segment for use as a filesystem-backed node.
    pub fn validate(&self) -> Result<()> {
        for segment in self.segments() {
            validate_segment(segment)
                .map_err(|reason| Error::invalid_path(self.inner.clone(), reason))?;
        }
        Ok(())
    }
}

/// Validate a single path segment.
///
/// Rejects empty segments, traversal components, hidden names (reserved for
/// store bookkeeping files) and characters that are separators on some platforms.
pub fn validate_segment(segment: &str) -> std::result::Result<(), String> {
    if segment.is_empty() {
        return Err("empty segment".to_string());
    }
    if segment == "." || segment == ".." {
        return Err(format!("traversal segment '{}'", segment));
    }
    if segment.starts_with('.') {
        return Err(format!("segment '{}' starts with '.'", segment));
    }
    if segment.contains(['\\', '\0', '/']) {
        return Err(format!("segment '{}' contains a forbidden character", segment));
    }
    Ok(())
}

impl std::fmt::Display for NodePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl AsRef<str> for NodePath {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl From<&str> for NodePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NodePath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
