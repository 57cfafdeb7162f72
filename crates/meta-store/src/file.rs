//! File-backed repository for standalone deployments
//!
//! Each node maps to a directory below the repository root. Node content
//! lives in a `.content` file inside that directory and is always replaced
//! with a write-to-temp-then-rename, so readers never see a partial write.
//! Every mutation holds an exclusive advisory lock on `<root>/.lock`, which
//! makes compare-and-swap atomic across threads and processes.

use crate::{Error, NodePath, PersistRepository, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

const CONTENT_FILE: &str = ".content";
const LOCK_FILE: &str = ".lock";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Coordination store persisted on the local filesystem.
#[derive(Debug)]
pub struct FileRepository {
    root: PathBuf,
}

/// Exclusive lock on the repository, released on drop.
struct RepositoryLock {
    file: File,
}

impl Drop for RepositoryLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

impl FileRepository {
    /// Open (creating if necessary) a repository rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        fs::create_dir_all(root).map_err(|e| Error::io(root, e))?;
        let root = dunce::canonicalize(root).map_err(|e| Error::io(root, e))?;
        tracing::debug!(root = %root.display(), "Opened file repository");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn node_dir(&self, path: &str) -> Result<PathBuf> {
        let path = NodePath::new(path);
        path.validate()?;
        Ok(path
            .segments()
            .fold(self.root.clone(), |dir, segment| dir.join(segment)))
    }

    fn lock(&self) -> Result<RepositoryLock> {
        let lock_path = self.root.join(LOCK_FILE);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| Error::io(&lock_path, e))?;
        file.lock_exclusive()
            .map_err(|_| Error::LockFailed { path: lock_path })?;
        Ok(RepositoryLock { file })
    }

    fn read_content(dir: &Path) -> Result<Option<String>> {
        let content_path = dir.join(CONTENT_FILE);
        match fs::read_to_string(&content_path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::io(content_path, e)),
        }
    }

    fn write_content(dir: &Path, content: &str) -> Result<()> {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        let target = dir.join(CONTENT_FILE);
        let temp = dir.join(format!(
            ".content.{}.{}.tmp",
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp)
            .map_err(|e| Error::io(&temp, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| Error::io(&temp, e))?;
        file.sync_all().map_err(|e| Error::io(&temp, e))?;

        fs::rename(&temp, &target).map_err(|e| Error::io(&target, e))
    }
}

impl PersistRepository for FileRepository {
    fn get(&self, path: &str) -> Result<Option<String>> {
        Self::read_content(&self.node_dir(path)?)
    }

    fn get_children_keys(&self, path: &str) -> Result<Vec<String>> {
        let dir = self.node_dir(path)?;
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::io(dir, e)),
        };
        let mut children = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(&dir, e))?;
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_dir && !name.starts_with('.') {
                children.push(name);
            }
        }
        children.sort();
        Ok(children)
    }

    fn persist(&self, path: &str, content: &str) -> Result<()> {
        let dir = self.node_dir(path)?;
        let _lock = self.lock()?;
        Self::write_content(&dir, content)
    }

    fn compare_and_swap(&self, path: &str, expected: Option<&str>, new: &str) -> Result<bool> {
        let dir = self.node_dir(path)?;
        let _lock = self.lock()?;
        if Self::read_content(&dir)?.as_deref() != expected {
            return Ok(false);
        }
        Self::write_content(&dir, new)?;
        Ok(true)
    }

    fn delete(&self, path: &str) -> Result<()> {
        let dir = self.node_dir(path)?;
        if dir == self.root {
            return Err(Error::InvalidPath {
                path: path.to_string(),
                reason: "refusing to delete the repository root".to_string(),
            });
        }
        let _lock = self.lock()?;
        match fs::remove_dir_all(&dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::io(dir, e)),
        }
    }
}
