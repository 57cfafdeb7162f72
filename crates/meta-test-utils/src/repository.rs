//! Repositories for exercising failure and concurrency paths.

use meta_store::{Error, FileRepository, MemoryRepository, PersistRepository, Result};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use tempfile::TempDir;

/// A [`FileRepository`] rooted in a temporary directory.
pub struct TestStore {
    temp_dir: TempDir,
    repository: Arc<FileRepository>,
}

impl Default for TestStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TestStore {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("TestStore::new: failed to create temp dir");
        let repository = Arc::new(
            FileRepository::open(temp_dir.path()).expect("TestStore::new: failed to open repository"),
        );
        Self {
            temp_dir,
            repository,
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn repository(&self) -> Arc<FileRepository> {
        Arc::clone(&self.repository)
    }
}

/// Fails every mutation below a path prefix with [`Error::Unavailable`].
///
/// Reads always go through.
pub struct FailingRepository {
    inner: MemoryRepository,
    prefix: String,
    failures: AtomicUsize,
}

impl FailingRepository {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            inner: MemoryRepository::new(),
            prefix: prefix.into(),
            failures: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &MemoryRepository {
        &self.inner
    }

    /// Number of rejected mutations.
    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }

    fn check(&self, path: &str) -> Result<()> {
        if path.starts_with(&self.prefix) {
            self.failures.fetch_add(1, Ordering::SeqCst);
            return Err(Error::unavailable(format!("injected failure at {}", path)));
        }
        Ok(())
    }
}

impl PersistRepository for FailingRepository {
    fn get(&self, path: &str) -> Result<Option<String>> {
        self.inner.get(path)
    }

    fn get_children_keys(&self, path: &str) -> Result<Vec<String>> {
        self.inner.get_children_keys(path)
    }

    fn persist(&self, path: &str, content: &str) -> Result<()> {
        self.check(path)?;
        self.inner.persist(path, content)
    }

    fn compare_and_swap(&self, path: &str, expected: Option<&str>, new: &str) -> Result<bool> {
        self.check(path)?;
        self.inner.compare_and_swap(path, expected, new)
    }

    fn delete(&self, path: &str) -> Result<()> {
        self.check(path)?;
        self.inner.delete(path)
    }
}

const ACTIVE_VERSION_SUFFIX: &str = "/active_version";

/// Simulates a competing writer that commits a version right before each of
/// the next `conflicts` active-pointer swaps.
pub struct RacingRepository {
    inner: MemoryRepository,
    conflicts: AtomicU32,
    competitor_content: String,
}

impl RacingRepository {
    pub fn new(conflicts: u32) -> Self {
        Self {
            inner: MemoryRepository::new(),
            conflicts: AtomicU32::new(conflicts),
            competitor_content: "competing write".to_string(),
        }
    }

    pub fn inner(&self) -> &MemoryRepository {
        &self.inner
    }

    /// Conflicts not yet injected.
    pub fn remaining_conflicts(&self) -> u32 {
        self.conflicts.load(Ordering::SeqCst)
    }

    fn take_conflict(&self) -> bool {
        self.conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    fn commit_competitor(&self, unit: &str) -> Result<()> {
        let versions = format!("{}/versions", unit);
        let mut next = self
            .inner
            .get_children_keys(&versions)?
            .iter()
            .filter_map(|key| key.parse::<u64>().ok())
            .max()
            .map_or(0, |v| v + 1);
        while !self
            .inner
            .compare_and_swap(&format!("{}/{}", versions, next), None, &self.competitor_content)?
        {
            next += 1;
        }
        self.inner
            .persist(&format!("{}{}", unit, ACTIVE_VERSION_SUFFIX), &next.to_string())
    }
}

impl PersistRepository for RacingRepository {
    fn get(&self, path: &str) -> Result<Option<String>> {
        self.inner.get(path)
    }

    fn get_children_keys(&self, path: &str) -> Result<Vec<String>> {
        self.inner.get_children_keys(path)
    }

    fn persist(&self, path: &str, content: &str) -> Result<()> {
        self.inner.persist(path, content)
    }

    fn compare_and_swap(&self, path: &str, expected: Option<&str>, new: &str) -> Result<bool> {
        if let Some(unit) = path.strip_suffix(ACTIVE_VERSION_SUFFIX) {
            if self.take_conflict() {
                self.commit_competitor(unit)?;
            }
        }
        self.inner.compare_and_swap(path, expected, new)
    }

    fn delete(&self, path: &str) -> Result<()> {
        self.inner.delete(path)
    }
}
