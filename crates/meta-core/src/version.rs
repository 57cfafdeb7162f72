//! Versioned unit store
//!
//! A unit is a node whose content is kept as write-once versions with an
//! atomically switched active pointer:
//!
//! ```text
//! <unit>/versions/0
//! <unit>/versions/1
//! <unit>/active_version      -> "1"
//! ```
//!
//! Writers claim the next free version slot with a create-if-absent
//! compare-and-swap, then move the pointer from the version they read to the
//! new one. A writer that loses the pointer race re-reads and retries after a
//! backoff delay, up to the configured attempt budget. Readers only ever
//! follow the pointer, so they never observe a version that is not committed.

use crate::config::VersionSection;
use crate::{Error, Result, node};
use backoff::backoff::Backoff;
use meta_store::{PersistRepository, RepositoryTuple};
use std::sync::Arc;

/// Result of a versioned write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistOutcome {
    /// Active version after the write
    pub version: u64,
    /// The unit did not exist before the write
    pub created: bool,
    /// Content was identical to the active version; nothing was appended
    pub unchanged: bool,
}

/// Versioned persistence over a [`PersistRepository`].
#[derive(Clone)]
pub struct VersionedUnitStore {
    repository: Arc<dyn PersistRepository>,
    config: VersionSection,
}

impl VersionedUnitStore {
    pub fn new(repository: Arc<dyn PersistRepository>, config: VersionSection) -> Self {
        Self { repository, config }
    }

    pub fn repository(&self) -> &Arc<dyn PersistRepository> {
        &self.repository
    }

    pub fn config(&self) -> &VersionSection {
        &self.config
    }

    /// Append `content` as a new version of `unit` and make it active.
    ///
    /// # Errors
    ///
    /// [`Error::VersionConflict`] when the pointer race is lost more often than
    /// `max_attempts` allows; repository errors are propagated unchanged.
    pub fn persist(&self, unit: &str, content: &str) -> Result<PersistOutcome> {
        let mut backoff = self.config.backoff();
        for attempt in 1..=self.config.max_attempts {
            let active = self.active_version(unit)?;
            if let Some(version) = active {
                if self.config.skip_unchanged && self.version_content(unit, version)? == content {
                    tracing::debug!(unit, version, "Content unchanged, keeping active version");
                    return Ok(PersistOutcome {
                        version,
                        created: false,
                        unchanged: true,
                    });
                }
            }

            let version = self.claim_version(unit, content)?;
            let expected = active.map(|v| v.to_string());
            if self.repository.compare_and_swap(
                &node::active_version(unit),
                expected.as_deref(),
                &version.to_string(),
            )? {
                tracing::debug!(unit, version, attempt, "Activated version");
                return Ok(PersistOutcome {
                    version,
                    created: active.is_none(),
                    unchanged: false,
                });
            }

            tracing::debug!(unit, version, attempt, "Lost active version race, retrying");
            if attempt < self.config.max_attempts {
                if let Some(delay) = backoff.next_backoff() {
                    std::thread::sleep(delay);
                }
            }
        }
        tracing::warn!(unit, attempts = self.config.max_attempts, "Giving up on versioned write");
        Err(Error::VersionConflict {
            unit: unit.to_string(),
            attempts: self.config.max_attempts,
        })
    }

    /// Content of the active version, or `None` if the unit does not exist.
    pub fn load(&self, unit: &str) -> Result<Option<String>> {
        match self.active_version(unit)? {
            Some(version) => self.version_content(unit, version).map(Some),
            None => Ok(None),
        }
    }

    /// Whether `unit` has an active version.
    pub fn exists(&self, unit: &str) -> Result<bool> {
        Ok(self.active_version(unit)?.is_some())
    }

    pub fn active_version(&self, unit: &str) -> Result<Option<u64>> {
        let path = node::active_version(unit);
        match self.repository.get(&path)? {
            Some(content) => content
                .trim()
                .parse()
                .map(Some)
                .map_err(|e| Error::malformed(path, e)),
            None => Ok(None),
        }
    }

    /// Existing version ids of `unit`, ascending.
    pub fn versions(&self, unit: &str) -> Result<Vec<u64>> {
        let mut result: Vec<u64> = self
            .repository
            .get_children_keys(&node::versions(unit))?
            .iter()
            .filter_map(|key| key.parse().ok())
            .collect();
        result.sort_unstable();
        Ok(result)
    }

    /// Move the active pointer of `unit` from `expected` to an existing `target`.
    ///
    /// Returns `false` when the pointer no longer equals `expected`.
    pub fn switch_active_version(&self, unit: &str, expected: Option<u64>, target: u64) -> Result<bool> {
        if self.repository.get(&node::version(unit, target))?.is_none() {
            return Err(Error::DanglingActiveVersion {
                unit: unit.to_string(),
                version: target,
            });
        }
        let expected = expected.map(|v| v.to_string());
        let switched = self.repository.compare_and_swap(
            &node::active_version(unit),
            expected.as_deref(),
            &target.to_string(),
        )?;
        if switched {
            tracing::info!(unit, version = target, "Switched active version");
        }
        Ok(switched)
    }

    /// Remove `unit` with all of its versions.
    pub fn delete(&self, unit: &str) -> Result<()> {
        tracing::debug!(unit, "Deleting unit");
        self.repository.delete(unit)?;
        Ok(())
    }

    /// Every unit below `root` with its active content.
    ///
    /// Tuple paths are relative to `root`, in sorted order.
    pub fn units_under(&self, root: &str) -> Result<Vec<RepositoryTuple>> {
        let mut result = Vec::new();
        self.collect_units(root, "", &mut result)?;
        Ok(result)
    }

    fn collect_units(&self, path: &str, relative: &str, result: &mut Vec<RepositoryTuple>) -> Result<()> {
        let children = self.repository.get_children_keys(path)?;
        // Only a unit's own pointer carries content; an item merely named
        // `active_version` is a structural node.
        let is_unit = self.repository.get(&node::active_version(path))?.is_some();
        if is_unit && !relative.is_empty() {
            if let Some(content) = self.load(path)? {
                result.push(RepositoryTuple::new(relative, content));
            }
        }
        for child in children {
            if is_unit && (child == node::VERSIONS || child == node::ACTIVE_VERSION) {
                continue;
            }
            let child_relative = if relative.is_empty() {
                child.clone()
            } else {
                format!("{}/{}", relative, child)
            };
            self.collect_units(&format!("{}/{}", path, child), &child_relative, result)?;
        }
        Ok(())
    }

    fn version_content(&self, unit: &str, version: u64) -> Result<String> {
        self.repository
            .get(&node::version(unit, version))?
            .ok_or_else(|| Error::DanglingActiveVersion {
                unit: unit.to_string(),
                version,
            })
    }

    /// Claim the first free slot after the highest existing version.
    fn claim_version(&self, unit: &str, content: &str) -> Result<u64> {
        let mut candidate = self.versions(unit)?.last().map_or(0, |v| v + 1);
        while !self
            .repository
            .compare_and_swap(&node::version(unit, candidate), None, content)?
        {
            candidate += 1;
        }
        Ok(candidate)
    }
}

impl std::fmt::Debug for VersionedUnitStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionedUnitStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
