//! JSON snapshot persistence for [`MemoryStore`](super::MemoryStore)
//!
//! The whole store is rewritten after each mutation. Writes go to a sibling
//! temp file first and are renamed into place, so a crash mid-write leaves the
//! previous snapshot intact.

use std::fs;
use std::path::PathBuf;

use super::{Collections, StoreResult};

#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the snapshot. A missing file is an empty store; an unreadable or
    /// corrupt one is an error so data is never silently discarded.
    pub fn load(&self) -> StoreResult<Collections> {
        if !self.path.exists() {
            log::info!(
                "no snapshot at {}, starting with an empty store",
                self.path.display()
            );
            return Ok(Collections::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let collections: Collections = serde_json::from_str(&content)?;
        log::info!(
            "loaded snapshot from {} ({} users, {} thoughts)",
            self.path.display(),
            collections.users.len(),
            collections.thoughts.len()
        );
        Ok(collections)
    }

    pub fn save(&self, collections: &Collections) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_vec_pretty(collections)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        log::trace!("snapshot written to {}", self.path.display());
        Ok(())
    }
}
