//! In-memory manifest and loop-history store.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::{LoopResult, Manifest};
use crate::error::{Result, VibeError};

#[derive(Debug, Default)]
struct Inner {
    manifests: HashMap<String, Manifest>,
    histories: HashMap<String, Vec<LoopResult>>,
}

/// Manifests and loop histories keyed by id.
///
/// Uses a `Mutex` for interior mutability so the store can sit behind an
/// `Arc`. Nothing is persisted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner.lock().map_err(|e| VibeError::Storage(e.to_string()))
    }

    /// Store (or replace) a manifest
    pub fn set_manifest(&self, id: impl Into<String>, manifest: Manifest) -> Result<()> {
        self.lock()?.manifests.insert(id.into(), manifest);
        Ok(())
    }

    pub fn get_manifest(&self, id: &str) -> Result<Option<Manifest>> {
        Ok(self.lock()?.manifests.get(id).cloned())
    }

    /// Like `get_manifest`, but a missing id is an error
    pub fn require_manifest(&self, id: &str) -> Result<Manifest> {
        self.get_manifest(id)?
            .ok_or_else(|| VibeError::ManifestNotFound(id.to_string()))
    }

    /// Remove a manifest together with its loop history
    pub fn delete_manifest(&self, id: &str) -> Result<()> {
        let mut inner = self.lock()?;
        inner.manifests.remove(id);
        inner.histories.remove(id);
        Ok(())
    }

    /// Manifest ids, sorted
    pub fn list_manifests(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self.lock()?.manifests.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    pub fn manifest_count(&self) -> Result<usize> {
        Ok(self.lock()?.manifests.len())
    }

    pub fn append_loop_result(&self, id: &str, result: LoopResult) -> Result<()> {
        self.lock()?.histories.entry(id.to_string()).or_default().push(result);
        Ok(())
    }

    /// Loop history for a manifest (empty when none was recorded)
    pub fn loop_history(&self, id: &str) -> Result<Vec<LoopResult>> {
        Ok(self.lock()?.histories.get(id).cloned().unwrap_or_default())
    }

    pub fn clear_loop_history(&self, id: &str) -> Result<()> {
        self.lock()?.histories.remove(id);
        Ok(())
    }

    /// Drop all manifests and histories
    pub fn clear(&self) -> Result<()> {
        let mut inner = self.lock()?;
        inner.manifests.clear();
        inner.histories.clear();
        Ok(())
    }
}
