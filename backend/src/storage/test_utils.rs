//! Shared test fixtures for storage-dependent tests.

use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::models::version::FileVersion;
use crate::storage::traits::VersionStorage;

/// In-memory version store for exercising the conflict flow without a
/// real sync backend.
#[derive(Default)]
pub struct InMemoryVersionStore {
    versions: Mutex<HashMap<String, Vec<(FileVersion, Vec<u8>)>>>,
    /// Version ids whose cleanup calls fail, for cleanup-error tests
    fail_cleanup_for: Mutex<Vec<String>>,
}

impl InMemoryVersionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_version(&self, document_id: &str, version: FileVersion, payload: Vec<u8>) {
        self.versions
            .lock()
            .unwrap()
            .entry(document_id.to_string())
            .or_default()
            .push((version, payload));
    }

    /// Make future cleanup calls for `version_id` fail.
    pub fn inject_cleanup_failure(&self, version_id: &str) {
        self.fail_cleanup_for
            .lock()
            .unwrap()
            .push(version_id.to_string());
    }

    pub fn contains(&self, document_id: &str, version_id: &str) -> bool {
        self.versions
            .lock()
            .unwrap()
            .get(document_id)
            .map(|entries| entries.iter().any(|(v, _)| v.id == version_id))
            .unwrap_or(false)
    }

    fn check_cleanup_failure(&self, version_id: &str) -> Result<()> {
        if self
            .fail_cleanup_for
            .lock()
            .unwrap()
            .iter()
            .any(|id| id == version_id)
        {
            return Err(anyhow!("injected cleanup failure for {}", version_id));
        }
        Ok(())
    }
}

impl VersionStorage for InMemoryVersionStore {
    fn list_competing_versions(&self, document_id: &str) -> Result<Vec<FileVersion>> {
        Ok(self
            .versions
            .lock()
            .unwrap()
            .get(document_id)
            .map(|entries| entries.iter().map(|(v, _)| v.clone()).collect())
            .unwrap_or_default())
    }

    fn load_version_payload(&self, document_id: &str, version_id: &str) -> Result<Vec<u8>> {
        self.versions
            .lock()
            .unwrap()
            .get(document_id)
            .and_then(|entries| {
                entries
                    .iter()
                    .find(|(v, _)| v.id == version_id)
                    .map(|(_, payload)| payload.clone())
            })
            .ok_or_else(|| anyhow!("no version {} for document {}", version_id, document_id))
    }

    fn mark_resolved(&self, document_id: &str, version_id: &str) -> Result<()> {
        self.check_cleanup_failure(version_id)?;
        let mut versions = self.versions.lock().unwrap();
        let entries = versions
            .get_mut(document_id)
            .ok_or_else(|| anyhow!("no versions for document {}", document_id))?;
        let entry = entries
            .iter_mut()
            .find(|(v, _)| v.id == version_id)
            .ok_or_else(|| anyhow!("no version {} for document {}", version_id, document_id))?;
        entry.0.is_resolved = true;
        Ok(())
    }

    fn remove_version(&self, document_id: &str, version_id: &str) -> Result<()> {
        self.check_cleanup_failure(version_id)?;
        if let Some(entries) = self.versions.lock().unwrap().get_mut(document_id) {
            entries.retain(|(v, _)| v.id != version_id);
        }
        Ok(())
    }
}
