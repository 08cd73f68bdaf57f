use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use super::connection::JsonConnection;
use crate::domain::models::version::FileVersion;
use crate::storage::traits::VersionStorage;

/// Intermediate struct for YAML serialization with string date fields
#[derive(Debug, Clone, Serialize, Deserialize)]
struct YamlVersionMeta {
    id: String,
    device: String,
    modified_at: String, // String representation for YAML
    is_resolved: bool,
}

/// Sidecar-directory version store.
///
/// Each competing revision of a document lives in its
/// `<document_id>.babylog.versions/` directory as `<version_id>.json`
/// (the payload) plus `<version_id>.yaml` (metadata). The sync layer
/// stashes revisions here when it lands a remote copy next to the local
/// one; the conflict flow consumes and clears them.
#[derive(Clone)]
pub struct VersionRepository {
    connection: Arc<JsonConnection>,
}

impl VersionRepository {
    /// Create a new sidecar version repository
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self { connection }
    }

    /// Register a competing revision for a document. Returns the recorded
    /// version entry.
    pub fn stash_version(
        &self,
        document_id: &str,
        device: &str,
        modified_at: DateTime<Utc>,
        payload: &[u8],
    ) -> Result<FileVersion> {
        let dir = self.connection.versions_directory(document_id);
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
            info!("Created versions directory: {:?}", dir);
        }

        let version = FileVersion {
            id: Self::generate_version_id(modified_at),
            device: device.to_string(),
            modified_at,
            is_resolved: false,
        };

        // Atomic writes using temp files
        let payload_path = self.payload_path(document_id, &version.id);
        let temp_path = payload_path.with_extension("tmp");
        fs::write(&temp_path, payload)?;
        fs::rename(&temp_path, &payload_path)?;

        self.save_meta(document_id, &version)?;

        info!(
            "Stashed version {} from '{}' for document '{}'",
            version.id, device, document_id
        );
        Ok(version)
    }

    /// Generate a unique version ID.
    /// Format: v-<timestamp_ms>-<random_suffix>
    fn generate_version_id(modified_at: DateTime<Utc>) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        format!(
            "v-{}-{:04x}",
            modified_at.timestamp_millis(),
            nanos % 0x10000
        )
    }

    fn payload_path(&self, document_id: &str, version_id: &str) -> PathBuf {
        self.connection
            .versions_directory(document_id)
            .join(format!("{}.json", version_id))
    }

    fn meta_path(&self, document_id: &str, version_id: &str) -> PathBuf {
        self.connection
            .versions_directory(document_id)
            .join(format!("{}.yaml", version_id))
    }

    fn load_meta(&self, document_id: &str, version_id: &str) -> Result<FileVersion> {
        let path = self.meta_path(document_id, version_id);
        let yaml_content = fs::read_to_string(&path)?;
        let meta: YamlVersionMeta = serde_yaml::from_str(&yaml_content)?;

        Ok(FileVersion {
            id: meta.id,
            device: meta.device,
            modified_at: DateTime::parse_from_rfc3339(&meta.modified_at)
                .map_err(|e| anyhow::anyhow!("Failed to parse modified_at: {}", e))?
                .with_timezone(&Utc),
            is_resolved: meta.is_resolved,
        })
    }

    fn save_meta(&self, document_id: &str, version: &FileVersion) -> Result<()> {
        let meta = YamlVersionMeta {
            id: version.id.clone(),
            device: version.device.clone(),
            modified_at: version.modified_at.to_rfc3339(),
            is_resolved: version.is_resolved,
        };
        let yaml_content = serde_yaml::to_string(&meta)?;

        let path = self.meta_path(document_id, &version.id);
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, &path)?;
        Ok(())
    }
}

impl VersionStorage for VersionRepository {
    /// Enumerate the revisions competing with a document's local copy
    fn list_competing_versions(&self, document_id: &str) -> Result<Vec<FileVersion>> {
        let dir = self.connection.versions_directory(document_id);
        if !dir.exists() {
            debug!("No versions directory for document '{}'", document_id);
            return Ok(Vec::new());
        }

        let mut versions = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            let version_id = match path.file_stem().and_then(|s| s.to_str()) {
                Some(stem) => stem.to_string(),
                None => {
                    warn!("Skipping version file with invalid name: {:?}", path);
                    continue;
                }
            };
            match self.load_meta(document_id, &version_id) {
                Ok(version) => versions.push(version),
                Err(e) => {
                    warn!(
                        "Error loading version metadata from {:?}: {}",
                        path, e
                    );
                }
            }
        }

        // Sort by modification time for consistent ordering
        versions.sort_by(|a, b| a.modified_at.cmp(&b.modified_at));
        debug!(
            "Found {} competing versions for document '{}'",
            versions.len(),
            document_id
        );
        Ok(versions)
    }

    /// Raw payload of one competing revision
    fn load_version_payload(&self, document_id: &str, version_id: &str) -> Result<Vec<u8>> {
        let path = self.payload_path(document_id, version_id);
        if !path.exists() {
            return Err(anyhow::anyhow!(
                "No payload for version '{}' of document '{}'",
                version_id,
                document_id
            ));
        }
        Ok(fs::read(&path)?)
    }

    /// Flag a revision as settled without removing it
    fn mark_resolved(&self, document_id: &str, version_id: &str) -> Result<()> {
        let mut version = self.load_meta(document_id, version_id)?;
        version.is_resolved = true;
        self.save_meta(document_id, &version)?;
        debug!(
            "Marked version {} of document '{}' as resolved",
            version_id, document_id
        );
        Ok(())
    }

    /// Drop a revision from the candidate set
    fn remove_version(&self, document_id: &str, version_id: &str) -> Result<()> {
        let payload_path = self.payload_path(document_id, version_id);
        let meta_path = self.meta_path(document_id, version_id);

        if payload_path.exists() {
            fs::remove_file(&payload_path)?;
        }
        if meta_path.exists() {
            fs::remove_file(&meta_path)?;
            info!(
                "Removed version {} of document '{}'",
                version_id, document_id
            );
        } else {
            warn!(
                "Attempted to remove non-existent version {} of document '{}'",
                version_id, document_id
            );
        }

        // Drop the sidecar directory once the last version is gone
        let dir = self.connection.versions_directory(document_id);
        if dir.exists() && fs::read_dir(&dir)?.next().is_none() {
            let _ = fs::remove_dir(&dir);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_repo() -> (VersionRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(temp_dir.path()).unwrap();
        let repo = VersionRepository::new(Arc::new(connection));
        (repo, temp_dir)
    }

    #[test]
    fn test_stash_and_list_versions() {
        let (repo, _temp_dir) = setup_test_repo();

        let earlier = Utc::now() - chrono::Duration::minutes(10);
        let later = Utc::now();
        repo.stash_version("emma", "Phone", later, b"{}").unwrap();
        repo.stash_version("emma", "Tablet", earlier, b"{}").unwrap();

        let versions = repo.list_competing_versions("emma").unwrap();
        assert_eq!(versions.len(), 2);
        // sorted by modification time ascending
        assert_eq!(versions[0].device, "Tablet");
        assert_eq!(versions[1].device, "Phone");
        assert!(versions.iter().all(|v| !v.is_resolved));
    }

    #[test]
    fn test_no_versions_directory_is_empty() {
        let (repo, _temp_dir) = setup_test_repo();
        assert!(repo.list_competing_versions("emma").unwrap().is_empty());
    }

    #[test]
    fn test_payload_round_trip() {
        let (repo, _temp_dir) = setup_test_repo();
        let version = repo
            .stash_version("emma", "Phone", Utc::now(), b"payload-bytes")
            .unwrap();

        let payload = repo.load_version_payload("emma", &version.id).unwrap();
        assert_eq!(payload, b"payload-bytes");
    }

    #[test]
    fn test_mark_resolved_persists() {
        let (repo, _temp_dir) = setup_test_repo();
        let version = repo
            .stash_version("emma", "Phone", Utc::now(), b"{}")
            .unwrap();

        repo.mark_resolved("emma", &version.id).unwrap();

        let versions = repo.list_competing_versions("emma").unwrap();
        assert_eq!(versions.len(), 1);
        assert!(versions[0].is_resolved);
    }

    #[test]
    fn test_remove_version_clears_sidecars() {
        let (repo, temp_dir) = setup_test_repo();
        let version = repo
            .stash_version("emma", "Phone", Utc::now(), b"{}")
            .unwrap();

        repo.remove_version("emma", &version.id).unwrap();

        assert!(repo.list_competing_versions("emma").unwrap().is_empty());
        assert!(repo.load_version_payload("emma", &version.id).is_err());
        // the empty sidecar directory is gone too
        assert!(!temp_dir.path().join("emma.babylog.versions").exists());
    }
}
