use anyhow::Result;
use log::{info, warn};
use std::fs;
use std::sync::Arc;

use super::connection::JsonConnection;
use crate::domain::models::archive::Archive;
use crate::storage::traits::LogStorage;

const DOCUMENT_SUFFIX: &str = ".babylog.json";

/// JSON-file document repository
#[derive(Clone)]
pub struct LogRepository {
    connection: Arc<JsonConnection>,
}

impl LogRepository {
    /// Create a new JSON document repository
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self { connection }
    }
}

impl LogStorage for LogRepository {
    /// Persist a document payload to its location
    fn save_document(&self, document_id: &str, archive: &Archive) -> Result<()> {
        let path = self.connection.document_path(document_id);
        let payload = archive.encode()?;

        // Atomic write using temp file
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, payload)?;
        fs::rename(&temp_path, &path)?;

        info!("Saved document '{}' to {:?}", document_id, path);
        Ok(())
    }

    /// Load a document payload; `None` if nothing exists at the location
    fn load_document(&self, document_id: &str) -> Result<Option<Archive>> {
        let path = self.connection.document_path(document_id);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path)?;
        Ok(Some(Archive::decode(&bytes)?))
    }

    /// List all document identifiers by scanning the base directory
    fn list_documents(&self) -> Result<Vec<String>> {
        let base_dir = self.connection.base_directory();
        if !base_dir.exists() {
            return Ok(Vec::new());
        }

        let mut documents = Vec::new();
        for entry in fs::read_dir(base_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let file_name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => {
                    warn!("Skipping file with invalid name: {:?}", path);
                    continue;
                }
            };
            if let Some(document_id) = file_name.strip_suffix(DOCUMENT_SUFFIX) {
                documents.push(document_id.to_string());
            }
        }

        // Sort for consistent ordering
        documents.sort();
        Ok(documents)
    }

    /// Delete a document along with any version sidecars
    fn delete_document(&self, document_id: &str) -> Result<()> {
        let path = self.connection.document_path(document_id);
        if path.exists() {
            fs::remove_file(&path)?;
            info!("Deleted document: {:?}", path);
        } else {
            warn!("Attempted to delete a non-existent document: {}", document_id);
        }

        let versions_dir = self.connection.versions_directory(document_id);
        if versions_dir.exists() {
            fs::remove_dir_all(&versions_dir)?;
            info!("Deleted version sidecars: {:?}", versions_dir);
        }
        Ok(())
    }

    /// Whether a document exists at the location
    fn document_exists(&self, document_id: &str) -> Result<bool> {
        Ok(self.connection.document_path(document_id).exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::baby::Baby;
    use crate::domain::models::event::{Event, FeedEvent, FeedSource};
    use crate::domain::models::log::Log;
    use chrono::Utc;
    use tempfile::TempDir;

    fn setup_test_repo() -> (LogRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(temp_dir.path()).unwrap();
        let repo = LogRepository::new(Arc::new(connection));
        (repo, temp_dir)
    }

    fn sample_archive(name: &str) -> Archive {
        let mut baby = Baby::placeholder();
        baby.name = name.to_string();
        let mut log = Log::new(baby);
        log.save_event(Event::Feed(FeedEvent {
            id: "feed-1-aaaa".to_string(),
            date: Utc::now(),
            source: FeedSource::Bottle,
            measurement: None,
        }));
        Archive::from(&log)
    }

    #[test]
    fn test_save_and_load_document() {
        let (repo, _temp_dir) = setup_test_repo();
        let archive = sample_archive("Emma");

        repo.save_document("emma", &archive).unwrap();
        let loaded = repo.load_document("emma").unwrap().unwrap();

        assert_eq!(loaded, archive);
        assert!(repo.document_exists("emma").unwrap());
    }

    #[test]
    fn test_load_missing_document_is_none() {
        let (repo, _temp_dir) = setup_test_repo();
        assert!(repo.load_document("nobody").unwrap().is_none());
        assert!(!repo.document_exists("nobody").unwrap());
    }

    #[test]
    fn test_list_documents_sorted() {
        let (repo, _temp_dir) = setup_test_repo();
        repo.save_document("zoe", &sample_archive("Zoe")).unwrap();
        repo.save_document("emma", &sample_archive("Emma")).unwrap();

        assert_eq!(
            repo.list_documents().unwrap(),
            vec!["emma".to_string(), "zoe".to_string()]
        );
    }

    #[test]
    fn test_list_ignores_unrelated_files() {
        let (repo, temp_dir) = setup_test_repo();
        repo.save_document("emma", &sample_archive("Emma")).unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "unrelated").unwrap();

        assert_eq!(repo.list_documents().unwrap(), vec!["emma".to_string()]);
    }

    #[test]
    fn test_delete_document_is_idempotent() {
        let (repo, _temp_dir) = setup_test_repo();
        repo.save_document("emma", &sample_archive("Emma")).unwrap();

        repo.delete_document("emma").unwrap();
        assert!(!repo.document_exists("emma").unwrap());
        // deleting again is a no-op, not an error
        repo.delete_document("emma").unwrap();
    }

    #[test]
    fn test_load_corrupted_document_fails() {
        let (repo, temp_dir) = setup_test_repo();
        fs::write(
            temp_dir.path().join("broken.babylog.json"),
            "{ not valid json",
        )
        .unwrap();

        assert!(repo.load_document("broken").is_err());
    }
}
