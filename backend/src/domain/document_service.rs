//! Document lifecycle domain logic.
//!
//! A document is one log persisted as one file. This service owns the
//! create/open/save/revert flow and tracks the last observed document
//! state for the UI to poll. The conflict flow shares the same state
//! handle so a detected conflict is visible here too.

use anyhow::{anyhow, Result};
use log::{error, info, warn};
use shared::{DocumentState, DocumentSummary};
use std::sync::{Arc, Mutex};

use crate::domain::commands::documents::{
    CreateDocumentCommand, CreateDocumentResult, DeleteDocumentCommand, DeleteDocumentResult,
    ListDocumentsResult, OpenDocumentCommand, OpenDocumentResult, RevertDocumentCommand,
    RevertDocumentResult, SaveDocumentCommand, SaveDocumentResult,
};
use crate::domain::models::archive::Archive;
use crate::domain::models::baby::Baby;
use crate::domain::models::log::Log;
use crate::storage::json::{JsonConnection, LogRepository};
use crate::storage::traits::LogStorage;

/// Service managing document lifecycle: create, open, save, revert
#[derive(Clone)]
pub struct DocumentService {
    repository: LogRepository,
    state: Arc<Mutex<DocumentState>>,
}

impl DocumentService {
    /// Create a new DocumentService
    pub fn new(repository: LogRepository) -> Self {
        Self {
            repository,
            state: Arc::new(Mutex::new(DocumentState::Normal)),
        }
    }

    /// Last observed document state, for the UI to poll
    pub fn state(&self) -> DocumentState {
        *self.state.lock().unwrap()
    }

    /// Handle shared with the conflict flow so both report through one state
    pub(crate) fn state_handle(&self) -> Arc<Mutex<DocumentState>> {
        self.state.clone()
    }

    fn set_state(&self, state: DocumentState) {
        *self.state.lock().unwrap() = state;
    }

    /// Create a new document with a placeholder profile
    pub fn create_document(&self, command: CreateDocumentCommand) -> Result<CreateDocumentResult> {
        if command.name.trim().is_empty() {
            return Err(anyhow!("Document name cannot be empty"));
        }

        let document_id = JsonConnection::generate_safe_document_name(&command.name);
        if document_id.is_empty() {
            return Err(anyhow!("Document name has no usable characters"));
        }
        if self.repository.document_exists(&document_id)? {
            return Err(anyhow!("A document named '{}' already exists", document_id));
        }

        let log = Log::new(Baby::placeholder());
        self.repository
            .save_document(&document_id, &Archive::from(&log))?;
        self.set_state(DocumentState::Normal);

        info!("Created document: {}", document_id);

        Ok(CreateDocumentResult { document_id, log })
    }

    /// Open an existing document
    pub fn open_document(&self, command: OpenDocumentCommand) -> Result<OpenDocumentResult> {
        let archive = self
            .repository
            .load_document(&command.document_id)?
            .ok_or_else(|| anyhow!("Document not found: {}", command.document_id))?;
        self.set_state(DocumentState::Normal);

        info!("Opened document: {}", command.document_id);

        Ok(OpenDocumentResult {
            log: archive.into_log(),
        })
    }

    /// Persist the open log to its document
    pub fn save_document(&self, command: SaveDocumentCommand, log: &Log) -> Result<SaveDocumentResult> {
        match self
            .repository
            .save_document(&command.document_id, &Archive::from(log))
        {
            Ok(()) => {
                self.set_state(DocumentState::Normal);
                info!("Saved document: {}", command.document_id);
                Ok(SaveDocumentResult {
                    success_message: format!("Saved '{}'", command.document_id),
                })
            }
            Err(e) => {
                self.set_state(DocumentState::SavingError);
                error!("Failed to save document {}: {}", command.document_id, e);
                Err(e)
            }
        }
    }

    /// Discard in-memory changes and reload the on-disk copy
    pub fn revert_document(&self, command: RevertDocumentCommand) -> Result<RevertDocumentResult> {
        let archive = self
            .repository
            .load_document(&command.document_id)?
            .ok_or_else(|| anyhow!("Document not found: {}", command.document_id))?;
        self.set_state(DocumentState::Normal);

        info!("Reverted document {} to its on-disk copy", command.document_id);

        Ok(RevertDocumentResult {
            log: archive.into_log(),
        })
    }

    /// List all documents as picker rows
    pub fn list_documents(&self) -> Result<ListDocumentsResult> {
        let mut documents = Vec::new();
        for document_id in self.repository.list_documents()? {
            match self.repository.load_document(&document_id) {
                Ok(Some(archive)) => documents.push(DocumentSummary {
                    document_id,
                    baby_name: archive.baby.name,
                    baby_emoji: archive.baby.emoji,
                    prefers_emoji: archive.baby.prefers_emoji,
                }),
                Ok(None) => {}
                Err(e) => {
                    warn!("Skipping unreadable document {}: {}", document_id, e);
                }
            }
        }

        info!("Found {} documents", documents.len());
        Ok(ListDocumentsResult { documents })
    }

    /// Delete a document
    pub fn delete_document(&self, command: DeleteDocumentCommand) -> Result<DeleteDocumentResult> {
        if !self.repository.document_exists(&command.document_id)? {
            return Err(anyhow!("Document not found: {}", command.document_id));
        }
        self.repository.delete_document(&command.document_id)?;

        info!("Deleted document: {}", command.document_id);

        Ok(DeleteDocumentResult {
            success_message: format!("Document '{}' deleted successfully", command.document_id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn setup_test() -> (DocumentService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(temp_dir.path()).unwrap();
        let service = DocumentService::new(LogRepository::new(Arc::new(connection)));
        (service, temp_dir)
    }

    #[test]
    fn test_create_document() {
        let (service, _temp_dir) = setup_test();
        let result = service
            .create_document(CreateDocumentCommand {
                name: "Emma Smith".to_string(),
            })
            .unwrap();

        assert_eq!(result.document_id, "emma_smith");
        assert!(result.log.baby().is_placeholder());
        assert_eq!(service.state(), DocumentState::Normal);
    }

    #[test]
    fn test_create_document_validation() {
        let (service, _temp_dir) = setup_test();

        assert!(service
            .create_document(CreateDocumentCommand {
                name: "  ".to_string(),
            })
            .is_err());

        service
            .create_document(CreateDocumentCommand {
                name: "Emma".to_string(),
            })
            .unwrap();
        // creating a second document at the same location is rejected
        assert!(service
            .create_document(CreateDocumentCommand {
                name: "Emma".to_string(),
            })
            .is_err());
    }

    #[test]
    fn test_save_and_open_round_trip() {
        let (service, _temp_dir) = setup_test();
        let created = service
            .create_document(CreateDocumentCommand {
                name: "Emma".to_string(),
            })
            .unwrap();

        let mut log = created.log;
        let mut baby = log.baby().clone();
        baby.name = "Emma".to_string();
        log.set_baby(baby);
        service
            .save_document(
                SaveDocumentCommand {
                    document_id: created.document_id.clone(),
                },
                &log,
            )
            .unwrap();

        let opened = service
            .open_document(OpenDocumentCommand {
                document_id: created.document_id,
            })
            .unwrap();
        assert_eq!(opened.log.baby().name, "Emma");
        assert!(!opened.log.can_undo());
    }

    #[test]
    fn test_open_missing_document_fails() {
        let (service, _temp_dir) = setup_test();
        assert!(service
            .open_document(OpenDocumentCommand {
                document_id: "nobody".to_string(),
            })
            .is_err());
    }

    #[test]
    fn test_revert_discards_in_memory_changes() {
        let (service, _temp_dir) = setup_test();
        let created = service
            .create_document(CreateDocumentCommand {
                name: "Emma".to_string(),
            })
            .unwrap();

        let mut log = created.log;
        let mut baby = log.baby().clone();
        baby.name = "Unsaved Name".to_string();
        log.set_baby(baby);

        let reverted = service
            .revert_document(RevertDocumentCommand {
                document_id: created.document_id,
            })
            .unwrap();
        assert!(reverted.log.baby().is_placeholder());
    }

    #[test]
    fn test_list_documents_as_picker_rows() {
        let (service, _temp_dir) = setup_test();
        for name in ["Emma", "Zoe"] {
            let created = service
                .create_document(CreateDocumentCommand {
                    name: name.to_string(),
                })
                .unwrap();
            let mut log = created.log;
            let mut baby = log.baby().clone();
            baby.name = name.to_string();
            log.set_baby(baby);
            service
                .save_document(
                    SaveDocumentCommand {
                        document_id: created.document_id,
                    },
                    &log,
                )
                .unwrap();
        }

        let listing = service.list_documents().unwrap();
        assert_eq!(listing.documents.len(), 2);
        assert_eq!(listing.documents[0].baby_name, "Emma");
        assert_eq!(listing.documents[1].baby_name, "Zoe");
    }

    #[test]
    fn test_delete_document() {
        let (service, _temp_dir) = setup_test();
        let created = service
            .create_document(CreateDocumentCommand {
                name: "Emma".to_string(),
            })
            .unwrap();

        service
            .delete_document(DeleteDocumentCommand {
                document_id: created.document_id.clone(),
            })
            .unwrap();

        assert!(service
            .delete_document(DeleteDocumentCommand {
                document_id: created.document_id,
            })
            .is_err());
    }
}
