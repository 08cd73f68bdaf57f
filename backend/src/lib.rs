//! # Baby Tracker Backend
//!
//! Document-based core for a baby-tracking app. A document is one log:
//! one baby profile plus one store of timestamped childcare events
//! (feedings, diaper changes, naps, and so on), persisted as a JSON file.
//! This crate provides:
//! - Domain models and per-kind event CRUD with undo tracking
//! - The archive codec between a log and its on-disk payload
//! - Document lifecycle services (create/open/save/revert)
//! - The conflict resolution flow for competing multi-device revisions
//!
//! The presentation layer lives elsewhere; it drives these services and
//! renders the DTOs from the `shared` crate.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

pub mod domain;
pub mod storage;

pub use storage::json::JsonConnection;

use domain::{BabyService, ConflictService, DocumentService, EventService};
use storage::json::{LogRepository, VersionRepository};

/// Main backend struct that orchestrates all services
pub struct Backend {
    pub event_service: EventService,
    pub baby_service: BabyService,
    pub document_service: DocumentService,
    pub conflict_service: ConflictService,
}

impl Backend {
    /// Create a backend rooted at the platform documents directory
    pub fn new() -> Result<Self> {
        let base = dirs::document_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine the documents directory"))?
            .join("BabyTracker");
        Self::with_data_directory(base)
    }

    /// Create a backend rooted at an explicit data directory
    pub fn with_data_directory<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let connection = Arc::new(JsonConnection::new(base_directory)?);
        let repository = LogRepository::new(connection.clone());
        let versions = Arc::new(VersionRepository::new(connection));

        let document_service = DocumentService::new(repository.clone());
        let conflict_service = ConflictService::new(
            versions,
            repository,
            document_service.state_handle(),
        );

        Ok(Self {
            event_service: EventService::new(),
            baby_service: BabyService::new(),
            document_service,
            conflict_service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::baby::UpdateBabyCommand;
    use crate::domain::commands::conflicts::{
        CheckConflictsCommand, PresentConflictsCommand, ResolveConflictCommand,
    };
    use crate::domain::commands::documents::{CreateDocumentCommand, SaveDocumentCommand};
    use crate::domain::commands::events::{CreateEventCommand, EventListQuery};
    use crate::domain::models::archive::Archive;
    use crate::domain::models::event::{EventDetails, FeedSource};
    use chrono::Utc;
    use shared::{ConflictChoice, DocumentState};
    use tempfile::TempDir;

    /// End-to-end pass over the whole stack: create a document, fill in
    /// the profile, record events, save, stash a remote revision, and
    /// walk the conflict flow.
    #[test]
    fn test_document_lifecycle_with_conflict() {
        let temp_dir = TempDir::new().unwrap();
        let backend = Backend::with_data_directory(temp_dir.path()).unwrap();

        let created = backend
            .document_service
            .create_document(CreateDocumentCommand {
                name: "Emma".to_string(),
            })
            .unwrap();
        let mut log = created.log;
        let document_id = created.document_id;

        backend
            .baby_service
            .update_baby(
                &mut log,
                UpdateBabyCommand {
                    name: Some("Emma".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        backend
            .event_service
            .create_event(
                &mut log,
                CreateEventCommand {
                    date: None,
                    details: EventDetails::Feed {
                        source: FeedSource::Bottle,
                        measurement: None,
                    },
                },
            )
            .unwrap();
        backend
            .document_service
            .save_document(
                SaveDocumentCommand {
                    document_id: document_id.clone(),
                },
                &log,
            )
            .unwrap();

        let listed = backend
            .event_service
            .list_events(&log, EventListQuery::default())
            .unwrap();
        assert_eq!(listed.events.len(), 1);

        // a second device lands a competing revision
        let mut remote_log = log.clone();
        backend
            .baby_service
            .update_baby(
                &mut remote_log,
                UpdateBabyCommand {
                    name: Some("Emma (from Phone)".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        let versions = storage::json::VersionRepository::new(Arc::new(
            JsonConnection::new(temp_dir.path()).unwrap(),
        ));
        versions
            .stash_version(
                &document_id,
                "Phone",
                Utc::now(),
                &Archive::from(&remote_log).encode().unwrap(),
            )
            .unwrap();

        let check = backend
            .conflict_service
            .check_for_conflicts(CheckConflictsCommand {
                document_id: document_id.clone(),
            })
            .unwrap();
        assert!(check.conflicts_found);
        assert_eq!(backend.document_service.state(), DocumentState::InConflict);

        let presented = backend
            .conflict_service
            .present_conflicts(PresentConflictsCommand {
                document_id: document_id.clone(),
            })
            .unwrap();
        let version_id = presented.presentation.groups[0].versions[0]
            .version_id
            .clone();

        let resolved = backend
            .conflict_service
            .resolve_conflict(ResolveConflictCommand {
                document_id: document_id.clone(),
                choice: ConflictChoice::Replace { version_id },
            })
            .unwrap();
        assert_eq!(resolved.log.baby().name, "Emma (from Phone)");
        assert!(resolved.cleanup_failures.is_empty());
        assert_eq!(backend.document_service.state(), DocumentState::Normal);

        let recheck = backend
            .conflict_service
            .check_for_conflicts(CheckConflictsCommand { document_id })
            .unwrap();
        assert!(!recheck.conflicts_found);
    }
}
