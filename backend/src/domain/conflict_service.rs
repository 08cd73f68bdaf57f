//! Conflict resolution domain logic.
//!
//! When the sync layer lands competing revisions of a document next to
//! the local copy, this service mediates the flow: detect the candidates,
//! present them grouped by originating device, apply the user's choice,
//! and reconcile the version set. Resolution is never automatic; event
//! data is not safely auto-mergeable, so a user decision is always
//! required.

use anyhow::{anyhow, Result};
use log::{info, warn};
use shared::{
    ConflictChoice, ConflictGroup, ConflictPresentation, ConflictVersionSummary, DocumentState,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::domain::commands::conflicts::{
    CheckConflictsCommand, CheckConflictsResult, PresentConflictsCommand, PresentConflictsResult,
    ResolveConflictCommand, ResolveConflictResult,
};
use crate::domain::models::archive::Archive;
use crate::domain::models::version::FileVersion;
use crate::storage::json::LogRepository;
use crate::storage::traits::{LogStorage, VersionStorage};

/// Where the resolver currently is in the conflict flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPhase {
    /// Single authoritative on-disk version
    Normal,
    /// Competing versions reported by the version store
    Detected,
    /// The candidate set is in front of the user
    Presenting,
    /// A user choice is being applied
    Resolving,
}

/// Mapper from domain versions to the presentation DTOs the UI renders.
struct VersionMapper;

impl VersionMapper {
    fn to_dto(version: &FileVersion) -> ConflictVersionSummary {
        ConflictVersionSummary {
            version_id: version.id.clone(),
            device: version.device.clone(),
            modified_at: version.modified_at.to_rfc3339(),
        }
    }
}

/// Service driving the conflict resolution state machine
#[derive(Clone)]
pub struct ConflictService {
    versions: Arc<dyn VersionStorage>,
    repository: LogRepository,
    phase: Arc<Mutex<ConflictPhase>>,
    document_state: Arc<Mutex<DocumentState>>,
}

impl ConflictService {
    /// Create a new ConflictService. The document state handle is shared
    /// with the document service so both report through one state.
    pub fn new(
        versions: Arc<dyn VersionStorage>,
        repository: LogRepository,
        document_state: Arc<Mutex<DocumentState>>,
    ) -> Self {
        Self {
            versions,
            repository,
            phase: Arc::new(Mutex::new(ConflictPhase::Normal)),
            document_state,
        }
    }

    /// Current phase of the conflict flow
    pub fn phase(&self) -> ConflictPhase {
        *self.phase.lock().unwrap()
    }

    fn set_phase(&self, phase: ConflictPhase) {
        *self.phase.lock().unwrap() = phase;
    }

    fn set_document_state(&self, state: DocumentState) {
        *self.document_state.lock().unwrap() = state;
    }

    /// Ask the version store whether competing revisions exist
    pub fn check_for_conflicts(&self, command: CheckConflictsCommand) -> Result<CheckConflictsResult> {
        let versions = self.unresolved_versions(&command.document_id)?;

        if versions.is_empty() {
            self.set_phase(ConflictPhase::Normal);
            return Ok(CheckConflictsResult {
                conflicts_found: false,
                version_count: 0,
            });
        }

        self.set_phase(ConflictPhase::Detected);
        self.set_document_state(DocumentState::InConflict);
        info!(
            "Detected {} competing versions for document '{}'",
            versions.len(),
            command.document_id
        );

        Ok(CheckConflictsResult {
            conflicts_found: true,
            version_count: versions.len(),
        })
    }

    /// Build the grouped presentation of competing versions
    pub fn present_conflicts(&self, command: PresentConflictsCommand) -> Result<PresentConflictsResult> {
        let versions = self.unresolved_versions(&command.document_id)?;
        if versions.is_empty() {
            return Err(anyhow!(
                "No competing versions to present for document '{}'",
                command.document_id
            ));
        }

        let groups = Self::group_by_device(&versions);
        self.set_phase(ConflictPhase::Presenting);

        Ok(PresentConflictsResult {
            presentation: ConflictPresentation {
                document_id: command.document_id,
                groups,
            },
        })
    }

    /// Group versions by originating device; within a group, sort by
    /// modification time ascending. The UI shows single-version groups
    /// directly and renders larger groups as drill-in summaries.
    fn group_by_device(versions: &[FileVersion]) -> Vec<ConflictGroup> {
        let mut by_device: BTreeMap<String, Vec<&FileVersion>> = BTreeMap::new();
        for version in versions {
            by_device
                .entry(version.device.clone())
                .or_default()
                .push(version);
        }

        by_device
            .into_iter()
            .map(|(device, mut group)| {
                group.sort_by(|a, b| a.modified_at.cmp(&b.modified_at));
                ConflictGroup {
                    device,
                    versions: group.iter().map(|v| VersionMapper::to_dto(v)).collect(),
                }
            })
            .collect()
    }

    /// Apply the user's decision and reconcile the version set.
    ///
    /// The chosen content takes effect even when cleanup of the losing
    /// versions fails; failed ids come back in `cleanup_failures` and the
    /// stragglers can be retried on a later pass.
    pub fn resolve_conflict(&self, command: ResolveConflictCommand) -> Result<ResolveConflictResult> {
        self.set_phase(ConflictPhase::Resolving);
        let document_id = &command.document_id;
        let versions = self.unresolved_versions(document_id)?;

        let log = match &command.choice {
            ConflictChoice::Revert => {
                let archive = self
                    .repository
                    .load_document(document_id)?
                    .ok_or_else(|| anyhow!("Document not found: {}", document_id))?;
                info!("Reverting document '{}' to the local on-disk copy", document_id);
                archive.into_log()
            }
            ConflictChoice::Replace { version_id } => {
                if !versions.iter().any(|v| v.id == *version_id) {
                    self.set_phase(ConflictPhase::Presenting);
                    return Err(anyhow!(
                        "Unknown version '{}' for document '{}'",
                        version_id,
                        document_id
                    ));
                }
                let payload = self.versions.load_version_payload(document_id, version_id)?;
                let archive = Archive::decode(&payload)?;
                self.repository.save_document(document_id, &archive)?;
                info!(
                    "Replaced document '{}' with version {}",
                    document_id, version_id
                );
                archive.into_log()
            }
        };

        // every candidate is marked resolved and removed; the winner's
        // content already lives on as the document itself
        let mut cleanup_failures = Vec::new();
        for version in &versions {
            let cleaned = self
                .versions
                .mark_resolved(document_id, &version.id)
                .and_then(|_| self.versions.remove_version(document_id, &version.id));
            if let Err(e) = cleaned {
                warn!(
                    "Failed to clean up version {} of document '{}': {}",
                    version.id, document_id, e
                );
                cleanup_failures.push(version.id.clone());
            }
        }

        self.set_phase(ConflictPhase::Normal);
        self.set_document_state(DocumentState::Normal);

        if cleanup_failures.is_empty() {
            info!("Conflict for document '{}' fully reconciled", document_id);
        } else {
            warn!(
                "Conflict for document '{}' resolved with {} versions left behind",
                document_id,
                cleanup_failures.len()
            );
        }

        Ok(ResolveConflictResult {
            log,
            cleanup_failures,
        })
    }

    fn unresolved_versions(&self, document_id: &str) -> Result<Vec<FileVersion>> {
        Ok(self
            .versions
            .list_competing_versions(document_id)?
            .into_iter()
            .filter(|v| !v.is_resolved)
            .collect())
    }
}
