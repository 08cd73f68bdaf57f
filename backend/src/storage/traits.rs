//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;

use crate::domain::models::archive::Archive;
use crate::domain::models::version::FileVersion;

/// Trait defining the interface for document storage operations
///
/// This trait abstracts away the specific storage implementation details,
/// allowing the domain layer to work with different backends (local JSON
/// files, a synced container, etc.) without modification.
///
/// Note: all operations are synchronous; the core performs no internal
/// concurrency.
pub trait LogStorage: Send + Sync {
    /// Persist a document payload to its location
    fn save_document(&self, document_id: &str, archive: &Archive) -> Result<()>;

    /// Load a document payload; `None` if nothing exists at the location
    fn load_document(&self, document_id: &str) -> Result<Option<Archive>>;

    /// List all document identifiers, ordered by name
    fn list_documents(&self) -> Result<Vec<String>>;

    /// Delete a document along with any version sidecars
    fn delete_document(&self, document_id: &str) -> Result<()>;

    /// Whether a document exists at the location
    fn document_exists(&self, document_id: &str) -> Result<bool>;
}

/// Trait defining the interface for competing-version bookkeeping
///
/// This abstracts the sync layer's version history so the conflict flow
/// can be exercised against an in-memory fake, independent of any real
/// storage or sync backend.
pub trait VersionStorage: Send + Sync {
    /// Enumerate the revisions competing with a document's local copy
    fn list_competing_versions(&self, document_id: &str) -> Result<Vec<FileVersion>>;

    /// Raw payload of one competing revision
    fn load_version_payload(&self, document_id: &str, version_id: &str) -> Result<Vec<u8>>;

    /// Flag a revision as settled without removing it
    fn mark_resolved(&self, document_id: &str, version_id: &str) -> Result<()>;

    /// Drop a revision from the candidate set
    fn remove_version(&self, document_id: &str, version_id: &str) -> Result<()>;
}
