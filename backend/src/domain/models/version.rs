//! Domain model for a competing on-disk revision of a document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read-only view of one on-disk revision competing with the currently
/// open log. Produced by the version store, never by this core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileVersion {
    pub id: String,
    /// Human-readable name of the device the revision came from
    pub device: String,
    pub modified_at: DateTime<Utc>,
    /// Whether the sync layer already considers this revision settled
    pub is_resolved: bool,
}
