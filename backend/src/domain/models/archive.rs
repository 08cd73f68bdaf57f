//! Serialized snapshot of a log: the on-disk document payload.
//!
//! An archive exists only at the encode/decode boundary. Encoding is pure;
//! decoding is all-or-nothing, so a malformed payload never partially
//! populates an aggregate. The payload carries no schema version field:
//! shape mismatches fail decode outright rather than migrating.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::baby::Baby;
use super::event_store::EventStore;
use super::log::Log;

/// Error raised at the archive boundary.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Payload is not a well-formed log document
    #[error("malformed log payload: {0}")]
    Decode(#[source] serde_json::Error),
    /// The log could not be serialized
    #[error("could not serialize log payload: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Snapshot of a log's contents: exactly one baby profile and one event
/// store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Archive {
    pub baby: Baby,
    pub event_store: EventStore,
}

impl Archive {
    /// Serialize to the on-disk JSON payload. Equal values produce
    /// identical bytes modulo map key order.
    pub fn encode(&self) -> Result<Vec<u8>, ArchiveError> {
        serde_json::to_vec_pretty(self).map_err(ArchiveError::Encode)
    }

    /// Parse a payload previously produced by [`Archive::encode`].
    pub fn decode(bytes: &[u8]) -> Result<Self, ArchiveError> {
        serde_json::from_slice(bytes).map_err(ArchiveError::Decode)
    }

    /// Consume the snapshot into a live log with empty undo history.
    pub fn into_log(self) -> Log {
        Log::from_parts(self.baby, self.event_store)
    }
}

impl From<&Log> for Archive {
    fn from(log: &Log) -> Self {
        Self {
            baby: log.baby().clone(),
            event_store: log.events().clone(),
        }
    }
}
