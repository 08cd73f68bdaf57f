//! # JSON Storage Module
//!
//! This module provides the JSON-file storage implementation for the baby
//! tracker. One document is one pretty-printed JSON file; competing
//! revisions from other devices live in a sidecar directory next to it.
//!
//! ## Features
//!
//! - One file per log (`{document_id}.babylog.json`) with atomic writes
//! - Sidecar version sets (`{document_id}.babylog.versions/`) holding
//!   competing revisions as payload + YAML metadata pairs
//! - Compatible with the same `LogStorage`/`VersionStorage` traits as any
//!   other backend
//!
//! ## File Format
//!
//! Document payloads have the following structure:
//! ```json
//! {
//!   "baby": { "id": "baby::1702516122000", "name": "Emma", "emoji": "🐣",
//!             "prefersEmoji": true, "birthday": "2023-11-02" },
//!   "eventStore": { "feedings": {}, "changes": {}, "naps": {},
//!                   "fussies": {}, "weighIns": {}, "tummyTimes": {},
//!                   "customEvents": {} }
//! }
//! ```

pub mod connection;
pub mod log_repository;
pub mod version_repository;

pub use connection::JsonConnection;
pub use log_repository::LogRepository;
pub use version_repository::VersionRepository;
