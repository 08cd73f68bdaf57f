//! Domain layer: models, commands, and the services that operate on them.

pub mod commands;
pub mod models;

pub mod baby_service;
pub mod conflict_service;
pub mod document_service;
pub mod event_service;

pub use baby_service::BabyService;
pub use conflict_service::{ConflictPhase, ConflictService};
pub use document_service::DocumentService;
pub use event_service::EventService;
