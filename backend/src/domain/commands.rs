//! Domain-level command and query types
//! These structs are used by services inside the domain layer and are
//! **not** exposed over the public API. The presentation layer is
//! responsible for mapping its form state onto these internal types.

pub mod events {
    use crate::domain::models::event::{Event, EventDetails, EventKind};
    use chrono::{DateTime, Utc};

    /// Input for recording a new event.
    #[derive(Debug, Clone)]
    pub struct CreateEventCommand {
        /// When the event occurred; defaults to now
        pub date: Option<DateTime<Utc>>,
        pub details: EventDetails,
    }

    /// Input for editing an existing event in place.
    #[derive(Debug, Clone)]
    pub struct UpdateEventCommand {
        pub event: Event,
    }

    /// Input for deleting an event.
    #[derive(Debug, Clone)]
    pub struct DeleteEventCommand {
        pub kind: EventKind,
        pub event_id: String,
    }

    /// Input for duplicating an event under a fresh identity.
    #[derive(Debug, Clone)]
    pub struct DuplicateEventCommand {
        pub kind: EventKind,
        pub event_id: String,
    }

    /// Query parameters for listing events.
    #[derive(Debug, Clone, Default)]
    pub struct EventListQuery {
        /// Restrict to one kind; `None` lists every kind
        pub kind: Option<EventKind>,
    }

    /// Result of recording a new event.
    #[derive(Debug, Clone)]
    pub struct CreateEventResult {
        pub event: Event,
    }

    /// Result of editing an event.
    #[derive(Debug, Clone)]
    pub struct UpdateEventResult {
        pub event: Event,
    }

    /// Result of deleting an event.
    #[derive(Debug, Clone)]
    pub struct DeleteEventResult {
        /// The removed event, or `None` when the id was already absent
        pub removed: Option<Event>,
    }

    /// Result of duplicating an event.
    #[derive(Debug, Clone)]
    pub struct DuplicateEventResult {
        pub event: Event,
    }

    /// Result of listing events, newest first.
    #[derive(Debug, Clone)]
    pub struct EventListResult {
        pub events: Vec<Event>,
    }

    /// Result of an undo or redo request.
    #[derive(Debug, Clone)]
    pub struct UndoRedoResult {
        /// Whether any recorded mutation was applied
        pub applied: bool,
    }
}

pub mod baby {
    use crate::domain::models::baby::{Baby, ThemeColor};

    /// Input for updating the baby profile. Fields left `None` keep their
    /// current value.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateBabyCommand {
        pub name: Option<String>,
        pub emoji: Option<String>,
        pub prefers_emoji: Option<bool>,
        /// Birthday in `YYYY-MM-DD` format
        pub birthday: Option<String>,
        pub theme_color: Option<ThemeColor>,
    }

    /// Result of updating the baby profile.
    #[derive(Debug, Clone)]
    pub struct UpdateBabyResult {
        pub baby: Baby,
    }
}

pub mod documents {
    use crate::domain::models::log::Log;

    /// Input for creating a new document.
    #[derive(Debug, Clone)]
    pub struct CreateDocumentCommand {
        /// Display name the document id is derived from
        pub name: String,
    }

    /// Input for opening an existing document.
    #[derive(Debug, Clone)]
    pub struct OpenDocumentCommand {
        pub document_id: String,
    }

    /// Input for saving an open document.
    #[derive(Debug, Clone)]
    pub struct SaveDocumentCommand {
        pub document_id: String,
    }

    /// Input for discarding in-memory changes in favor of the on-disk copy.
    #[derive(Debug, Clone)]
    pub struct RevertDocumentCommand {
        pub document_id: String,
    }

    /// Input for deleting a document.
    #[derive(Debug, Clone)]
    pub struct DeleteDocumentCommand {
        pub document_id: String,
    }

    /// Result of creating a document.
    #[derive(Debug, Clone)]
    pub struct CreateDocumentResult {
        pub document_id: String,
        pub log: Log,
    }

    /// Result of opening a document.
    #[derive(Debug, Clone)]
    pub struct OpenDocumentResult {
        pub log: Log,
    }

    /// Result of saving a document.
    #[derive(Debug, Clone)]
    pub struct SaveDocumentResult {
        pub success_message: String,
    }

    /// Result of reverting a document.
    #[derive(Debug, Clone)]
    pub struct RevertDocumentResult {
        pub log: Log,
    }

    /// Result of deleting a document.
    #[derive(Debug, Clone)]
    pub struct DeleteDocumentResult {
        pub success_message: String,
    }

    /// Result of listing documents.
    #[derive(Debug, Clone)]
    pub struct ListDocumentsResult {
        pub documents: Vec<shared::DocumentSummary>,
    }
}

pub mod conflicts {
    use crate::domain::models::log::Log;
    use shared::{ConflictChoice, ConflictPresentation};

    /// Input for asking whether competing versions exist.
    #[derive(Debug, Clone)]
    pub struct CheckConflictsCommand {
        pub document_id: String,
    }

    /// Input for building the grouped conflict presentation.
    #[derive(Debug, Clone)]
    pub struct PresentConflictsCommand {
        pub document_id: String,
    }

    /// Input for applying the user's conflict decision.
    #[derive(Debug, Clone)]
    pub struct ResolveConflictCommand {
        pub document_id: String,
        pub choice: ConflictChoice,
    }

    /// Result of a conflict check.
    #[derive(Debug, Clone)]
    pub struct CheckConflictsResult {
        pub conflicts_found: bool,
        pub version_count: usize,
    }

    /// Result of building the conflict presentation.
    #[derive(Debug, Clone)]
    pub struct PresentConflictsResult {
        pub presentation: ConflictPresentation,
    }

    /// Result of applying a conflict decision. The choice has been applied
    /// even when `cleanup_failures` is non-empty; those versions linger
    /// and can be retried opportunistically.
    #[derive(Debug, Clone)]
    pub struct ResolveConflictResult {
        pub log: Log,
        pub cleanup_failures: Vec<String>,
    }
}
