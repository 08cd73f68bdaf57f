//! Event recording domain logic for the baby tracker.

use anyhow::{anyhow, Result};
use chrono::Utc;
use log::{debug, info};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::commands::events::{
    CreateEventCommand, CreateEventResult, DeleteEventCommand, DeleteEventResult,
    DuplicateEventCommand, DuplicateEventResult, EventListQuery, EventListResult,
    UndoRedoResult, UpdateEventCommand, UpdateEventResult,
};
use crate::domain::models::event::{Event, EventDetails};
use crate::domain::models::log::Log;

/// Service for recording and editing events in an open log
#[derive(Clone)]
pub struct EventService;

impl EventService {
    /// Create a new EventService
    pub fn new() -> Self {
        Self
    }

    /// Record a new event into the open log
    pub fn create_event(&self, log: &mut Log, command: CreateEventCommand) -> Result<CreateEventResult> {
        self.validate_details(&command.details)?;

        let date = command.date.unwrap_or_else(Utc::now);
        let now_millis = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis() as u64;
        let id = Event::generate_id(command.details.kind(), now_millis);
        let event = command.details.into_event(id, date);

        info!("Recording {} event: {}", event.kind(), event.id());
        let event = log.save_event(event);

        Ok(CreateEventResult { event })
    }

    /// Edit an existing event in place (upsert by id)
    pub fn update_event(&self, log: &mut Log, command: UpdateEventCommand) -> Result<UpdateEventResult> {
        self.validate_details(&command.event.details())?;

        info!("Updating {} event: {}", command.event.kind(), command.event.id());
        let event = log.save_event(command.event);

        Ok(UpdateEventResult { event })
    }

    /// Delete an event. Deleting an id that is already absent succeeds.
    pub fn delete_event(&self, log: &mut Log, command: DeleteEventCommand) -> Result<DeleteEventResult> {
        let removed = log.delete_event(command.kind, &command.event_id);

        if removed.is_some() {
            info!("Deleted {} event: {}", command.kind, command.event_id);
        } else {
            debug!(
                "No {} event with id {}; nothing to delete",
                command.kind, command.event_id
            );
        }

        Ok(DeleteEventResult { removed })
    }

    /// Duplicate an event under a fresh id and current timestamp
    pub fn duplicate_event(
        &self,
        log: &mut Log,
        command: DuplicateEventCommand,
    ) -> Result<DuplicateEventResult> {
        let event = log.duplicate_event(command.kind, &command.event_id)?;

        info!(
            "Duplicated {} event {} as {}",
            command.kind, command.event_id, event.id()
        );

        Ok(DuplicateEventResult { event })
    }

    /// List events, most recent first
    pub fn list_events(&self, log: &Log, query: EventListQuery) -> Result<EventListResult> {
        let mut events = match query.kind {
            Some(kind) => log.events().events_of_kind(kind),
            None => log.events().all_events(),
        };
        events.sort_by(|a, b| b.date().cmp(&a.date()));

        debug!("Listing {} events", events.len());
        Ok(EventListResult { events })
    }

    /// Revert the most recent recorded mutation
    pub fn undo(&self, log: &mut Log) -> Result<UndoRedoResult> {
        let applied = log.undo();
        info!("Undo requested; applied={}", applied);
        Ok(UndoRedoResult { applied })
    }

    /// Replay the most recently undone mutation
    pub fn redo(&self, log: &mut Log) -> Result<UndoRedoResult> {
        let applied = log.redo();
        info!("Redo requested; applied={}", applied);
        Ok(UndoRedoResult { applied })
    }

    /// Validate a kind-specific payload
    fn validate_details(&self, details: &EventDetails) -> Result<()> {
        match details {
            EventDetails::Custom { title, .. } => {
                if title.trim().is_empty() {
                    return Err(anyhow!("Custom event title cannot be empty"));
                }
                if title.len() > 100 {
                    return Err(anyhow!("Custom event title cannot exceed 100 characters"));
                }
            }
            EventDetails::Weight { measurement: None } => {
                return Err(anyhow!("A weigh-in requires a measurement"));
            }
            _ => {}
        }

        if let Some(measurement) = details.measurement() {
            if !measurement.value.is_finite() || measurement.value < 0.0 {
                return Err(anyhow!("Measurement value must be a non-negative number"));
            }
        }

        Ok(())
    }
}

impl Default for EventService {
    fn default() -> Self {
        Self::new()
    }
}
