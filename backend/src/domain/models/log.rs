//! The log aggregate: one baby profile plus one event store, with undo
//! tracking. A log is the unit of persistence; one log maps to one
//! document on disk.
//!
//! Every mutating call records an explicit inverse value on the undo
//! stack owned by the aggregate. Callers keep at most one mutating
//! operation in flight against a given log; nothing here is internally
//! concurrent.

use super::baby::Baby;
use super::event::{Event, EventKind};
use super::event_store::{EventStore, StoreError};

/// A recorded mutation, carrying enough state to run in either direction.
#[derive(Debug, Clone)]
enum Mutation {
    ReplaceBaby { before: Baby, after: Baby },
    ReplaceEvents { before: EventStore, after: EventStore },
    UpsertEvent { before: Option<Event>, after: Event },
    RemoveEvent { before: Event },
}

/// In-memory aggregate backing one document on disk. Exclusively owns its
/// baby profile and event store.
#[derive(Debug, Clone)]
pub struct Log {
    baby: Baby,
    events: EventStore,
    undo_stack: Vec<Mutation>,
    redo_stack: Vec<Mutation>,
}

impl Log {
    /// Create a log with an empty event store.
    pub fn new(baby: Baby) -> Self {
        Self::from_parts(baby, EventStore::new())
    }

    /// Create a log from restored parts, with empty undo history.
    pub fn from_parts(baby: Baby, events: EventStore) -> Self {
        Self {
            baby,
            events,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn baby(&self) -> &Baby {
        &self.baby
    }

    pub fn events(&self) -> &EventStore {
        &self.events
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Record a fresh mutation. Any redo history becomes unreachable.
    fn record(&mut self, mutation: Mutation) {
        self.redo_stack.clear();
        self.undo_stack.push(mutation);
    }

    /// Upsert an event into the collection matching its kind.
    pub fn save_event(&mut self, event: Event) -> Event {
        let before = self.events.save_event(event.clone());
        self.record(Mutation::UpsertEvent {
            before,
            after: event.clone(),
        });
        event
    }

    /// Remove an event. Removing an absent id succeeds silently and
    /// records nothing, since nothing changed.
    pub fn delete_event(&mut self, kind: EventKind, id: &str) -> Option<Event> {
        let removed = self.events.delete_event(kind, id);
        if let Some(event) = &removed {
            self.record(Mutation::RemoveEvent {
                before: event.clone(),
            });
        }
        removed
    }

    /// Copy an event under a fresh id and current timestamp.
    pub fn duplicate_event(&mut self, kind: EventKind, id: &str) -> Result<Event, StoreError> {
        let copy = self.events.duplicate_event(kind, id)?;
        self.record(Mutation::UpsertEvent {
            before: None,
            after: copy.clone(),
        });
        Ok(copy)
    }

    /// Replace the baby profile. The prior value is recorded for undo
    /// unless its name is empty: the placeholder that exists before the
    /// profile form is first filled in stays out of the undo history.
    pub fn set_baby(&mut self, baby: Baby) {
        let before = std::mem::replace(&mut self.baby, baby.clone());
        if !before.name.is_empty() {
            self.record(Mutation::ReplaceBaby {
                before,
                after: baby,
            });
        }
    }

    /// Wholesale replace the event store; always recorded for undo.
    pub fn set_events(&mut self, events: EventStore) {
        let before = std::mem::replace(&mut self.events, events.clone());
        self.record(Mutation::ReplaceEvents {
            before,
            after: events,
        });
    }

    /// Revert the most recent recorded mutation. Returns whether anything
    /// was undone.
    pub fn undo(&mut self) -> bool {
        let Some(mutation) = self.undo_stack.pop() else {
            return false;
        };
        self.apply_inverse(&mutation);
        self.redo_stack.push(mutation);
        true
    }

    /// Replay the most recently undone mutation. Returns whether anything
    /// was redone.
    pub fn redo(&mut self) -> bool {
        let Some(mutation) = self.redo_stack.pop() else {
            return false;
        };
        self.apply_forward(&mutation);
        self.undo_stack.push(mutation);
        true
    }

    fn apply_forward(&mut self, mutation: &Mutation) {
        match mutation {
            Mutation::ReplaceBaby { after, .. } => self.baby = after.clone(),
            Mutation::ReplaceEvents { after, .. } => self.events = after.clone(),
            Mutation::UpsertEvent { after, .. } => {
                self.events.save_event(after.clone());
            }
            Mutation::RemoveEvent { before } => {
                self.events.delete_event(before.kind(), before.id());
            }
        }
    }

    fn apply_inverse(&mut self, mutation: &Mutation) {
        match mutation {
            Mutation::ReplaceBaby { before, .. } => self.baby = before.clone(),
            Mutation::ReplaceEvents { before, .. } => self.events = before.clone(),
            Mutation::UpsertEvent { before, after } => match before {
                Some(prior) => {
                    self.events.save_event(prior.clone());
                }
                None => {
                    self.events.delete_event(after.kind(), after.id());
                }
            },
            Mutation::RemoveEvent { before } => {
                self.events.save_event(before.clone());
            }
        }
    }
}
