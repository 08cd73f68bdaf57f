//! In-memory event storage: one collection per event kind.
//!
//! Each per-kind map is typed to its record struct, so an event can only
//! ever sit in the collection matching its kind and a lookup for a valid
//! kind cannot fail. Operations that only learn the kind at runtime go
//! through the [`Event`] sum type and a single match on its discriminant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use super::event::{
    CustomEvent, DiaperEvent, Event, EventKind, FeedEvent, FussEvent, NapEvent, TummyTimeEvent,
    WeightEvent,
};

/// Error raised by event store lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The referenced id is absent from the targeted kind's collection
    #[error("no {kind} event with id '{id}'")]
    NotFound { kind: EventKind, id: String },
}

/// Implemented by each concrete event record so store operations can be
/// generic over the kind.
pub trait EventRecord: Clone {
    /// The kind whose collection backs this record type.
    const KIND: EventKind;

    fn id(&self) -> &str;
    fn date(&self) -> DateTime<Utc>;

    /// The collection backing this record type within a store.
    fn group(store: &EventStore) -> &HashMap<String, Self>;
    fn group_mut(store: &mut EventStore) -> &mut HashMap<String, Self>;

    /// Replace the identity fields, used when duplicating.
    fn reidentify(&mut self, id: String, date: DateTime<Utc>);
}

macro_rules! impl_event_record {
    ($record:ty, $kind:expr, $field:ident) => {
        impl EventRecord for $record {
            const KIND: EventKind = $kind;

            fn id(&self) -> &str {
                &self.id
            }

            fn date(&self) -> DateTime<Utc> {
                self.date
            }

            fn group(store: &EventStore) -> &HashMap<String, Self> {
                &store.$field
            }

            fn group_mut(store: &mut EventStore) -> &mut HashMap<String, Self> {
                &mut store.$field
            }

            fn reidentify(&mut self, id: String, date: DateTime<Utc>) {
                self.id = id;
                self.date = date;
            }
        }
    };
}

impl_event_record!(FeedEvent, EventKind::Feed, feedings);
impl_event_record!(DiaperEvent, EventKind::Diaper, changes);
impl_event_record!(NapEvent, EventKind::Nap, naps);
impl_event_record!(FussEvent, EventKind::Fuss, fussies);
impl_event_record!(WeightEvent, EventKind::Weight, weigh_ins);
impl_event_record!(TummyTimeEvent, EventKind::TummyTime, tummy_times);
impl_event_record!(CustomEvent, EventKind::Custom, custom_events);

/// One unordered collection per event kind, keyed by event id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventStore {
    feedings: HashMap<String, FeedEvent>,
    changes: HashMap<String, DiaperEvent>,
    naps: HashMap<String, NapEvent>,
    fussies: HashMap<String, FussEvent>,
    weigh_ins: HashMap<String, WeightEvent>,
    tummy_times: HashMap<String, TummyTimeEvent>,
    custom_events: HashMap<String, CustomEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The entire collection for the record type `E`.
    pub fn group_of<E: EventRecord>(&self) -> &HashMap<String, E> {
        E::group(self)
    }

    /// Wholesale replace the collection for the record type `E`.
    pub fn set_group<E: EventRecord>(&mut self, group: HashMap<String, E>) {
        *E::group_mut(self) = group;
    }

    /// Fetch an event by id from the collection for `E`.
    pub fn get<E: EventRecord>(&self, id: &str) -> Option<&E> {
        E::group(self).get(id)
    }

    /// Upsert an event by its id, returning any displaced prior value.
    pub fn save<E: EventRecord>(&mut self, event: E) -> Option<E> {
        E::group_mut(self).insert(event.id().to_string(), event)
    }

    /// Remove an event by id. Removing an absent id is a silent no-op.
    pub fn delete<E: EventRecord>(&mut self, id: &str) -> Option<E> {
        E::group_mut(self).remove(id)
    }

    /// Copy an event under a fresh id and the current timestamp, save the
    /// copy, and return it. No partial state is observable: the copy is
    /// either fully inserted or the store is untouched.
    pub fn duplicate<E: EventRecord>(&mut self, id: &str) -> Result<E, StoreError> {
        let mut copy = self
            .get::<E>(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                kind: E::KIND,
                id: id.to_string(),
            })?;
        let now = Utc::now();
        copy.reidentify(
            Event::generate_id(E::KIND, now.timestamp_millis() as u64),
            now,
        );
        E::group_mut(self).insert(copy.id().to_string(), copy.clone());
        Ok(copy)
    }

    /// Upsert an event whose kind is only known at runtime, returning any
    /// displaced prior value.
    pub fn save_event(&mut self, event: Event) -> Option<Event> {
        match event {
            Event::Feed(e) => self.save(e).map(Event::Feed),
            Event::Diaper(e) => self.save(e).map(Event::Diaper),
            Event::Nap(e) => self.save(e).map(Event::Nap),
            Event::Fuss(e) => self.save(e).map(Event::Fuss),
            Event::Weight(e) => self.save(e).map(Event::Weight),
            Event::TummyTime(e) => self.save(e).map(Event::TummyTime),
            Event::Custom(e) => self.save(e).map(Event::Custom),
        }
    }

    /// Fetch an event by kind and id.
    pub fn get_event(&self, kind: EventKind, id: &str) -> Option<Event> {
        match kind {
            EventKind::Feed => self.get::<FeedEvent>(id).cloned().map(Event::Feed),
            EventKind::Diaper => self.get::<DiaperEvent>(id).cloned().map(Event::Diaper),
            EventKind::Nap => self.get::<NapEvent>(id).cloned().map(Event::Nap),
            EventKind::Fuss => self.get::<FussEvent>(id).cloned().map(Event::Fuss),
            EventKind::Weight => self.get::<WeightEvent>(id).cloned().map(Event::Weight),
            EventKind::TummyTime => self.get::<TummyTimeEvent>(id).cloned().map(Event::TummyTime),
            EventKind::Custom => self.get::<CustomEvent>(id).cloned().map(Event::Custom),
        }
    }

    /// Remove an event by kind and id; absent ids are a silent no-op.
    pub fn delete_event(&mut self, kind: EventKind, id: &str) -> Option<Event> {
        match kind {
            EventKind::Feed => self.delete::<FeedEvent>(id).map(Event::Feed),
            EventKind::Diaper => self.delete::<DiaperEvent>(id).map(Event::Diaper),
            EventKind::Nap => self.delete::<NapEvent>(id).map(Event::Nap),
            EventKind::Fuss => self.delete::<FussEvent>(id).map(Event::Fuss),
            EventKind::Weight => self.delete::<WeightEvent>(id).map(Event::Weight),
            EventKind::TummyTime => self.delete::<TummyTimeEvent>(id).map(Event::TummyTime),
            EventKind::Custom => self.delete::<CustomEvent>(id).map(Event::Custom),
        }
    }

    /// Duplicate an event by kind and id under a fresh identity.
    pub fn duplicate_event(&mut self, kind: EventKind, id: &str) -> Result<Event, StoreError> {
        match kind {
            EventKind::Feed => self.duplicate::<FeedEvent>(id).map(Event::Feed),
            EventKind::Diaper => self.duplicate::<DiaperEvent>(id).map(Event::Diaper),
            EventKind::Nap => self.duplicate::<NapEvent>(id).map(Event::Nap),
            EventKind::Fuss => self.duplicate::<FussEvent>(id).map(Event::Fuss),
            EventKind::Weight => self.duplicate::<WeightEvent>(id).map(Event::Weight),
            EventKind::TummyTime => self.duplicate::<TummyTimeEvent>(id).map(Event::TummyTime),
            EventKind::Custom => self.duplicate::<CustomEvent>(id).map(Event::Custom),
        }
    }

    /// All events of one kind, in no particular order.
    pub fn events_of_kind(&self, kind: EventKind) -> Vec<Event> {
        match kind {
            EventKind::Feed => self.feedings.values().cloned().map(Event::Feed).collect(),
            EventKind::Diaper => self.changes.values().cloned().map(Event::Diaper).collect(),
            EventKind::Nap => self.naps.values().cloned().map(Event::Nap).collect(),
            EventKind::Fuss => self.fussies.values().cloned().map(Event::Fuss).collect(),
            EventKind::Weight => self.weigh_ins.values().cloned().map(Event::Weight).collect(),
            EventKind::TummyTime => self
                .tummy_times
                .values()
                .cloned()
                .map(Event::TummyTime)
                .collect(),
            EventKind::Custom => self
                .custom_events
                .values()
                .cloned()
                .map(Event::Custom)
                .collect(),
        }
    }

    /// Every event across all kinds, in no particular order.
    pub fn all_events(&self) -> Vec<Event> {
        EventKind::ALL
            .iter()
            .flat_map(|kind| self.events_of_kind(*kind))
            .collect()
    }

    /// Number of events of one kind.
    pub fn len_of_kind(&self, kind: EventKind) -> usize {
        match kind {
            EventKind::Feed => self.feedings.len(),
            EventKind::Diaper => self.changes.len(),
            EventKind::Nap => self.naps.len(),
            EventKind::Fuss => self.fussies.len(),
            EventKind::Weight => self.weigh_ins.len(),
            EventKind::TummyTime => self.tummy_times.len(),
            EventKind::Custom => self.custom_events.len(),
        }
    }

    /// Total number of events across all kinds.
    pub fn len(&self) -> usize {
        EventKind::ALL.iter().map(|kind| self.len_of_kind(*kind)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
