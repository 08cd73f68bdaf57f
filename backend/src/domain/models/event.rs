//! Domain models for recorded childcare events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// The closed set of recordable event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Feed,
    Diaper,
    Nap,
    Fuss,
    Weight,
    TummyTime,
    Custom,
}

impl EventKind {
    /// Every kind, in presentation order.
    pub const ALL: [EventKind; 7] = [
        EventKind::Feed,
        EventKind::Diaper,
        EventKind::Nap,
        EventKind::Fuss,
        EventKind::Weight,
        EventKind::TummyTime,
        EventKind::Custom,
    ];

    /// Stable short identifier used in generated ids and log lines.
    pub fn slug(&self) -> &'static str {
        match self {
            EventKind::Feed => "feed",
            EventKind::Diaper => "diaper",
            EventKind::Nap => "nap",
            EventKind::Fuss => "fuss",
            EventKind::Weight => "weight",
            EventKind::TummyTime => "tummy",
            EventKind::Custom => "custom",
        }
    }

    /// Human-readable label for rendering.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Feed => "Feeding",
            EventKind::Diaper => "Diaper Change",
            EventKind::Nap => "Nap",
            EventKind::Fuss => "Fussy Spell",
            EventKind::Weight => "Weigh-In",
            EventKind::TummyTime => "Tummy Time",
            EventKind::Custom => "Custom",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Which breast a feeding came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BreastSide {
    Left,
    Right,
    Both,
}

/// Where a feeding came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeedSource {
    Bottle,
    Breast { side: BreastSide },
}

/// Unit attached to a recorded measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MeasurementUnit {
    Milliliters,
    FluidOunces,
    Minutes,
    Hours,
    Kilograms,
    Pounds,
    Ounces,
}

/// A recorded quantity: volume for feedings, duration for naps and tummy
/// time, mass for weigh-ins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: f64,
    pub unit: MeasurementUnit,
}

/// A bottle or breast feeding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEvent {
    pub id: String,
    pub date: DateTime<Utc>,
    pub source: FeedSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement: Option<Measurement>,
}

/// A diaper change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiaperEvent {
    pub id: String,
    pub date: DateTime<Utc>,
    pub pee: bool,
    pub poop: bool,
}

/// A nap, with an optional duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NapEvent {
    pub id: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement: Option<Measurement>,
}

/// A fussy spell, with an optional duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FussEvent {
    pub id: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement: Option<Measurement>,
}

/// A weigh-in. The measurement is conceptually required; it stays optional
/// so payloads written before the field existed still decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEvent {
    pub id: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement: Option<Measurement>,
}

/// A tummy time session, with an optional duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TummyTimeEvent {
    pub id: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement: Option<Measurement>,
}

/// A user-defined event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomEvent {
    pub id: String,
    pub date: DateTime<Utc>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// A recorded event of any kind. Operations that only learn the kind at
/// runtime dispatch through a single match on this discriminant.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Feed(FeedEvent),
    Diaper(DiaperEvent),
    Nap(NapEvent),
    Fuss(FussEvent),
    Weight(WeightEvent),
    TummyTime(TummyTimeEvent),
    Custom(CustomEvent),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Feed(_) => EventKind::Feed,
            Event::Diaper(_) => EventKind::Diaper,
            Event::Nap(_) => EventKind::Nap,
            Event::Fuss(_) => EventKind::Fuss,
            Event::Weight(_) => EventKind::Weight,
            Event::TummyTime(_) => EventKind::TummyTime,
            Event::Custom(_) => EventKind::Custom,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Event::Feed(e) => &e.id,
            Event::Diaper(e) => &e.id,
            Event::Nap(e) => &e.id,
            Event::Fuss(e) => &e.id,
            Event::Weight(e) => &e.id,
            Event::TummyTime(e) => &e.id,
            Event::Custom(e) => &e.id,
        }
    }

    pub fn date(&self) -> DateTime<Utc> {
        match self {
            Event::Feed(e) => e.date,
            Event::Diaper(e) => e.date,
            Event::Nap(e) => e.date,
            Event::Fuss(e) => e.date,
            Event::Weight(e) => e.date,
            Event::TummyTime(e) => e.date,
            Event::Custom(e) => e.date,
        }
    }

    /// Copy of the kind-specific payload, without the identity fields.
    pub fn details(&self) -> EventDetails {
        match self {
            Event::Feed(e) => EventDetails::Feed {
                source: e.source,
                measurement: e.measurement,
            },
            Event::Diaper(e) => EventDetails::Diaper {
                pee: e.pee,
                poop: e.poop,
            },
            Event::Nap(e) => EventDetails::Nap {
                measurement: e.measurement,
            },
            Event::Fuss(e) => EventDetails::Fuss {
                measurement: e.measurement,
            },
            Event::Weight(e) => EventDetails::Weight {
                measurement: e.measurement,
            },
            Event::TummyTime(e) => EventDetails::TummyTime {
                measurement: e.measurement,
            },
            Event::Custom(e) => EventDetails::Custom {
                title: e.title.clone(),
                detail: e.detail.clone(),
            },
        }
    }

    /// Generate a unique event ID for a kind.
    /// Format: <kind-slug>-<timestamp_ms>-<random_suffix>
    /// Example: feed-1625846400123-af3c
    pub fn generate_id(kind: EventKind, timestamp_millis: u64) -> String {
        let random_suffix = Self::generate_random_suffix(4);
        format!("{}-{}-{}", kind.slug(), timestamp_millis, random_suffix)
    }

    /// Generate a random hex suffix for event IDs.
    fn generate_random_suffix(len: usize) -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        format!("{:x}", now % (16_u128.pow(len as u32)))
            .chars()
            .take(len)
            .collect()
    }
}

/// Kind-specific payload for an event that has not been given an identity
/// yet. This is what the entry form relays to the domain layer.
#[derive(Debug, Clone, PartialEq)]
pub enum EventDetails {
    Feed {
        source: FeedSource,
        measurement: Option<Measurement>,
    },
    Diaper {
        pee: bool,
        poop: bool,
    },
    Nap {
        measurement: Option<Measurement>,
    },
    Fuss {
        measurement: Option<Measurement>,
    },
    Weight {
        measurement: Option<Measurement>,
    },
    TummyTime {
        measurement: Option<Measurement>,
    },
    Custom {
        title: String,
        detail: Option<String>,
    },
}

impl EventDetails {
    pub fn kind(&self) -> EventKind {
        match self {
            EventDetails::Feed { .. } => EventKind::Feed,
            EventDetails::Diaper { .. } => EventKind::Diaper,
            EventDetails::Nap { .. } => EventKind::Nap,
            EventDetails::Fuss { .. } => EventKind::Fuss,
            EventDetails::Weight { .. } => EventKind::Weight,
            EventDetails::TummyTime { .. } => EventKind::TummyTime,
            EventDetails::Custom { .. } => EventKind::Custom,
        }
    }

    /// The measurement carried by this payload, if its kind has one.
    pub fn measurement(&self) -> Option<Measurement> {
        match self {
            EventDetails::Feed { measurement, .. }
            | EventDetails::Nap { measurement }
            | EventDetails::Fuss { measurement }
            | EventDetails::Weight { measurement }
            | EventDetails::TummyTime { measurement } => *measurement,
            EventDetails::Diaper { .. } | EventDetails::Custom { .. } => None,
        }
    }

    /// Combine this payload with an identity into a full event.
    pub fn into_event(self, id: String, date: DateTime<Utc>) -> Event {
        match self {
            EventDetails::Feed {
                source,
                measurement,
            } => Event::Feed(FeedEvent {
                id,
                date,
                source,
                measurement,
            }),
            EventDetails::Diaper { pee, poop } => Event::Diaper(DiaperEvent {
                id,
                date,
                pee,
                poop,
            }),
            EventDetails::Nap { measurement } => Event::Nap(NapEvent {
                id,
                date,
                measurement,
            }),
            EventDetails::Fuss { measurement } => Event::Fuss(FussEvent {
                id,
                date,
                measurement,
            }),
            EventDetails::Weight { measurement } => Event::Weight(WeightEvent {
                id,
                date,
                measurement,
            }),
            EventDetails::TummyTime { measurement } => Event::TummyTime(TummyTimeEvent {
                id,
                date,
                measurement,
            }),
            EventDetails::Custom { title, detail } => Event::Custom(CustomEvent {
                id,
                date,
                title,
                detail,
            }),
        }
    }
}
