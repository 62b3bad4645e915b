//! Normalized disaster events consumed by the dispatch loop.
//!
//! All feed data MUST be converted into normalized internal events before it
//! reaches the broadcast sink. Raw feed records never drive the sink
//! directly; only the monitor loops produce events, and only after the alert
//! gate has accepted a record.

use chrono::NaiveDateTime;

use crate::kinds::DisasterKind;

/// Primary event enum - the dispatch loop consumes ONLY this type.
///
/// Every event carries the disaster kind it belongs to, keeping the three
/// monitors fully isolated from each other.
#[derive(Debug, Clone)]
pub enum DisasterEvent {
    /// A fresh, in-window event passed the gate and its report is ready
    /// for broadcast.
    AlertReady {
        kind: DisasterKind,
        /// Event time as reported by the feed (JST local).
        occurred_at: NaiveDateTime,
        /// Fully rendered, human-readable report.
        report: String,
    },

    /// The feed could not be used this tick (transport, decode, or event-time
    /// parse failure). Recoverable; the monitor keeps its schedule.
    FeedTrouble {
        kind: DisasterKind,
        error: String,
        timestamp: NaiveDateTime,
    },
}

impl DisasterEvent {
    /// Returns the disaster kind this event belongs to.
    pub fn kind(&self) -> DisasterKind {
        match self {
            DisasterEvent::AlertReady { kind, .. } => *kind,
            DisasterEvent::FeedTrouble { kind, .. } => *kind,
        }
    }

    /// Returns the timestamp of this event.
    pub fn timestamp(&self) -> NaiveDateTime {
        match self {
            DisasterEvent::AlertReady { occurred_at, .. } => *occurred_at,
            DisasterEvent::FeedTrouble { timestamp, .. } => *timestamp,
        }
    }
}
