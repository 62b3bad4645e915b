//! Event system for the disaster monitors.
//!
//! All feed signals MUST be converted into normalized internal events
//! BEFORE being consumed by the dispatch loop. Raw feed records must NEVER
//! drive the broadcast sink directly.

mod disaster_events;

pub use disaster_events::DisasterEvent;
