//! Monitor subsystems for the disaster feeds.
//!
//! Each monitor polls one feed on a fixed cadence, gates the latest record
//! through its own [`AlertGate`] and emits normalized [`DisasterEvent`]s.
//! All monitors operate independently per disaster kind.
//!
//! [`DisasterEvent`]: crate::events::DisasterEvent

mod earthquake;
mod eew;
mod gate;
mod registry;
mod tsunami;

pub use earthquake::EarthquakeMonitor;
pub use eew::EewMonitor;
pub use gate::{AlertGate, GateDecision};
pub use registry::MonitorRegistry;
pub use tsunami::TsunamiMonitor;

use std::time::Duration;

/// Configuration shared by all monitor loops.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// How often to poll the feed.
    pub poll_interval: Duration,
    /// Maximum age of an event, relative to wall clock, for which an alert
    /// is still actionable.
    pub alert_window_secs: i64,
    /// Grace offset added to the gate's initial floor timestamp.
    pub gate_grace_secs: i64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            alert_window_secs: 60,
            gate_grace_secs: 10,
        }
    }
}
