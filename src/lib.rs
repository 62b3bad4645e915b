//! quakewatch - polling monitor for the P2P-quake disaster feed.
//!
//! Three independently scheduled monitors (earthquake information, early
//! warning, tsunami forecast) share one design: fetch the latest record,
//! gate it for freshness and relevance, classify severity, and emit a
//! human-readable alert.
//!
//! # Architecture
//!
//! - **Event-driven**: feed records are normalized into internal events
//!   before anything reaches the broadcast sink
//! - **Kind isolation**: each disaster kind runs on its own task with its
//!   own alert gate; a failure in one never affects another
//! - **Poll, not push**: the upstream feed is a "current status" endpoint
//!   that re-serves the latest record on every poll, so deduplication keys
//!   on the last accepted event time rather than on poll times
//!
//! # Usage
//!
//! ```no_run
//! use tokio::sync::mpsc;
//! use quakewatch::connectors::P2pQuakeClient;
//! use quakewatch::kinds::DisasterKind;
//! use quakewatch::monitors::MonitorRegistry;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (event_tx, mut event_rx) = mpsc::channel(64);
//!     let mut registry = MonitorRegistry::new(P2pQuakeClient::new(), event_tx);
//!     registry.start(DisasterKind::Earthquake);
//!
//!     while let Some(event) = event_rx.recv().await {
//!         println!("{event:?}");
//!     }
//! }
//! ```

pub mod connectors;
pub mod events;
pub mod kinds;
pub mod monitors;
pub mod severity;
pub mod sink;
pub mod utils;

// Re-export commonly used types
pub use connectors::{FeedError, P2pQuakeClient};
pub use events::DisasterEvent;
pub use kinds::DisasterKind;
pub use monitors::{AlertGate, GateDecision, MonitorConfig, MonitorRegistry};
pub use severity::{IntensityScale, TsunamiGrade};
