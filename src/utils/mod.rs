//! Shared utilities: telemetry setup and the feed-local clock.

mod clock;
mod telemetry;

pub use clock::{jst, jst_now};
pub use telemetry::{init_telemetry, init_telemetry_json, LogFormat};
