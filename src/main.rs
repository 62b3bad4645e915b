//! quakewatch - Main Entry Point
//!
//! Starts the three independent disaster monitors (earthquake information,
//! early warning, tsunami forecast) and dispatches their normalized events
//! to the console broadcast sink. Each monitor operates in complete
//! isolation - a failure in one does NOT affect any other.

use tokio::sync::mpsc;
use tracing::{info, warn};

use quakewatch::connectors::P2pQuakeClient;
use quakewatch::events::DisasterEvent;
use quakewatch::monitors::MonitorRegistry;
use quakewatch::sink::{Broadcast, ConsoleSink};
use quakewatch::utils::init_telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: No .env file found or error loading it: {}", e);
    }

    init_telemetry();

    info!("quakewatch starting");

    let api_url = std::env::var("P2PQUAKE_API_URL")
        .unwrap_or_else(|_| "https://api.p2pquake.net/v2".to_string());
    info!("Feed URL: {}", api_url);

    let client = P2pQuakeClient::with_endpoint(api_url);
    let (event_tx, mut event_rx) = mpsc::channel(64);

    let mut registry = MonitorRegistry::new(client, event_tx);
    registry.start_all();

    info!("All monitors started. Press Ctrl+C to stop.");

    let sink = ConsoleSink;

    loop {
        tokio::select! {
            Some(event) = event_rx.recv() => {
                dispatch(&sink, event);
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    registry.shutdown();
    info!("All monitors stopped. Shutting down.");
    Ok(())
}

/// Routes one normalized event to the broadcast sink or the log.
fn dispatch(sink: &dyn Broadcast, event: DisasterEvent) {
    match event {
        DisasterEvent::AlertReady {
            kind,
            occurred_at,
            report,
        } => {
            info!("[{}] Broadcasting alert for event at {}", kind, occurred_at);
            sink.broadcast(&report);
        }
        DisasterEvent::FeedTrouble { kind, error, .. } => {
            warn!("[{}] No usable feed data this tick: {}", kind, error);
        }
    }
}
