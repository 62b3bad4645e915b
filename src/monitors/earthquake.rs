//! Earthquake-information monitor (feed code 551).
//!
//! Polls the latest earthquake record every 10 seconds, gates it, and on
//! acceptance renders a report with the hypocenter summary followed by the
//! intensity observations grouped by scale step, severe-first.

use std::fmt::Write as _;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::connectors::{EarthquakeRecord, FeedError, P2pQuakeClient};
use crate::events::DisasterEvent;
use crate::kinds::DisasterKind;
use crate::monitors::{AlertGate, GateDecision, MonitorConfig};
use crate::severity::{group_by_bucket, IntensityScale};
use crate::utils::jst_now;

const KIND: DisasterKind = DisasterKind::Earthquake;

/// Watches the earthquake-information feed.
///
/// Responsibilities:
/// - Polls the latest 551 record on a fixed cadence
/// - Gates it for freshness and relevance
/// - Renders and emits the observation report on acceptance
pub struct EarthquakeMonitor {
    config: MonitorConfig,
    client: P2pQuakeClient,
    event_tx: mpsc::Sender<DisasterEvent>,
    gate: AlertGate,
}

impl EarthquakeMonitor {
    /// Creates a new earthquake monitor with the default configuration.
    pub fn new(client: P2pQuakeClient, event_tx: mpsc::Sender<DisasterEvent>) -> Self {
        Self::with_config(MonitorConfig::default(), client, event_tx)
    }

    /// Creates a new earthquake monitor with custom configuration.
    pub fn with_config(
        config: MonitorConfig,
        client: P2pQuakeClient,
        event_tx: mpsc::Sender<DisasterEvent>,
    ) -> Self {
        let gate = AlertGate::new(config.alert_window_secs, config.gate_grace_secs);
        Self {
            config,
            client,
            event_tx,
            gate,
        }
    }

    /// Runs the monitor loop.
    ///
    /// Ticks are strictly sequential; a slow tick delays the next one
    /// instead of producing a catch-up burst. A failed tick never breaks
    /// the schedule.
    pub async fn run(mut self) {
        info!("[{}] Earthquake monitoring started", KIND);

        let mut interval = tokio::time::interval(self.config.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            if let Err(e) = self.tick().await {
                warn!("[{}] Feed unusable this tick: {}", KIND, e);
                let _ = self
                    .event_tx
                    .send(DisasterEvent::FeedTrouble {
                        kind: KIND,
                        error: e.to_string(),
                        timestamp: jst_now(),
                    })
                    .await;
            }
        }
    }

    /// Runs one polling cycle: fetch, gate, and emit on acceptance.
    async fn tick(&mut self) -> Result<(), FeedError> {
        let record = self.client.latest_earthquake().await?;
        let occurred_at = record.occurred_at()?;

        match self.gate.evaluate(occurred_at, jst_now()) {
            GateDecision::Accept => {
                info!(
                    "[{}] New earthquake accepted: {} (occurred at {})",
                    KIND, record.earthquake.hypocenter.name, occurred_at
                );

                let report = render_report(&record);
                let _ = self
                    .event_tx
                    .send(DisasterEvent::AlertReady {
                        kind: KIND,
                        occurred_at,
                        report,
                    })
                    .await;
            }
            GateDecision::SuppressStale => {
                debug!("[{}] Latest record already alerted ({})", KIND, occurred_at);
            }
            GateDecision::SuppressOutOfWindow => {
                debug!(
                    "[{}] Latest record outside alert window ({})",
                    KIND, occurred_at
                );
            }
        }

        Ok(())
    }
}

/// Renders the broadcast report for an accepted earthquake record.
fn render_report(record: &EarthquakeRecord) -> String {
    let hypocenter = &record.earthquake.hypocenter;

    let mut out = String::new();
    let _ = writeln!(out, "震源名：{}", hypocenter.name);
    let _ = writeln!(out, "マグニチュード：{}", hypocenter.magnitude);
    let _ = writeln!(out, "深さ：{}km", hypocenter.depth);
    let _ = writeln!(out, "最大震度：{}", record.earthquake.max_scale_bucket());

    out.push_str("----観測情報----\n");
    let grouped = group_by_bucket(&record.points, |p| p.scale_bucket());
    // Unknown sorts above the real steps; report it after them instead.
    let ordered = grouped
        .iter()
        .rev()
        .filter(|(scale, _)| **scale != IntensityScale::Unknown)
        .chain(grouped.get_key_value(&IntensityScale::Unknown));
    for (scale, points) in ordered {
        let regions = points
            .iter()
            .map(|p| format!("{}{}", p.pref, p.addr))
            .collect::<Vec<_>>()
            .join("、");
        let _ = writeln!(out, "{scale}：{regions}");
    }
    out.push_str("------------");
    out
}

impl std::fmt::Debug for EarthquakeMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EarthquakeMonitor")
            .field("last_accepted", &self.gate.last_accepted())
            .field("poll_interval", &self.config.poll_interval)
            .finish()
    }
}
