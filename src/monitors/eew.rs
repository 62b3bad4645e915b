//! Earthquake early-warning monitor (feed code 556).
//!
//! Polls the latest warning record, gates it on the earthquake origin time,
//! and on acceptance emits the warning banner with every named area and its
//! predicted minimum intensity.

use std::fmt::Write as _;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::connectors::{EewRecord, FeedError, P2pQuakeClient};
use crate::events::DisasterEvent;
use crate::kinds::DisasterKind;
use crate::monitors::{AlertGate, GateDecision, MonitorConfig};
use crate::utils::jst_now;

const KIND: DisasterKind = DisasterKind::EarlyWarning;

/// Watches the early-warning feed.
pub struct EewMonitor {
    config: MonitorConfig,
    client: P2pQuakeClient,
    event_tx: mpsc::Sender<DisasterEvent>,
    gate: AlertGate,
}

impl EewMonitor {
    /// Creates a new early-warning monitor with the default configuration.
    pub fn new(client: P2pQuakeClient, event_tx: mpsc::Sender<DisasterEvent>) -> Self {
        Self::with_config(MonitorConfig::default(), client, event_tx)
    }

    /// Creates a new early-warning monitor with custom configuration.
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

    /// Runs the monitor loop. Same cadence contract as the other monitors:
    /// sequential ticks, no catch-up burst, failures isolated to one tick.
    pub async fn run(mut self) {
        info!("[{}] Early-warning monitoring started", KIND);

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
        let record = self.client.latest_early_warning().await?;
        let occurred_at = record.occurred_at()?;

        match self.gate.evaluate(occurred_at, jst_now()) {
            GateDecision::Accept => {
                info!(
                    "[{}] New early warning accepted ({} areas, origin {})",
                    KIND,
                    record.areas.len(),
                    occurred_at
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
                debug!("[{}] Latest warning already alerted ({})", KIND, occurred_at);
            }
            GateDecision::SuppressOutOfWindow => {
                debug!(
                    "[{}] Latest warning outside alert window ({})",
                    KIND, occurred_at
                );
            }
        }

        Ok(())
    }
}

/// Renders the broadcast report for an accepted early-warning record.
fn render_report(record: &EewRecord) -> String {
    let mut out = String::new();
    out.push_str("緊急地震速報（警報）　強い揺れに警戒してください\n");
    out.push_str("==========\n");
    for area in &record.areas {
        let _ = writeln!(out, "{}　予想震度：{}", area.name, area.scale_bucket());
    }
    out.push_str("==========");
    out
}

impl std::fmt::Debug for EewMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EewMonitor")
            .field("last_accepted", &self.gate.last_accepted())
            .field("poll_interval", &self.config.poll_interval)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> EewRecord {
        serde_json::from_str(
            r#"{
                "earthquake": {
                    "originTime": "2026/01/11 13:15:00",
                    "hypocenter": {"name": "岩手県沿岸北部", "magnitude": 6.1, "depth": 30}
                },
                "areas": [
                    {"name": "岩手県内陸北部", "pref": "岩手", "scaleFrom": 45, "scaleTo": 50},
                    {"name": "岩手県沿岸北部", "pref": "岩手", "scaleFrom": 50, "scaleTo": 55}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_report_contains_banner_and_areas() {
        let report = render_report(&sample_record());
        assert!(report.starts_with("緊急地震速報（警報）"));
        assert!(report.contains("岩手県内陸北部　予想震度：震度5弱"));
        assert!(report.contains("岩手県沿岸北部　予想震度：震度5強"));
    }

    #[test]
    fn test_report_with_no_areas_keeps_banner() {
        let record: EewRecord = serde_json::from_str(
            r#"{"earthquake": {"originTime": "2026/01/11 13:15:00"}, "areas": []}"#,
        )
        .unwrap();
        let report = render_report(&record);
        assert!(report.contains("緊急地震速報"));
    }
}
