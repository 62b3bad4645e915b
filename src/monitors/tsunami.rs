//! Tsunami-forecast monitor (feed code 552).
//!
//! Polls the latest forecast record, gates it on the issue time, and on
//! acceptance renders one block per forecast grade (severe-first) listing
//! each coastal area with its first-wave condition.

use std::fmt::Write as _;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::connectors::{FeedError, P2pQuakeClient, TsunamiRecord};
use crate::events::DisasterEvent;
use crate::kinds::DisasterKind;
use crate::monitors::{AlertGate, GateDecision, MonitorConfig};
use crate::severity::{group_by_bucket, TsunamiGrade};
use crate::utils::jst_now;

const KIND: DisasterKind = DisasterKind::Tsunami;

/// Watches the tsunami-forecast feed.
pub struct TsunamiMonitor {
    config: MonitorConfig,
    client: P2pQuakeClient,
    event_tx: mpsc::Sender<DisasterEvent>,
    gate: AlertGate,
}

impl TsunamiMonitor {
    /// Creates a new tsunami monitor with the default configuration.
    pub fn new(client: P2pQuakeClient, event_tx: mpsc::Sender<DisasterEvent>) -> Self {
        Self::with_config(MonitorConfig::default(), client, event_tx)
    }

    /// Creates a new tsunami monitor with custom configuration.
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
        info!("[{}] Tsunami monitoring started", KIND);

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
        let record = self.client.latest_tsunami().await?;
        let occurred_at = record.occurred_at()?;

        match self.gate.evaluate(occurred_at, jst_now()) {
            GateDecision::Accept => {
                info!(
                    "[{}] New tsunami forecast accepted ({} areas, issued {})",
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
                debug!("[{}] Latest forecast already alerted ({})", KIND, occurred_at);
            }
            GateDecision::SuppressOutOfWindow => {
                debug!(
                    "[{}] Latest forecast outside alert window ({})",
                    KIND, occurred_at
                );
            }
        }

        Ok(())
    }
}

/// Renders the broadcast report for an accepted tsunami forecast.
fn render_report(record: &TsunamiRecord) -> String {
    let mut out = String::new();
    out.push_str("----津波予報----\n");

    let grouped = group_by_bucket(&record.areas, |a| a.grade_bucket());
    // Unknown sorts above the real grades; report it after them instead.
    let ordered = grouped
        .iter()
        .rev()
        .filter(|(grade, _)| **grade != TsunamiGrade::Unknown)
        .chain(grouped.get_key_value(&TsunamiGrade::Unknown));
    for (grade, areas) in ordered {
        let _ = writeln!(out, "{grade}：");
        for area in areas {
            let condition = area
                .first_height
                .as_ref()
                .and_then(|h| h.condition.as_deref())
                .unwrap_or("発表なし");
            let _ = writeln!(out, "　{}：{}", area.name, condition);
        }
    }
    out.push_str("------------");
    out
}

impl std::fmt::Debug for TsunamiMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TsunamiMonitor")
            .field("last_accepted", &self.gate.last_accepted())
            .field("poll_interval", &self.config.poll_interval)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> TsunamiRecord {
        serde_json::from_str(
            r#"{
                "time": "2026/01/11 13:17:00",
                "areas": [
                    {
                        "name": "青森県太平洋沿岸",
                        "grade": "Watch",
                        "firstHeight": {"condition": "第一波の到達を確認"}
                    },
                    {
                        "name": "北海道太平洋沿岸東部",
                        "grade": "MajorWarning",
                        "immediate": true,
                        "firstHeight": {"condition": "ただちに津波来襲と予測"}
                    },
                    {
                        "name": "岩手県",
                        "grade": "MajorWarning",
                        "firstHeight": {"condition": "津波到達中と推測"}
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_report_groups_by_grade_severe_first() {
        let report = render_report(&sample_record());

        let major = report.find("大津波警報：").unwrap();
        let watch = report.find("津波注意報：").unwrap();
        assert!(major < watch);
        assert!(report.contains("北海道太平洋沿岸東部：ただちに津波来襲と予測"));
        assert!(report.contains("青森県太平洋沿岸：第一波の到達を確認"));
    }

    #[test]
    fn test_report_keeps_area_order_within_grade() {
        let report = render_report(&sample_record());

        let hokkaido = report.find("北海道太平洋沿岸東部").unwrap();
        let iwate = report.find("岩手県：津波到達中と推測").unwrap();
        assert!(hokkaido < iwate);
    }

    #[test]
    fn test_unknown_grade_renders_after_real_grades() {
        let record: TsunamiRecord = serde_json::from_str(
            r#"{
                "time": "2026/01/11 13:17:00",
                "areas": [
                    {"name": "沿岸A", "grade": "Foo"},
                    {"name": "沿岸B", "grade": "MajorWarning"}
                ]
            }"#,
        )
        .unwrap();

        let report = render_report(&record);
        let major = report.find("大津波警報：").unwrap();
        let unknown = report.find("不明：").unwrap();
        assert!(major < unknown);
    }

    #[test]
    fn test_report_without_first_height() {
        let record: TsunamiRecord = serde_json::from_str(
            r#"{"time": "2026/01/11 13:17:00", "areas": [{"name": "千葉県九十九里", "grade": "Watch"}]}"#,
        )
        .unwrap();
        let report = render_report(&record);
        assert!(report.contains("千葉県九十九里：発表なし"));
    }
}
