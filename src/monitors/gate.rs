//! Dedup and relevance gate shared by the monitor loops.
//!
//! The feed is a "current status" endpoint, so every poll re-serves the same
//! latest record. Deduplication compares against the last *accepted* event
//! time rather than the time of the last poll, which keeps it correct across
//! scheduler jitter and repeated polls. Relevance compares against wall
//! clock, so a backfilled historical record or a monitor that was offline
//! never produces a late alert.

use chrono::{Duration, NaiveDateTime};

/// Outcome of gating one record.
///
/// Suppression is the normal, frequent outcome - every poll that does not
/// find a fresh actionable event suppresses. Only `Accept` commits state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// The event is new and within the alert window; the gate advanced.
    Accept,
    /// The event is at or before the last accepted event time.
    SuppressStale,
    /// The event is new relative to gate state but has aged past the
    /// alert window.
    SuppressOutOfWindow,
}

/// Per-monitor gate state. One instance per monitor, exactly one writer.
///
/// Known limitation: records are identified only by their event timestamp.
/// Two genuinely distinct events sharing a timestamp collide and the second
/// is suppressed.
#[derive(Debug)]
pub struct AlertGate {
    /// Monotonically non-decreasing; advanced only on `Accept`.
    last_accepted: NaiveDateTime,
    alert_window: Duration,
}

impl AlertGate {
    /// Creates a gate whose floor is the minimum representable timestamp
    /// plus a grace offset, so the very first real event is never treated
    /// as already seen on clock-skew edge cases.
    pub fn new(alert_window_secs: i64, grace_secs: i64) -> Self {
        Self {
            last_accepted: NaiveDateTime::MIN + Duration::seconds(grace_secs),
            alert_window: Duration::seconds(alert_window_secs),
        }
    }

    /// Returns the last accepted event time.
    pub fn last_accepted(&self) -> NaiveDateTime {
        self.last_accepted
    }

    /// Gates one record. Both checks run on every evaluation; suppress
    /// outcomes leave the gate untouched and may be re-evaluated on the
    /// next tick with an updated `now`.
    pub fn evaluate(&mut self, occurred_at: NaiveDateTime, now: NaiveDateTime) -> GateDecision {
        if occurred_at <= self.last_accepted {
            return GateDecision::SuppressStale;
        }

        let age_secs = (now - occurred_at).num_seconds().abs();
        if age_secs > self.alert_window.num_seconds() {
            return GateDecision::SuppressOutOfWindow;
        }

        self.last_accepted = occurred_at;
        GateDecision::Accept
    }
}
