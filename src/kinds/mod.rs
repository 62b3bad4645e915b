//! Disaster kind definitions for the monitored feeds.
//!
//! Each kind operates in complete isolation with its own:
//! - Async monitor task
//! - Alert gate instance
//! - Feed code on the upstream API
//!
//! A failure in one kind's monitor must NOT affect any other kind.

use std::fmt;

/// The disaster feeds monitored on the P2P-quake API.
///
/// Dispatch from a kind to its concrete monitor is a closed match in
/// `MonitorRegistry::start` - there is no runtime type lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisasterKind {
    Earthquake,
    EarlyWarning,
    Tsunami,
}

impl DisasterKind {
    /// Returns all monitored kinds.
    pub fn all() -> Vec<DisasterKind> {
        vec![
            DisasterKind::Earthquake,
            DisasterKind::EarlyWarning,
            DisasterKind::Tsunami,
        ]
    }

    /// Returns the kind's display name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            DisasterKind::Earthquake => "Earthquake Information",
            DisasterKind::EarlyWarning => "Earthquake Early Warning",
            DisasterKind::Tsunami => "Tsunami Forecast",
        }
    }

    /// Returns the short tag used in log line prefixes.
    pub fn tag(&self) -> &'static str {
        match self {
            DisasterKind::Earthquake => "QUAKE",
            DisasterKind::EarlyWarning => "EEW",
            DisasterKind::Tsunami => "TSUNAMI",
        }
    }

    /// Returns the history code identifying this feed on the P2P-quake API.
    ///
    /// 551 = earthquake information, 556 = early warning (alert),
    /// 552 = tsunami forecast.
    pub fn feed_code(&self) -> u16 {
        match self {
            DisasterKind::Earthquake => 551,
            DisasterKind::EarlyWarning => 556,
            DisasterKind::Tsunami => 552,
        }
    }
}

impl fmt::Display for DisasterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}
