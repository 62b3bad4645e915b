//! Registry owning the monitor task handles.
//!
//! The original "already started" guard was a mutable static per monitor;
//! here each started monitor is an explicit owned [`JoinHandle`] kept in a
//! registry keyed by disaster kind, with idempotent start and explicit
//! teardown. Dispatch from kind to monitor is a closed match - no runtime
//! type lookup.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::connectors::P2pQuakeClient;
use crate::events::DisasterEvent;
use crate::kinds::DisasterKind;
use crate::monitors::{EarthquakeMonitor, EewMonitor, MonitorConfig, TsunamiMonitor};

/// Owns one task handle per started monitor.
///
/// Each monitor owns its gate exclusively; the registry only owns the task
/// handles, so there is no shared state between kinds.
pub struct MonitorRegistry {
    config: MonitorConfig,
    client: P2pQuakeClient,
    event_tx: mpsc::Sender<DisasterEvent>,
    handles: HashMap<DisasterKind, JoinHandle<()>>,
}

impl MonitorRegistry {
    /// Creates an empty registry with the default monitor configuration.
    pub fn new(client: P2pQuakeClient, event_tx: mpsc::Sender<DisasterEvent>) -> Self {
        Self::with_config(MonitorConfig::default(), client, event_tx)
    }

    /// Creates an empty registry with custom monitor configuration.
    pub fn with_config(
        config: MonitorConfig,
        client: P2pQuakeClient,
        event_tx: mpsc::Sender<DisasterEvent>,
    ) -> Self {
        Self {
            config,
            client,
            event_tx,
            handles: HashMap::new(),
        }
    }

    /// Starts the monitor for a kind, if it is not already running.
    ///
    /// Idempotent: returns false and does nothing when a live handle for
    /// that kind already exists. A finished (panicked) handle is replaced.
    pub fn start(&mut self, kind: DisasterKind) -> bool {
        if let Some(handle) = self.handles.get(&kind) {
            if !handle.is_finished() {
                debug!("[{}] Monitor already running, start is a no-op", kind);
                return false;
            }
        }

        let config = self.config.clone();
        let client = self.client.clone();
        let event_tx = self.event_tx.clone();

        let handle = match kind {
            DisasterKind::Earthquake => {
                tokio::spawn(EarthquakeMonitor::with_config(config, client, event_tx).run())
            }
            DisasterKind::EarlyWarning => {
                tokio::spawn(EewMonitor::with_config(config, client, event_tx).run())
            }
            DisasterKind::Tsunami => {
                tokio::spawn(TsunamiMonitor::with_config(config, client, event_tx).run())
            }
        };

        info!("[{}] Monitor started ({})", kind, kind.name());
        self.handles.insert(kind, handle);
        true
    }

    /// Starts every monitored kind.
    pub fn start_all(&mut self) {
        for kind in DisasterKind::all() {
            self.start(kind);
        }
    }

    /// Returns whether the monitor for a kind is currently running.
    pub fn is_running(&self, kind: DisasterKind) -> bool {
        self.handles
            .get(&kind)
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Aborts all monitor tasks and drops their handles.
    pub fn shutdown(&mut self) {
        for (kind, handle) in self.handles.drain() {
            handle.abort();
            info!("[{}] Monitor stopped", kind);
        }
    }
}

impl Drop for MonitorRegistry {
    fn drop(&mut self) {
        for handle in self.handles.values() {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for MonitorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorRegistry")
            .field("started", &self.handles.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> (MonitorRegistry, mpsc::Receiver<DisasterEvent>) {
        let (event_tx, event_rx) = mpsc::channel(16);
        // Endpoint is never contacted before the first tick resolves; these
        // tests only exercise handle bookkeeping.
        let client = P2pQuakeClient::with_endpoint("http://127.0.0.1:1".to_string());
        (MonitorRegistry::new(client, event_tx), event_rx)
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let (mut registry, _rx) = registry();

        assert!(registry.start(DisasterKind::Earthquake));
        assert!(!registry.start(DisasterKind::Earthquake));
        assert!(registry.is_running(DisasterKind::Earthquake));

        registry.shutdown();
    }

    #[tokio::test]
    async fn test_kinds_start_independently() {
        let (mut registry, _rx) = registry();

        registry.start_all();
        for kind in DisasterKind::all() {
            assert!(registry.is_running(kind));
        }

        registry.shutdown();
        for kind in DisasterKind::all() {
            assert!(!registry.is_running(kind));
        }
    }

    #[tokio::test]
    async fn test_unstarted_kind_is_not_running() {
        let (registry, _rx) = registry();
        assert!(!registry.is_running(DisasterKind::Tsunami));
    }
}
