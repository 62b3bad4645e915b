//! Connectors for the upstream disaster feed.
//!
//! This module provides the low-level REST client for the P2P-quake API.
//! All data fetched here is raw and must pass through the alert gate and
//! events layer before any broadcast.

mod p2pquake;

pub use p2pquake::{
    parse_feed_time, EarthquakeBody, EarthquakeRecord, EewEarthquake, EewHypocenter, EewRecord,
    FeedError, FirstHeight, Hypocenter, MaxHeight, ObservationPoint, P2pQuakeClient, TsunamiArea,
    TsunamiRecord, WarningArea,
};
