//! REST client for the P2P-quake disaster-information feed.
//!
//! The feed is a "current status" history endpoint: every poll re-serves the
//! most recent records for a code, newest first. All records fetched here are
//! raw and must pass through the alert gate before any broadcast.

use chrono::NaiveDateTime;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::kinds::DisasterKind;
use crate::severity::{IntensityScale, TsunamiGrade};

/// Default feed endpoint.
const DEFAULT_API_URL: &str = "https://api.p2pquake.net/v2";

/// Feed timestamps are JST local time with no offset. The 551 report time
/// carries a fractional-seconds suffix, the others do not.
const FEED_TIME_PLAIN: &str = "%Y/%m/%d %H:%M:%S";
const FEED_TIME_FRACTIONAL: &str = "%Y/%m/%d %H:%M:%S%.f";

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("feed returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to decode feed payload: {0}")]
    Decode(String),

    #[error("feed history is empty")]
    EmptyHistory,

    #[error("unparseable event time {value:?}: {source}")]
    Time {
        value: String,
        source: chrono::format::ParseError,
    },
}

/// Parses a feed timestamp into a naive (JST-local) datetime.
///
/// A present-but-garbled value is a parse failure, not a missing-event
/// condition; callers treat it the same as a failed fetch.
pub fn parse_feed_time(value: &str) -> Result<NaiveDateTime, FeedError> {
    NaiveDateTime::parse_from_str(value, FEED_TIME_PLAIN)
        .or_else(|_| NaiveDateTime::parse_from_str(value, FEED_TIME_FRACTIONAL))
        .map_err(|source| FeedError::Time {
            value: value.to_string(),
            source,
        })
}

/// P2P-quake API client for REST polling.
#[derive(Clone)]
pub struct P2pQuakeClient {
    client: Client,
    api_url: String,
}

impl P2pQuakeClient {
    /// Creates a new client against the default endpoint.
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_API_URL.to_string())
    }

    /// Creates a new client against a custom endpoint.
    pub fn with_endpoint(api_url: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, api_url }
    }

    /// Returns the feed base URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Fetches the latest earthquake-information record (code 551).
    pub async fn latest_earthquake(&self) -> Result<EarthquakeRecord, FeedError> {
        self.latest(DisasterKind::Earthquake).await
    }

    /// Fetches the latest early-warning record (code 556).
    pub async fn latest_early_warning(&self) -> Result<EewRecord, FeedError> {
        self.latest(DisasterKind::EarlyWarning).await
    }

    /// Fetches the latest tsunami-forecast record (code 552).
    pub async fn latest_tsunami(&self) -> Result<TsunamiRecord, FeedError> {
        self.latest(DisasterKind::Tsunami).await
    }

    /// Fetches the newest history entry for a feed code.
    async fn latest<T: DeserializeOwned>(&self, kind: DisasterKind) -> Result<T, FeedError> {
        let url = format!(
            "{}/history?codes={}&limit=1",
            self.api_url,
            kind.feed_code()
        );

        debug!("[{}] Fetching latest record: {}", kind, url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(FeedError::Status { status, message });
        }

        let mut records: Vec<T> = response
            .json()
            .await
            .map_err(|e| FeedError::Decode(e.to_string()))?;

        if records.is_empty() {
            return Err(FeedError::EmptyHistory);
        }

        Ok(records.remove(0))
    }
}

impl Default for P2pQuakeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for P2pQuakeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("P2pQuakeClient")
            .field("api_url", &self.api_url)
            .finish()
    }
}

// ============ Feed Records ============

/// Earthquake-information record (code 551).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarthquakeRecord {
    /// Report time, e.g. "2026/01/11 13:15:04.273".
    pub time: String,
    pub earthquake: EarthquakeBody,
    #[serde(default)]
    pub points: Vec<ObservationPoint>,
}

impl EarthquakeRecord {
    /// The authoritative event time this record is gated on.
    pub fn occurred_at(&self) -> Result<NaiveDateTime, FeedError> {
        parse_feed_time(&self.time)
    }
}

/// Details of the earthquake itself.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarthquakeBody {
    /// Occurrence time, e.g. "2026/01/11 13:15:00".
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub hypocenter: Hypocenter,
    /// Maximum observed intensity code; -1 when no intensity data exists.
    #[serde(default = "unknown_scale")]
    pub max_scale: i32,
    #[serde(default)]
    pub domestic_tsunami: Option<String>,
    #[serde(default)]
    pub foreign_tsunami: Option<String>,
}

impl EarthquakeBody {
    /// Maximum observed intensity as a classified scale step.
    pub fn max_scale_bucket(&self) -> IntensityScale {
        IntensityScale::from_code(self.max_scale)
    }
}

/// Hypocenter description, opaque to the gate and passed through to
/// rendering.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hypocenter {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub depth: i32,
    #[serde(default)]
    pub magnitude: f32,
    #[serde(default)]
    pub latitude: f32,
    #[serde(default)]
    pub longitude: f32,
}

/// A single intensity observation: prefecture, station address and the raw
/// intensity code.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationPoint {
    #[serde(default)]
    pub pref: String,
    #[serde(default)]
    pub addr: String,
    #[serde(default = "unknown_scale")]
    pub scale: i32,
}

impl ObservationPoint {
    /// The observed intensity as a classified scale step.
    pub fn scale_bucket(&self) -> IntensityScale {
        IntensityScale::from_code(self.scale)
    }
}

fn unknown_scale() -> i32 {
    -1
}

/// Early-warning record (code 556).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EewRecord {
    pub earthquake: Option<EewEarthquake>,
    #[serde(default)]
    pub areas: Vec<WarningArea>,
}

impl EewRecord {
    /// The authoritative event time this record is gated on.
    pub fn occurred_at(&self) -> Result<NaiveDateTime, FeedError> {
        let earthquake = self.earthquake.as_ref().ok_or_else(|| {
            FeedError::Decode("early-warning record has no earthquake body".to_string())
        })?;
        parse_feed_time(&earthquake.origin_time)
    }
}

/// The earthquake an early warning was issued for.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EewEarthquake {
    /// Origin time, e.g. "2026/01/11 13:15:00".
    #[serde(default)]
    pub origin_time: String,
    #[serde(default)]
    pub arrival_time: Option<String>,
    #[serde(default)]
    pub hypocenter: EewHypocenter,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EewHypocenter {
    #[serde(default)]
    pub name: Option<String>,
    /// Short form of the hypocenter name, e.g. "岩手県".
    #[serde(default)]
    pub reduce_name: Option<String>,
    #[serde(default)]
    pub depth: i32,
    #[serde(default)]
    pub magnitude: f32,
    #[serde(default)]
    pub latitude: f32,
    #[serde(default)]
    pub longitude: f32,
}

/// A region named in an early warning, with its predicted intensity range.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningArea {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pref: String,
    /// Minimum predicted intensity code.
    #[serde(default = "unknown_scale")]
    pub scale_from: i32,
    /// Maximum predicted intensity code.
    #[serde(default = "unknown_scale")]
    pub scale_to: i32,
    #[serde(default)]
    pub arrival_time: Option<String>,
}

impl WarningArea {
    /// Minimum predicted intensity as a classified scale step.
    pub fn scale_bucket(&self) -> IntensityScale {
        IntensityScale::from_code(self.scale_from)
    }
}

/// Tsunami-forecast record (code 552).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsunamiRecord {
    /// Issue time, e.g. "2026/01/11 13:17:00".
    pub time: String,
    #[serde(default)]
    pub areas: Vec<TsunamiArea>,
}

impl TsunamiRecord {
    /// The authoritative event time this record is gated on.
    pub fn occurred_at(&self) -> Result<NaiveDateTime, FeedError> {
        parse_feed_time(&self.time)
    }
}

/// A coastal region named in a tsunami forecast.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsunamiArea {
    #[serde(default)]
    pub name: String,
    /// Raw grade code, e.g. "MajorWarning" / "Warning" / "Watch".
    #[serde(default)]
    pub grade: String,
    /// Whether immediate arrival is expected.
    #[serde(default)]
    pub immediate: bool,
    #[serde(default)]
    pub first_height: Option<FirstHeight>,
    #[serde(default)]
    pub max_height: Option<MaxHeight>,
}

impl TsunamiArea {
    /// The forecast grade as a classified bucket.
    pub fn grade_bucket(&self) -> TsunamiGrade {
        TsunamiGrade::from_code(&self.grade)
    }
}

/// First-wave arrival forecast for an area.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstHeight {
    #[serde(default)]
    pub arrival_time: Option<String>,
    /// Arrival condition text, e.g. "ただちに津波来襲と予測".
    #[serde(default)]
    pub condition: Option<String>,
}

/// Maximum-height forecast for an area.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxHeight {
    /// Height as text, e.g. "巨大" / "3m" / "0.2m未満".
    #[serde(default)]
    pub description: Option<String>,
    /// Height in meters, when numeric.
    #[serde(default)]
    pub value: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_feed_time_plain() {
        let parsed = parse_feed_time("2026/01/11 13:15:00").unwrap();
        let expected = NaiveDate::from_ymd_opt(2026, 1, 11)
            .unwrap()
            .and_hms_opt(13, 15, 0)
            .unwrap();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_parse_feed_time_fractional() {
        let parsed = parse_feed_time("2026/01/11 13:15:04.273").unwrap();
        let expected = NaiveDate::from_ymd_opt(2026, 1, 11)
            .unwrap()
            .and_hms_milli_opt(13, 15, 4, 273)
            .unwrap();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_parse_feed_time_garbled() {
        assert!(matches!(
            parse_feed_time("not a timestamp"),
            Err(FeedError::Time { .. })
        ));
        assert!(matches!(parse_feed_time(""), Err(FeedError::Time { .. })));
    }

    #[test]
    fn test_decode_earthquake_record() {
        let payload = r#"{
            "time": "2026/01/11 13:15:04.273",
            "earthquake": {
                "time": "2026/01/11 13:15:00",
                "hypocenter": {
                    "name": "石川県能登地方",
                    "depth": 10,
                    "magnitude": 5.5,
                    "latitude": 37.5,
                    "longitude": 137.2
                },
                "maxScale": 50,
                "domesticTsunami": "None"
            },
            "points": [
                {"pref": "石川県", "addr": "輪島市鳳至町", "scale": 50},
                {"pref": "石川県", "addr": "穴水町大町", "scale": 40}
            ]
        }"#;

        let record: EarthquakeRecord = serde_json::from_str(payload).unwrap();
        assert_eq!(record.earthquake.hypocenter.name, "石川県能登地方");
        assert_eq!(record.earthquake.max_scale_bucket(), IntensityScale::FiveHigh);
        assert_eq!(record.points.len(), 2);
        assert_eq!(record.points[1].scale_bucket(), IntensityScale::Four);
        assert!(record.occurred_at().is_ok());
    }

    #[test]
    fn test_decode_earthquake_record_without_intensity_data() {
        let payload = r#"{
            "time": "2026/01/11 13:15:04.27",
            "earthquake": {"time": "2026/01/11 13:15:00"}
        }"#;

        let record: EarthquakeRecord = serde_json::from_str(payload).unwrap();
        assert_eq!(record.earthquake.max_scale, -1);
        assert_eq!(record.earthquake.max_scale_bucket(), IntensityScale::Unknown);
        assert!(record.points.is_empty());
    }

    #[test]
    fn test_decode_eew_record() {
        let payload = r#"{
            "earthquake": {
                "originTime": "2026/01/11 13:15:00",
                "arrivalTime": "2026/01/11 13:15:08",
                "hypocenter": {"name": "岩手県沿岸北部", "reduceName": "岩手県", "magnitude": 6.1, "depth": 30}
            },
            "areas": [
                {"name": "岩手県内陸北部", "pref": "岩手", "scaleFrom": 45, "scaleTo": 50}
            ]
        }"#;

        let record: EewRecord = serde_json::from_str(payload).unwrap();
        assert_eq!(record.areas.len(), 1);
        assert_eq!(record.areas[0].scale_bucket(), IntensityScale::FiveLow);
        assert!(record.occurred_at().is_ok());
    }

    #[test]
    fn test_eew_record_without_earthquake_body_is_unusable() {
        let record: EewRecord = serde_json::from_str(r#"{"areas": []}"#).unwrap();
        assert!(matches!(record.occurred_at(), Err(FeedError::Decode(_))));
    }

    #[test]
    fn test_decode_tsunami_record() {
        let payload = r#"{
            "time": "2026/01/11 13:17:00",
            "areas": [
                {
                    "name": "北海道太平洋沿岸東部",
                    "grade": "MajorWarning",
                    "immediate": true,
                    "firstHeight": {"condition": "ただちに津波来襲と予測"},
                    "maxHeight": {"description": "巨大", "value": 10.0}
                },
                {
                    "name": "青森県太平洋沿岸",
                    "grade": "Watch",
                    "immediate": false
                }
            ]
        }"#;

        let record: TsunamiRecord = serde_json::from_str(payload).unwrap();
        assert_eq!(record.areas[0].grade_bucket(), TsunamiGrade::MajorWarning);
        assert_eq!(record.areas[1].grade_bucket(), TsunamiGrade::Watch);
        assert!(record.areas[0].immediate);
        assert!(record.occurred_at().is_ok());
    }
}
