//! Wire types returned by the reporting API.
//!
//! Decoding is deliberately lenient: unknown enum values fall back to a
//! neutral variant and missing fields take their "no reading" default, so a
//! single odd field never throws away a whole slice.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer};

/// Overall state of the observed service, as judged by the health monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServiceStatus {
    Healthy,
    Critical,
    Healing,
    #[default]
    Unknown,
}

impl ServiceStatus {
    /// Returns the display label for this status.
    pub fn label(&self) -> &'static str {
        match self {
            ServiceStatus::Healthy => "OPERATIONAL",
            ServiceStatus::Critical => "CRITICAL",
            ServiceStatus::Healing => "HEALING",
            ServiceStatus::Unknown => "UNKNOWN",
        }
    }
}

impl From<&str> for ServiceStatus {
    fn from(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "HEALTHY" => ServiceStatus::Healthy,
            "CRITICAL" => ServiceStatus::Critical,
            "HEALING" => ServiceStatus::Healing,
            _ => ServiceStatus::Unknown,
        }
    }
}

/// Up/down state of a single heartbeat sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeartbeatStatus {
    Up,
    #[default]
    Down,
}

impl From<&str> for HeartbeatStatus {
    fn from(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("up") {
            HeartbeatStatus::Up
        } else {
            HeartbeatStatus::Down
        }
    }
}

/// Severity/category tag of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogKind {
    #[default]
    Info,
    Warn,
    Error,
    Crash,
    Heal,
    Event,
}

impl LogKind {
    /// Returns the tag as shown in the log panel.
    pub fn tag(&self) -> &'static str {
        match self {
            LogKind::Info => "INFO",
            LogKind::Warn => "WARN",
            LogKind::Error => "ERROR",
            LogKind::Crash => "CRASH",
            LogKind::Heal => "HEAL",
            LogKind::Event => "EVENT",
        }
    }
}

impl From<&str> for LogKind {
    fn from(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "WARN" | "WARNING" => LogKind::Warn,
            "ERROR" => LogKind::Error,
            "CRASH" => LogKind::Crash,
            "HEAL" => LogKind::Heal,
            "EVENT" => LogKind::Event,
            _ => LogKind::Info,
        }
    }
}

/// An ISO-8601 timestamp as sent by the API.
///
/// The raw text is kept so an unparseable value can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Parse into a naive local time. Offsets, when present, are dropped.
    pub fn parse(&self) -> Option<NaiveDateTime> {
        let raw = self.0.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_local());
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()
    }

    /// Wall-clock time of day (`HH:MM:SS`), or the raw text if unparseable.
    pub fn clock(&self) -> String {
        self.parse()
            .map(|dt| dt.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| self.0.clone())
    }
}

/// Current service status as reported by `/api/status`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct StatusSnapshot {
    #[serde(default, deserialize_with = "lenient_enum")]
    pub status: ServiceStatus,
    #[serde(default)]
    pub last_check: Option<Timestamp>,
    #[serde(default)]
    pub uptime_start: Option<Timestamp>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_crashes: u64,
    #[serde(default)]
    pub last_crash: Option<Timestamp>,
    #[serde(default)]
    pub last_heal: Option<Timestamp>,
    #[serde(default, deserialize_with = "non_negative")]
    pub latency_ms: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_events: u64,
    #[serde(default)]
    pub last_event: Option<String>,
    #[serde(default)]
    pub memory_mb: Option<f64>,
    #[serde(default)]
    pub cpu_percent: Option<f64>,
}

impl StatusSnapshot {
    /// Latest round-trip latency, or `None` if there is no reading yet.
    pub fn latency(&self) -> Option<f64> {
        (self.latency_ms > 0.0).then_some(self.latency_ms)
    }
}

/// One sample of the heartbeat series.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HeartbeatPoint {
    pub timestamp: Timestamp,
    #[serde(default, deserialize_with = "non_negative")]
    pub latency: f64,
    #[serde(default)]
    pub actual_latency: Option<f64>,
    #[serde(default, deserialize_with = "lenient_enum")]
    pub status: HeartbeatStatus,
    #[serde(default)]
    pub event_spike: bool,
    #[serde(default)]
    pub memory_mb: Option<f64>,
    #[serde(default)]
    pub cpu_percent: Option<f64>,
}

impl HeartbeatPoint {
    /// Returns true if the target answered this heartbeat.
    pub fn is_up(&self) -> bool {
        self.status == HeartbeatStatus::Up
    }

    /// Latency rounded to whole milliseconds, for charting.
    pub fn latency_ms(&self) -> u64 {
        self.latency.round() as u64
    }
}

/// One line of the remote log stream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogEntry {
    pub timestamp: Timestamp,
    #[serde(rename = "type", default, deserialize_with = "lenient_enum")]
    pub kind: LogKind,
    #[serde(default)]
    pub message: String,
}

/// Decode a string-valued enum, mapping anything unrecognised (including
/// `null` or a non-string) to the type's default.
fn lenient_enum<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: for<'a> From<&'a str> + Default,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) => T::from(s.as_str()),
        _ => T::default(),
    })
}

/// Decode a millisecond reading; `null` and negatives become 0.
fn non_negative<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(0.0))
}

/// Decode a counter; `null` and negatives become 0, fractions are rounded.
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw
        .filter(|v| v.is_finite() && *v > 0.0)
        .map_or(0, |v| v.round() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_status() {
        let json = r#"{
            "status": "CRITICAL",
            "last_check": "2024-05-01T12:30:45.123456",
            "uptime_start": "2024-05-01T12:00:00",
            "total_crashes": 3,
            "total_events": 7,
            "last_crash": "2024-05-01T12:30:40.000001",
            "last_heal": null,
            "last_event": "Random Chaos",
            "latency_ms": 0,
            "memory_mb": 12.5,
            "cpu_percent": 0
        }"#;

        let status: StatusSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(status.status, ServiceStatus::Critical);
        assert_eq!(status.total_crashes, 3);
        assert_eq!(status.total_events, 7);
        assert!(status.last_heal.is_none());
        assert_eq!(status.latency(), None);
        assert_eq!(status.last_event.as_deref(), Some("Random Chaos"));
        assert_eq!(status.last_check.unwrap().clock(), "12:30:45");
    }

    #[test]
    fn test_unknown_status_maps_to_unknown() {
        let status: StatusSnapshot = serde_json::from_str(r#"{"status": "REBOOTING"}"#).unwrap();
        assert_eq!(status.status, ServiceStatus::Unknown);

        let status: StatusSnapshot = serde_json::from_str(r#"{"status": null}"#).unwrap();
        assert_eq!(status.status, ServiceStatus::Unknown);

        let status: StatusSnapshot = serde_json::from_str(r#"{"status": 42}"#).unwrap();
        assert_eq!(status.status, ServiceStatus::Unknown);
    }

    #[test]
    fn test_status_is_case_insensitive() {
        let status: StatusSnapshot = serde_json::from_str(r#"{"status": "healing"}"#).unwrap();
        assert_eq!(status.status, ServiceStatus::Healing);
    }

    #[test]
    fn test_negative_latency_clamps_to_zero() {
        let status: StatusSnapshot = serde_json::from_str(r#"{"latency_ms": -4.2}"#).unwrap();
        assert_eq!(status.latency_ms, 0.0);
        assert_eq!(status.latency(), None);

        let status: StatusSnapshot = serde_json::from_str(r#"{"latency_ms": 12.34}"#).unwrap();
        assert_eq!(status.latency(), Some(12.34));
    }

    #[test]
    fn test_odd_counters_keep_the_snapshot() {
        let status: StatusSnapshot = serde_json::from_str(
            r#"{"status": "HEALTHY", "total_crashes": 2.6, "total_events": -1}"#,
        )
        .unwrap();
        assert_eq!(status.status, ServiceStatus::Healthy);
        assert_eq!(status.total_crashes, 3);
        assert_eq!(status.total_events, 0);

        let status: StatusSnapshot =
            serde_json::from_str(r#"{"total_crashes": null, "total_events": 7}"#).unwrap();
        assert_eq!(status.total_crashes, 0);
        assert_eq!(status.total_events, 7);
    }

    #[test]
    fn test_deserialize_heartbeat() {
        let json = r#"[
            {"timestamp": "2024-05-01T12:00:00", "latency": 3.6, "actual_latency": 3.6,
             "status": "up", "event_spike": false, "memory_mb": 0, "cpu_percent": 0},
            {"timestamp": "2024-05-01T12:00:01", "latency": 0, "status": "down"},
            {"timestamp": "2024-05-01T12:00:02", "latency": 812.0, "status": "up", "event_spike": true}
        ]"#;

        let points: Vec<HeartbeatPoint> = serde_json::from_str(json).unwrap();
        assert_eq!(points.len(), 3);
        assert!(points[0].is_up());
        assert_eq!(points[0].latency_ms(), 4);
        assert!(!points[1].is_up());
        assert_eq!(points[1].latency_ms(), 0);
        assert!(points[2].event_spike);
        assert!(points[1].actual_latency.is_none());
    }

    #[test]
    fn test_deserialize_logs() {
        let json = r#"[
            {"timestamp": "2024-05-01T12:00:00", "type": "INFO", "message": "[STARTUP] starting"},
            {"timestamp": "2024-05-01T12:00:05", "type": "CRASH", "message": "[CRASH] down"},
            {"timestamp": "2024-05-01T12:00:09", "type": "DEBUG", "message": "odd"}
        ]"#;

        let logs: Vec<LogEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(logs[0].kind, LogKind::Info);
        assert_eq!(logs[1].kind, LogKind::Crash);
        assert_eq!(logs[2].kind, LogKind::Info);
        assert_eq!(logs[1].kind.tag(), "CRASH");
    }

    #[test]
    fn test_timestamp_with_offset() {
        let ts = Timestamp::new("2024-05-01T08:15:00+02:00");
        assert_eq!(ts.clock(), "08:15:00");
    }

    #[test]
    fn test_unparseable_timestamp_keeps_raw_text() {
        let ts = Timestamp::new("yesterday");
        assert!(ts.parse().is_none());
        assert_eq!(ts.clock(), "yesterday");
    }
}
