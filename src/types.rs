// src/types.rs

use serde::{Deserialize, Serialize};

use crate::geometry;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub detection: DetectionConfig,
    pub source: SourceConfig,
    pub assist: AssistConfig,
    pub logging: LoggingConfig,
    /// Layout snapshot for the session runner. Interactive embedders
    /// measure zones from the live layout and call `set_zones` instead.
    #[serde(default)]
    pub zones: Vec<Zone>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    pub dwell_threshold_ms: u64,
    pub saccade_velocity_threshold: f32,
    pub revisit_limit: u32,
    pub saccade_min_count: usize,
    pub warmup_ms: u64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            dwell_threshold_ms: 5000,
            saccade_velocity_threshold: 3.0, // px/ms
            revisit_limit: 3,
            saccade_min_count: 3,
            warmup_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub mode: SourceMode,
    pub trace_path: Option<String>,
    pub sample_interval_ms: u64,
    pub smoothing_factor: f32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            mode: SourceMode::Synthetic,
            trace_path: None,
            sample_interval_ms: 16, // ~60 Hz
            smoothing_factor: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceMode {
    Replay,
    Synthetic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistConfig {
    pub enabled: bool,
    pub server_url: String,
    pub timeout_secs: u64,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            server_url: "http://localhost:3000".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// One position sample from the gaze source, screen-pixel space.
///
/// `time_ms` is a monotonic millisecond clock owned by the source;
/// the detector only ever compares timestamps, never reads wall time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GazeSample {
    pub x: f32,
    pub y: f32,
    pub time_ms: u64,
}

impl GazeSample {
    /// Sources publish `(0, 0)` before they have a fix. A sample is
    /// usable only when both coordinates are finite and non-zero.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.x != 0.0 && self.y != 0.0
    }
}

/// A named axis-aligned screen region monitored for attention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Zone {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        geometry::point_in_rect(x, y, self.left, self.top, self.right, self.bottom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfusionReason {
    None,
    HighDwell,
    FrequentReread,
    RapidScan,
}

impl ConfusionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfusionReason::None => "NONE",
            ConfusionReason::HighDwell => "HIGH_DWELL",
            ConfusionReason::FrequentReread => "FREQUENT_REREAD",
            ConfusionReason::RapidScan => "RAPID_SCAN",
        }
    }
}

/// Latest confusion determination. Sticky: once a rule fires the
/// verdict persists until another rule overwrites it (callers that
/// want decay or latching layer their own policy on top).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusionVerdict {
    pub is_confused: bool,
    pub reason: ConfusionReason,
    pub zone_id: Option<String>,
}

impl ConfusionVerdict {
    pub fn none() -> Self {
        Self {
            is_confused: false,
            reason: ConfusionReason::None,
            zone_id: None,
        }
    }
}

/// Per-zone attention statistics, created lazily on first entry and
/// kept for the lifetime of the detector.
#[derive(Debug, Clone, Copy)]
pub struct ZoneStats {
    pub dwell_ms: u64,
    pub revisits: u32,
    pub last_update_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_validity() {
        assert!(GazeSample { x: 12.0, y: 7.5, time_ms: 0 }.is_valid());
        assert!(!GazeSample { x: 0.0, y: 7.5, time_ms: 0 }.is_valid());
        assert!(!GazeSample { x: 12.0, y: 0.0, time_ms: 0 }.is_valid());
        assert!(!GazeSample { x: f32::NAN, y: 7.5, time_ms: 0 }.is_valid());
    }

    #[test]
    fn test_zone_contains() {
        let z = Zone {
            id: "cart".to_string(),
            left: 100.0,
            top: 50.0,
            right: 300.0,
            bottom: 150.0,
        };
        assert!(z.contains(200.0, 100.0));
        assert!(z.contains(100.0, 50.0));
        assert!(!z.contains(99.0, 100.0));
    }
}
