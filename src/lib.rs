//! Real-time attention analysis for checkout flows.
//!
//! Consumes a noisy, high-frequency stream of 2D gaze (or
//! pointer-simulated) samples plus a snapshot of named screen regions,
//! and produces a debounced, explainable confusion signal: is the
//! shopper hesitating, re-reading, or rapidly scanning — and where.
//!
//! The engine surface is three calls on [`ConfusionDetector`]:
//! `observe` one sample, `set_zones` on layout change, and poll
//! `current_verdict`. Everything around it (gaze sources, assist
//! triggering, session logging) is plumbing for embedders.

pub mod assist_client;
pub mod config;
pub mod detector;
pub mod gaze_window;
pub mod geometry;
pub mod metrics;
pub mod session;
pub mod source;
pub mod trigger;
pub mod types;
pub mod zones;

pub use detector::ConfusionDetector;
pub use gaze_window::{GazeWindow, GAZE_HISTORY_LEN};
pub use session::{ConfusionEvent, SessionLog, SessionSummary};
pub use trigger::{AssistTrigger, AssistTriggerPolicy};
pub use types::{
    Config, ConfusionReason, ConfusionVerdict, DetectionConfig, GazeSample, Zone, ZoneStats,
};
pub use zones::ZoneRegistry;
