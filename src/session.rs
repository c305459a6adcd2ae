// src/session.rs
//
// Session-level event log. Confused verdicts are recorded as
// timestamped friction events; at session end the whole thing folds
// into the summary the persistence collaborator stores.

use crate::types::{ConfusionReason, ConfusionVerdict};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusionEvent {
    pub zone_id: String,
    pub reason: ConfusionReason,
    /// Milliseconds since session start.
    pub offset_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub duration_ms: u64,
    pub converted: bool,
    pub confusion_events: Vec<ConfusionEvent>,
    pub gaze_points: u64,
    pub help_shown: bool,
}

pub struct SessionLog {
    session_id: String,
    started_ms: Option<u64>,
    events: Vec<ConfusionEvent>,
    gaze_points: u64,
    help_shown: bool,
    last_logged: Option<(String, ConfusionReason)>,
}

impl SessionLog {
    pub fn new() -> Self {
        let session_id = format!("session_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"));
        Self {
            session_id,
            started_ms: None,
            events: Vec::new(),
            gaze_points: 0,
            help_shown: false,
            last_logged: None,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Count a processed sample; the first one anchors the session
    /// clock on the source's timebase.
    pub fn note_sample(&mut self, time_ms: u64) {
        self.started_ms.get_or_insert(time_ms);
        self.gaze_points += 1;
    }

    pub fn note_help_shown(&mut self) {
        self.help_shown = true;
    }

    /// Append a friction event on each verdict transition. Repeated
    /// observations of the same {zone, reason} collapse into one
    /// entry, matching the transition-driven log the UI keeps.
    pub fn record_verdict(&mut self, verdict: &ConfusionVerdict, time_ms: u64) {
        if !verdict.is_confused {
            return;
        }
        let Some(zone_id) = verdict.zone_id.clone() else {
            return;
        };
        let key = (zone_id.clone(), verdict.reason);
        if self.last_logged.as_ref() == Some(&key) {
            return;
        }
        self.last_logged = Some(key);

        let offset_ms = time_ms.saturating_sub(self.started_ms.unwrap_or(time_ms));
        self.events.push(ConfusionEvent {
            zone_id,
            reason: verdict.reason,
            offset_ms,
        });
    }

    pub fn events(&self) -> &[ConfusionEvent] {
        &self.events
    }

    pub fn summary(&self, ended_ms: u64, converted: bool) -> SessionSummary {
        SessionSummary {
            session_id: self.session_id.clone(),
            duration_ms: ended_ms.saturating_sub(self.started_ms.unwrap_or(ended_ms)),
            converted,
            confusion_events: self.events.clone(),
            gaze_points: self.gaze_points,
            help_shown: self.help_shown,
        }
    }
}

impl Default for SessionLog {
    fn default() -> Self {
        Self::new()
    }
}
