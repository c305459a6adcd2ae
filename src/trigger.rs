// src/trigger.rs
//
// Caller-side policy on top of the raw verdict stream: latch the
// first confused verdict for stable UI presentation, and debounce
// assist requests so an identical {zone, reason} pair never fires
// the completion service twice.

use crate::types::{ConfusionReason, ConfusionVerdict};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct AssistTrigger {
    pub zone_id: String,
    pub reason: ConfusionReason,
}

#[derive(Debug, Default)]
pub struct AssistTriggerPolicy {
    latched: Option<ConfusionVerdict>,
    last_key: Option<String>,
}

impl AssistTriggerPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate the latest raw verdict. Returns a trigger the first
    /// time a new {zone, reason} pair shows up; repeats are silent.
    pub fn observe(&mut self, raw: &ConfusionVerdict) -> Option<AssistTrigger> {
        if self.latched.is_none() && raw.is_confused {
            self.latched = Some(raw.clone());
        }

        let effective = self.latched.as_ref()?;
        let zone_id = effective.zone_id.clone()?;

        let key = format!("{}-{}", zone_id, effective.reason.as_str());
        if self.last_key.as_deref() == Some(key.as_str()) {
            return None;
        }
        debug!("Assist trigger armed: {}", key);
        self.last_key = Some(key);

        Some(AssistTrigger {
            zone_id,
            reason: effective.reason,
        })
    }

    /// The verdict the UI should present: the latched one while a
    /// friction episode is open, otherwise the live one.
    pub fn effective<'a>(&'a self, raw: &'a ConfusionVerdict) -> &'a ConfusionVerdict {
        self.latched.as_ref().unwrap_or(raw)
    }

    /// Close the current friction episode (e.g. the shopper dismissed
    /// the prompt). The debounce key survives, so the same pair will
    /// not re-trigger; a different zone or reason will.
    pub fn resolve(&mut self) {
        self.latched = None;
    }
}
