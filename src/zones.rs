// src/zones.rs
//
// Snapshot of the monitored screen regions. Layouts are recomputed
// wholesale on resize/scroll, so the registry only supports a full
// swap, never incremental edits.

use crate::types::Zone;
use tracing::debug;

#[derive(Debug, Default)]
pub struct ZoneRegistry {
    zones: Vec<Zone>,
}

impl ZoneRegistry {
    pub fn new() -> Self {
        Self { zones: Vec::new() }
    }

    /// Replace the entire zone set with a fresh layout snapshot.
    pub fn replace(&mut self, zones: Vec<Zone>) {
        debug!("Zone registry replaced: {} zones", zones.len());
        self.zones = zones;
    }

    /// First zone (in registry order) containing the point, if any.
    /// Overlaps resolve by order, so callers control priority by
    /// how they order the snapshot.
    pub fn find_active(&self, x: f32, y: f32) -> Option<&Zone> {
        self.zones.iter().find(|z| z.contains(x, y))
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
