// src/detector.rs
//
// Confusion inference over the raw gaze feed. One detector instance
// serves exactly one interactive session: all state (sample window,
// per-zone statistics, last verdict) is owned here and mutated only
// from `observe`, so a session resets by dropping the detector and
// constructing a fresh one.
//
// Signal flow per sample:
//   gaze source → window (append + trim)
//               → saccade count (warm-up gated)
//               → zone resolution → dwell/revisit update → rule check

use crate::gaze_window::GazeWindow;
use crate::types::{ConfusionReason, ConfusionVerdict, DetectionConfig, GazeSample, Zone, ZoneStats};
use crate::zones::ZoneRegistry;
use std::collections::HashMap;
use tracing::{debug, info};

pub struct ConfusionDetector {
    config: DetectionConfig,
    zones: ZoneRegistry,
    window: GazeWindow,
    stats: HashMap<String, ZoneStats>,
    verdict: ConfusionVerdict,
    /// Timestamp of the first valid sample, anchoring the warm-up
    /// period on the source's own clock.
    started_ms: Option<u64>,
}

impl ConfusionDetector {
    pub fn new(config: DetectionConfig) -> Self {
        Self {
            config,
            zones: ZoneRegistry::new(),
            window: GazeWindow::new(),
            stats: HashMap::new(),
            verdict: ConfusionVerdict::none(),
            started_ms: None,
        }
    }

    /// Swap in a fresh layout snapshot. Statistics for zones that
    /// disappear are kept; dwell only accrues while a zone is both
    /// registered and gazed at, so stale entries stay inert.
    pub fn set_zones(&mut self, zones: Vec<Zone>) {
        self.zones.replace(zones);
    }

    /// Latest verdict. Pull-based: embedders poll this on their own
    /// render cycle.
    pub fn current_verdict(&self) -> &ConfusionVerdict {
        &self.verdict
    }

    pub fn zone_stats(&self, zone_id: &str) -> Option<&ZoneStats> {
        self.stats.get(zone_id)
    }

    /// Feed one position sample. Never fails: degenerate input is
    /// dropped, rule non-match leaves the prior verdict standing.
    pub fn observe(&mut self, sample: GazeSample) {
        // A source without a fix publishes zero/NaN coordinates;
        // those must not touch the window or any statistics.
        if !sample.is_valid() {
            return;
        }

        let now = sample.time_ms;
        let started = *self.started_ms.get_or_insert(now);

        self.window.push(sample);

        // Saccade-based scanning is meaningless while the window is
        // still filling with sparse early data, so the count is
        // suppressed for the warm-up period.
        let recent_saccades = if now.saturating_sub(started) < self.config.warmup_ms {
            0
        } else {
            self.window
                .saccade_count(self.config.saccade_velocity_threshold)
        };

        let Some(active) = self.zones.find_active(sample.x, sample.y) else {
            // Gaze is outside every zone: resynchronize all trackers
            // so the out-of-zone gap never accrues as dwell on
            // re-entry. Verdict stays as it was.
            for stats in self.stats.values_mut() {
                stats.last_update_ms = now;
            }
            return;
        };

        let zone_id = active.id.clone();
        let re_entered = match self.window.previous() {
            Some(prev) => !active.contains(prev.x, prev.y),
            None => false,
        };

        let stats = self.stats.entry(zone_id.clone()).or_insert_with(|| {
            debug!("First gaze entry into zone '{}'", zone_id);
            ZoneStats {
                dwell_ms: 0,
                revisits: 0,
                last_update_ms: now,
            }
        });

        stats.dwell_ms += now.saturating_sub(stats.last_update_ms);
        stats.last_update_ms = now;

        if re_entered {
            stats.revisits += 1;
        }

        // Fixed priority: dwell > revisit > scan, first match wins.
        // No match leaves the previous verdict untouched (sticky
        // until superseded).
        let fired = if stats.dwell_ms > self.config.dwell_threshold_ms {
            Some(ConfusionReason::HighDwell)
        } else if stats.revisits > self.config.revisit_limit {
            Some(ConfusionReason::FrequentReread)
        } else if recent_saccades >= self.config.saccade_min_count {
            Some(ConfusionReason::RapidScan)
        } else {
            None
        };

        if let Some(reason) = fired {
            let next = ConfusionVerdict {
                is_confused: true,
                reason,
                zone_id: Some(zone_id),
            };
            if next != self.verdict {
                info!(
                    "Confusion detected: zone='{}' reason={} (dwell={}ms, revisits={}, saccades={})",
                    next.zone_id.as_deref().unwrap_or("?"),
                    reason.as_str(),
                    stats.dwell_ms,
                    stats.revisits,
                    recent_saccades,
                );
            }
            self.verdict = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector_with_zone(id: &str, left: f32, top: f32, right: f32, bottom: f32) -> ConfusionDetector {
        let mut detector = ConfusionDetector::new(DetectionConfig::default());
        detector.set_zones(vec![Zone {
            id: id.to_string(),
            left,
            top,
            right,
            bottom,
        }]);
        detector
    }

    fn sample(x: f32, y: f32, time_ms: u64) -> GazeSample {
        GazeSample { x, y, time_ms }
    }

    /// Holds gaze at a fixed point from `from_ms` to `to_ms`
    /// (inclusive) at a given step.
    fn hold(detector: &mut ConfusionDetector, x: f32, y: f32, from_ms: u64, to_ms: u64, step: u64) {
        let mut t = from_ms;
        while t <= to_ms {
            detector.observe(sample(x, y, t));
            t += step;
        }
    }

    #[test]
    fn test_high_dwell_fires_after_threshold() {
        let mut detector = detector_with_zone("payment", 100.0, 100.0, 500.0, 400.0);

        hold(&mut detector, 300.0, 200.0, 1000, 6000, 100);
        // 5000 ms accrued, not strictly over the threshold yet.
        assert!(!detector.current_verdict().is_confused);

        detector.observe(sample(300.0, 200.0, 6100));
        let verdict = detector.current_verdict();
        assert!(verdict.is_confused);
        assert_eq!(verdict.reason, ConfusionReason::HighDwell);
        assert_eq!(verdict.zone_id.as_deref(), Some("payment"));
    }

    #[test]
    fn test_dwell_does_not_accrue_while_outside() {
        let mut detector = detector_with_zone("payment", 100.0, 100.0, 500.0, 400.0);

        // 2000 ms inside, then a long excursion outside every zone.
        hold(&mut detector, 300.0, 200.0, 0, 2000, 100);
        hold(&mut detector, 900.0, 900.0, 2100, 9000, 100);
        assert!(!detector.current_verdict().is_confused);

        // Re-enter: the 7s gap must not have counted. Dwell resumes
        // at ~2000 ms, so another full 3 s inside is still not enough.
        hold(&mut detector, 300.0, 200.0, 9100, 12000, 100);
        assert!(!detector.current_verdict().is_confused);

        // Crossing the 5000 ms of genuinely in-zone time fires.
        hold(&mut detector, 300.0, 200.0, 12100, 13000, 100);
        let verdict = detector.current_verdict();
        assert!(verdict.is_confused);
        assert_eq!(verdict.reason, ConfusionReason::HighDwell);
    }

    #[test]
    fn test_revisit_counting_and_reread_trigger() {
        let mut detector = detector_with_zone("terms", 100.0, 100.0, 400.0, 300.0);

        // Five entries, four re-entries. Slow moves (1.5 px/ms max)
        // so the scan rule stays quiet, short dwell so the dwell rule
        // stays quiet.
        let inside = (200.0, 200.0);
        let outside = (500.0, 200.0);
        let mut t = 0;
        for entry in 0..5 {
            detector.observe(sample(inside.0, inside.1, t));
            t += 300;
            if entry < 4 {
                detector.observe(sample(outside.0, outside.1, t));
                t += 300;
            }
        }

        let stats = detector.zone_stats("terms").unwrap();
        assert_eq!(stats.revisits, 4);

        // revisits 4 > limit 3: the fourth re-entry fired the rule.
        let verdict = detector.current_verdict();
        assert!(verdict.is_confused);
        assert_eq!(verdict.reason, ConfusionReason::FrequentReread);
        assert_eq!(verdict.zone_id.as_deref(), Some("terms"));
    }

    #[test]
    fn test_rapid_scan_after_warmup() {
        let mut detector = detector_with_zone("summary", 0.0, 0.0, 2000.0, 1000.0);

        // Clear the warm-up with calm samples first.
        hold(&mut detector, 500.0, 500.0, 0, 2100, 300);
        assert!(!detector.current_verdict().is_confused);

        // Three consecutive jumps of 400 px per 50 ms = 8 px/ms.
        detector.observe(sample(900.0, 500.0, 2150));
        detector.observe(sample(500.0, 500.0, 2200));
        detector.observe(sample(900.0, 500.0, 2250));

        let verdict = detector.current_verdict();
        assert!(verdict.is_confused);
        assert_eq!(verdict.reason, ConfusionReason::RapidScan);
        assert_eq!(verdict.zone_id.as_deref(), Some("summary"));
    }

    #[test]
    fn test_warmup_suppresses_saccade_rule() {
        let mut detector = detector_with_zone("summary", 0.0, 0.0, 2000.0, 1000.0);

        // Same violent jumps, but all inside the 2000 ms warm-up.
        let mut x = 500.0;
        for i in 0..10u64 {
            detector.observe(sample(x, 500.0, 100 + i * 50));
            x = if x > 600.0 { 500.0 } else { 900.0 };
        }
        assert!(!detector.current_verdict().is_confused);
    }

    #[test]
    fn test_dwell_outranks_revisit_and_scan() {
        let mut detector = detector_with_zone("payment", 100.0, 100.0, 500.0, 400.0);

        // Build up revisits past the limit with short in/out hops,
        // keeping each dwell slice small...
        let mut t = 0;
        for _ in 0..6 {
            detector.observe(sample(200.0, 200.0, t));
            t += 200;
            detector.observe(sample(600.0, 200.0, t));
            t += 200;
        }
        assert_eq!(
            detector.current_verdict().reason,
            ConfusionReason::FrequentReread
        );

        // ...then park inside until dwell crosses its threshold. The
        // higher-priority rule takes over.
        hold(&mut detector, 200.0, 200.0, t, t + 6000, 100);
        assert_eq!(detector.current_verdict().reason, ConfusionReason::HighDwell);
    }

    #[test]
    fn test_invalid_sample_is_a_no_op() {
        let mut detector = detector_with_zone("payment", 0.0, 0.0, 500.0, 400.0);
        hold(&mut detector, 200.0, 200.0, 0, 1000, 100);

        let dwell_before = detector.zone_stats("payment").unwrap().dwell_ms;
        let verdict_before = detector.current_verdict().clone();

        detector.observe(sample(0.0, 0.0, 5000));
        detector.observe(sample(f32::NAN, 200.0, 5100));

        assert_eq!(detector.zone_stats("payment").unwrap().dwell_ms, dwell_before);
        assert_eq!(*detector.current_verdict(), verdict_before);
        // The window did not take them either: the next valid sample
        // still sees the last in-zone point as its predecessor.
        detector.observe(sample(200.0, 200.0, 5200));
        assert_eq!(detector.zone_stats("payment").unwrap().revisits, 0);
    }

    #[test]
    fn test_out_of_zone_sample_leaves_verdict_alone() {
        let mut detector = detector_with_zone("payment", 100.0, 100.0, 500.0, 400.0);

        hold(&mut detector, 300.0, 200.0, 0, 6000, 100);
        assert!(detector.current_verdict().is_confused);

        // Sticky verdict: leaving every zone changes nothing.
        detector.observe(sample(900.0, 900.0, 6100));
        let verdict = detector.current_verdict();
        assert!(verdict.is_confused);
        assert_eq!(verdict.zone_id.as_deref(), Some("payment"));
    }

    #[test]
    fn test_empty_registry_is_harmless() {
        let mut detector = ConfusionDetector::new(DetectionConfig::default());
        hold(&mut detector, 300.0, 200.0, 0, 6000, 100);
        assert!(!detector.current_verdict().is_confused);
    }

    #[test]
    fn test_removed_zone_keeps_stale_stats_but_stops_accruing() {
        let mut detector = detector_with_zone("cart", 100.0, 100.0, 500.0, 400.0);
        hold(&mut detector, 300.0, 200.0, 0, 2000, 100);
        let dwell = detector.zone_stats("cart").unwrap().dwell_ms;
        assert_eq!(dwell, 2000);

        // Layout change drops the zone; the same gaze point no longer
        // feeds its statistics.
        detector.set_zones(vec![]);
        hold(&mut detector, 300.0, 200.0, 2100, 8000, 100);
        assert_eq!(detector.zone_stats("cart").unwrap().dwell_ms, dwell);
        assert!(!detector.current_verdict().is_confused);
    }
}
