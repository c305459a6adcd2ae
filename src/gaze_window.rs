// src/gaze_window.rs
//
// Bounded sliding window over the most recent gaze samples, used for
// local velocity (saccade) estimation and re-entry detection.

use crate::geometry;
use crate::types::GazeSample;
use std::collections::VecDeque;

/// Fixed window length. Ten samples at a ~60 Hz feed spans roughly
/// 160 ms, enough to catch a burst of saccades without smearing
/// across distinct fixations.
pub const GAZE_HISTORY_LEN: usize = 10;

pub struct GazeWindow {
    samples: VecDeque<GazeSample>,
}

impl GazeWindow {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(GAZE_HISTORY_LEN),
        }
    }

    /// Append the newest sample, evicting the oldest once the window
    /// is full. FIFO, no reordering; callers must validate samples
    /// before they get here.
    pub fn push(&mut self, sample: GazeSample) {
        self.samples.push_back(sample);
        if self.samples.len() > GAZE_HISTORY_LEN {
            self.samples.pop_front();
        }
    }

    /// Current contents, oldest first.
    pub fn samples(&self) -> impl Iterator<Item = &GazeSample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The sample before the newest one, i.e. where gaze was on the
    /// previous tick. Used to detect zone re-entry.
    pub fn previous(&self) -> Option<&GazeSample> {
        if self.samples.len() < 2 {
            return None;
        }
        self.samples.get(self.samples.len() - 2)
    }

    /// Number of consecutive sample pairs whose inter-sample velocity
    /// exceeds `threshold_px_per_ms`. A pair with zero or negative
    /// elapsed time contributes nothing.
    pub fn saccade_count(&self, threshold_px_per_ms: f32) -> usize {
        let mut count = 0;
        let mut iter = self.samples.iter();
        let Some(mut prev) = iter.next() else {
            return 0;
        };
        for sample in iter {
            let dist = geometry::distance(prev.x, prev.y, sample.x, sample.y);
            let duration = sample.time_ms.saturating_sub(prev.time_ms);
            if duration > 0 && dist / duration as f32 > threshold_px_per_ms {
                count += 1;
            }
            prev = sample;
        }
        count
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for GazeWindow {
    fn default() -> Self {
        Self::new()
    }
}
