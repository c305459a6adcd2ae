// src/source.rs
//
// Polymorphic gaze feed. Production embedders run a webcam-derived
// estimator or a pointer fallback; both reduce to the same
// capability — continuously produce timestamped screen-pixel samples.
// This crate ships a recorded-trace replay and a synthetic scripted
// source behind that capability, pumped into the engine through an
// mpsc channel by a task with a single idempotent stop.

use crate::types::GazeSample;
use anyhow::{Context, Result};
use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

pub trait GazeSource: Send {
    /// Next sample, or `None` once the feed is exhausted. Timestamps
    /// are monotone on the source's own clock.
    fn next_sample(&mut self) -> Option<GazeSample>;

    fn name(&self) -> &'static str;
}

// ----------------------------------------------------------------------------
// Recorded-trace replay
// ----------------------------------------------------------------------------

/// Replays a previously captured gaze trace, one JSON sample per line.
pub struct ReplaySource {
    samples: std::vec::IntoIter<GazeSample>,
}

impl ReplaySource {
    pub fn from_file(path: &str) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("Failed to read trace {}", path))?;
        let source = Self::parse(&contents)?;
        info!("Loaded gaze trace: {} ({} samples)", path, source.samples.len());
        Ok(source)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let mut samples = Vec::new();
        for (idx, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let sample: GazeSample = serde_json::from_str(line)
                .with_context(|| format!("Bad trace sample on line {}", idx + 1))?;
            samples.push(sample);
        }
        Ok(Self {
            samples: samples.into_iter(),
        })
    }
}

impl GazeSource for ReplaySource {
    fn next_sample(&mut self) -> Option<GazeSample> {
        self.samples.next()
    }

    fn name(&self) -> &'static str {
        "replay"
    }
}

// ----------------------------------------------------------------------------
// Synthetic scripted source
// ----------------------------------------------------------------------------

/// One leg of a scripted gaze path: drift toward `(x, y)` and sit
/// there until `hold_ms` of script time has passed.
#[derive(Debug, Clone, Copy)]
pub struct Waypoint {
    pub x: f32,
    pub y: f32,
    pub hold_ms: u64,
}

/// Generates a plausible gaze feed from a waypoint script. Position
/// lerps toward the current target each tick, mimicking the smoothing
/// a tracker applies before publishing samples.
pub struct SyntheticSource {
    script: std::vec::IntoIter<Waypoint>,
    current: Option<Waypoint>,
    hold_remaining_ms: u64,
    x: f32,
    y: f32,
    clock_ms: u64,
    interval_ms: u64,
    smoothing_factor: f32,
}

impl SyntheticSource {
    pub fn new(script: Vec<Waypoint>, interval_ms: u64, smoothing_factor: f32) -> Self {
        let mut script = script.into_iter();
        let current = script.next();
        let (x, y) = current.map(|w| (w.x, w.y)).unwrap_or((0.0, 0.0));
        let hold_remaining_ms = current.map(|w| w.hold_ms).unwrap_or(0);
        Self {
            script,
            current,
            hold_remaining_ms,
            x,
            y,
            clock_ms: 0,
            interval_ms: interval_ms.max(1),
            smoothing_factor: smoothing_factor.clamp(0.01, 1.0),
        }
    }
}

impl GazeSource for SyntheticSource {
    fn next_sample(&mut self) -> Option<GazeSample> {
        let target = self.current?;

        self.x += (target.x - self.x) * self.smoothing_factor;
        self.y += (target.y - self.y) * self.smoothing_factor;
        self.clock_ms += self.interval_ms;

        if self.hold_remaining_ms <= self.interval_ms {
            self.current = self.script.next();
            self.hold_remaining_ms = self.current.map(|w| w.hold_ms).unwrap_or(0);
        } else {
            self.hold_remaining_ms -= self.interval_ms;
        }

        Some(GazeSample {
            x: self.x,
            y: self.y,
            time_ms: self.clock_ms,
        })
    }

    fn name(&self) -> &'static str {
        "synthetic"
    }
}

// ----------------------------------------------------------------------------
// Pump task
// ----------------------------------------------------------------------------

pub struct SourceHandle {
    stop: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl SourceHandle {
    /// Halt sample delivery. Idempotent; safe to call from teardown
    /// paths that may run more than once.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub async fn join(self) {
        let _ = self.task.await;
    }
}

/// Drive a source at its natural cadence into `tx`. The task ends
/// when the source is exhausted, the receiver is dropped, or the
/// handle is stopped — whatever comes first.
pub fn spawn_source(
    mut source: Box<dyn GazeSource>,
    interval_ms: u64,
    tx: mpsc::Sender<GazeSample>,
) -> SourceHandle {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = stop.clone();
    let name = source.name();

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(std::time::Duration::from_millis(interval_ms.max(1)));
        loop {
            ticker.tick().await;
            if stop_flag.load(Ordering::Relaxed) {
                debug!("Gaze source '{}' stopped", name);
                break;
            }
            let Some(sample) = source.next_sample() else {
                debug!("Gaze source '{}' exhausted", name);
                break;
            };
            if tx.send(sample).await.is_err() {
                break;
            }
        }
    });

    SourceHandle { stop, task }
}
