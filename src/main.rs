// src/main.rs
//
// Session runner: wires a gaze source into the confusion detector,
// drives the assist-trigger policy, and emits the session summary the
// persistence collaborator would store. Interactive embedders do the
// same wiring against a live tracker; this binary does it against a
// recorded trace or a synthetic script so a whole session can be
// exercised end to end.

use anyhow::Result;
use confusion_detection::assist_client::AssistClient;
use confusion_detection::metrics::SessionMetrics;
use confusion_detection::source::{spawn_source, GazeSource, ReplaySource, SyntheticSource, Waypoint};
use confusion_detection::types::{Config, SourceMode};
use confusion_detection::{AssistTriggerPolicy, ConfusionDetector, SessionLog};
use std::fs;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("confusion_detection=info,reqwest=warn")
        .init();

    info!("Checkout attention analysis starting");

    let config = Config::load("config.yaml")?;
    info!("Configuration loaded");
    info!(
        "Detection thresholds: dwell={}ms, saccade={:.1}px/ms, revisits={}, warmup={}ms",
        config.detection.dwell_threshold_ms,
        config.detection.saccade_velocity_threshold,
        config.detection.revisit_limit,
        config.detection.warmup_ms,
    );

    let mut detector = ConfusionDetector::new(config.detection.clone());
    detector.set_zones(config.zones.clone());
    info!("Monitoring {} zones", config.zones.len());

    let mut session = SessionLog::new();
    let mut policy = AssistTriggerPolicy::new();
    let metrics = SessionMetrics::new();

    let assist_client = if config.assist.enabled {
        Some(AssistClient::new(
            &config.assist.server_url,
            session.session_id(),
            config.assist.timeout_secs,
        ))
    } else {
        None
    };

    let source: Box<dyn GazeSource> = match config.source.mode {
        SourceMode::Replay => {
            let path = config
                .source
                .trace_path
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("source.mode=replay requires source.trace_path"))?;
            Box::new(ReplaySource::from_file(path)?)
        }
        SourceMode::Synthetic => Box::new(SyntheticSource::new(
            demo_script(),
            config.source.sample_interval_ms,
            config.source.smoothing_factor,
        )),
    };
    info!("Gaze source: {}", source.name());

    let (tx, mut rx) = mpsc::channel(64);
    let handle = spawn_source(source, config.source.sample_interval_ms, tx);

    let mut last_time_ms = 0;
    while let Some(sample) = rx.recv().await {
        metrics.inc(&metrics.samples_seen);
        if !sample.is_valid() {
            metrics.inc(&metrics.samples_rejected);
            continue;
        }
        last_time_ms = sample.time_ms;
        session.note_sample(sample.time_ms);

        let before = detector.current_verdict().clone();
        detector.observe(sample);
        let verdict = detector.current_verdict().clone();
        if verdict != before {
            metrics.inc(&metrics.verdict_changes);
        }
        session.record_verdict(&verdict, sample.time_ms);

        if let Some(trigger) = policy.observe(&verdict) {
            metrics.inc(&metrics.assist_triggers);
            session.note_help_shown();
            if let Some(client) = &assist_client {
                match client.request_help(&trigger, session.events()).await {
                    Ok(resp) => {
                        metrics.inc(&metrics.assist_successes);
                        info!("Assistant: {}", resp.message);
                    }
                    Err(e) => {
                        metrics.inc(&metrics.assist_failures);
                        warn!("Assist request failed: {}", e);
                    }
                }
            } else {
                info!(
                    "Assist trigger (client disabled): zone={} reason={}",
                    trigger.zone_id,
                    trigger.reason.as_str()
                );
            }
        }
    }

    handle.stop();
    handle.join().await;

    let summary = session.summary(last_time_ms, false);
    info!(
        "Session {} complete: {} gaze points, {} friction events, help_shown={}",
        summary.session_id,
        summary.gaze_points,
        summary.confusion_events.len(),
        summary.help_shown,
    );
    info!("Metrics: {:?}", metrics.summary());

    let out_path = format!("{}.json", summary.session_id);
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => {
            fs::write(&out_path, json)?;
            info!("Session summary written to {}", out_path);
        }
        Err(e) => error!("Failed to serialize session summary: {}", e),
    }

    Ok(())
}

/// Scripted checkout skim: browse the summary, hover the payment
/// form long enough to trip the dwell rule, bounce between the terms
/// and the total a few times.
fn demo_script() -> Vec<Waypoint> {
    vec![
        Waypoint { x: 640.0, y: 200.0, hold_ms: 1500 },
        Waypoint { x: 400.0, y: 600.0, hold_ms: 6000 },
        Waypoint { x: 900.0, y: 300.0, hold_ms: 400 },
        Waypoint { x: 400.0, y: 600.0, hold_ms: 400 },
        Waypoint { x: 900.0, y: 300.0, hold_ms: 400 },
        Waypoint { x: 400.0, y: 600.0, hold_ms: 800 },
    ]
}
