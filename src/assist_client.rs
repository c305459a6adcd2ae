// src/assist_client.rs
//
// Async HTTP client that turns an assist trigger into a request for
// the external completion service. The service owns prompt and text
// generation; this side only packages the detection context (zone,
// reason, recent friction history) so the reply can be specific.

use crate::session::ConfusionEvent;
use crate::trigger::AssistTrigger;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Serialize)]
pub struct AssistRequest {
    pub session_id: String,
    pub zone_id: String,
    pub reason: String,
    pub recent_events: Vec<ConfusionEvent>,
}

#[derive(Debug, Deserialize)]
pub struct AssistResponse {
    pub status: String,
    pub message: String,
}

pub struct AssistClient {
    server_url: String,
    http_client: reqwest::Client,
    session_id: String,
}

impl AssistClient {
    pub fn new(server_url: &str, session_id: &str, timeout_secs: u64) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            server_url: server_url.to_string(),
            http_client,
            session_id: session_id.to_string(),
        }
    }

    /// Send one proactive-help request. Failures degrade to an error
    /// string; the caller logs and moves on, the session never stops
    /// because the assistant was unreachable.
    pub async fn request_help(
        &self,
        trigger: &AssistTrigger,
        recent_events: &[ConfusionEvent],
    ) -> Result<AssistResponse, String> {
        let request = AssistRequest {
            session_id: self.session_id.clone(),
            zone_id: trigger.zone_id.clone(),
            reason: trigger.reason.as_str().to_string(),
            recent_events: recent_events.to_vec(),
        };

        let url = format!("{}/api/assist", self.server_url);
        info!(
            "Sending assist request: zone='{}' reason={}",
            trigger.zone_id,
            trigger.reason.as_str()
        );

        match self.http_client.post(&url).json(&request).send().await {
            Ok(resp) => {
                if resp.status().is_success() {
                    match resp.json::<AssistResponse>().await {
                        Ok(result) => {
                            info!("Assist response: {} — {}", result.status, result.message);
                            Ok(result)
                        }
                        Err(e) => {
                            warn!("Failed to parse assist response: {}", e);
                            Err(format!("Parse error: {}", e))
                        }
                    }
                } else {
                    let status = resp.status();
                    let body = resp.text().await.unwrap_or_default();
                    warn!("Assist server error {}: {}", status, body);
                    Err(format!("HTTP {}: {}", status, body))
                }
            }
            Err(e) => {
                warn!("Failed to reach assist server: {}", e);
                Err(format!("Connection error: {}", e))
            }
        }
    }
}
