use std::time::Instant;

use anyhow::{Result, anyhow};
use tracing::{error, info};

use super::types::ProbeResult;
use crate::config::Settings;

/// Prober trait so the monitor loop can be driven with a fake in tests
#[async_trait::async_trait]
pub trait Probe: Send + Sync {
    /// Perform one bounded-time liveness check against the target
    async fn probe(&self) -> ProbeResult;
}

/// HTTP liveness prober
///
/// Issues a single GET to `{remote_url}/health` with the shared token
/// attached. The client is built once with a timeout and reused across
/// cycles; retries are the loop's concern, not the prober's.
pub struct HttpProber {
    client: reqwest::Client,
    health_url: String,
    target: String,
    token: String,
}

impl HttpProber {
    pub fn new(client: reqwest::Client, settings: &Settings) -> Self {
        Self {
            client,
            health_url: format!("{}/health", settings.remote_url),
            target: settings.remote_url.clone(),
            token: settings.ssl_token.clone(),
        }
    }

    async fn request(&self) -> Result<(u64, u16)> {
        let start = Instant::now();

        let response = self
            .client
            .get(&self.health_url)
            .header("X-Token", &self.token)
            .send()
            .await
            .map_err(|e| anyhow!("request failed: {e}"))?;

        let latency = start.elapsed().as_millis() as u64;
        let status = response.status();

        if status.is_success() {
            Ok((latency, status.as_u16()))
        } else {
            Err(anyhow!("health check returned status code: {status}"))
        }
    }
}

#[async_trait::async_trait]
impl Probe for HttpProber {
    async fn probe(&self) -> ProbeResult {
        match self.request().await {
            Ok((latency_ms, status_code)) => {
                info!(url = %self.target, latency_ms, "health check successful");
                ProbeResult::up(&self.target, latency_ms, status_code)
            }
            Err(e) => {
                error!(url = %self.target, error = %e, "health check failed");
                ProbeResult::down(&self.target, e.to_string())
            }
        }
    }
}
