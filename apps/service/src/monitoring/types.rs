use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a liveness probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Up,
    Down,
}

impl std::fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeStatus::Up => write!(f, "up"),
            ProbeStatus::Down => write!(f, "down"),
        }
    }
}

/// Result of a single liveness probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    /// Target the probe was issued against, as shown to operators
    pub target: String,

    /// Timestamp when the probe was attempted
    pub timestamp: DateTime<Utc>,

    /// Whether the target answered with a 2xx in time
    pub status: ProbeStatus,

    /// Response time in milliseconds (present iff the probe succeeded)
    pub latency_ms: Option<u64>,

    /// HTTP status code (if a response was received)
    pub status_code: Option<u16>,

    /// Diagnostic cause (present iff the probe failed)
    pub error_message: Option<String>,
}

impl ProbeResult {
    /// Record a successful probe with its latency
    pub fn up(target: impl Into<String>, latency_ms: u64, status_code: u16) -> Self {
        Self {
            target: target.into(),
            timestamp: Utc::now(),
            status: ProbeStatus::Up,
            latency_ms: Some(latency_ms),
            status_code: Some(status_code),
            error_message: None,
        }
    }

    /// Record a failed probe with its diagnostic cause
    pub fn down(target: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            timestamp: Utc::now(),
            status: ProbeStatus::Down,
            latency_ms: None,
            status_code: None,
            error_message: Some(cause.into()),
        }
    }

    pub fn is_up(&self) -> bool {
        self.status == ProbeStatus::Up
    }
}
