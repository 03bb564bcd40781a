//! The monitor loop: a two-phase state machine around a single target.
//!
//! While the target answers, it is polled every `check_interval`. Once a
//! failure is seen the loop alerts the operator channel, drops to the
//! longer `retry_interval`, and keeps probing until the target answers
//! again. There is no retry cap; the loop only exits on shutdown.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{info, warn};

use super::notifier::Notify;
use super::prober::Probe;
use crate::config::{NotifyPolicy, Settings};

/// Which interval the loop is currently polling at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Target healthy, polling at the normal interval
    Normal,
    /// A failure has been seen, polling at the retry interval
    Retrying,
}

/// What the loop does after recording one probe outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleAction {
    /// Whether this cycle sends an alert to the operator channel
    pub send_alert: bool,
    /// How long to sleep before the next probe
    pub sleep: Duration,
}

/// The loop's only mutable state.
///
/// Pure transition table: `record` takes a probe outcome and returns the
/// interval to sleep plus the alert decision under the configured policy.
#[derive(Debug)]
pub struct MonitorState {
    phase: Phase,
    policy: NotifyPolicy,
    check_interval: Duration,
    retry_interval: Duration,
}

impl MonitorState {
    pub fn new(settings: &Settings) -> Self {
        Self::with_policy(settings.notify_policy, settings.check_interval, settings.retry_interval)
    }

    pub fn with_policy(
        policy: NotifyPolicy,
        check_interval: Duration,
        retry_interval: Duration,
    ) -> Self {
        Self { phase: Phase::Normal, policy, check_interval, retry_interval }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Record a probe outcome and return the resulting action
    pub fn record(&mut self, up: bool) -> CycleAction {
        if up {
            self.phase = Phase::Normal;
            return CycleAction { send_alert: false, sleep: self.check_interval };
        }

        let send_alert = match self.policy {
            NotifyPolicy::Every => true,
            NotifyPolicy::Transition => self.phase == Phase::Normal,
        };
        self.phase = Phase::Retrying;

        CycleAction { send_alert, sleep: self.retry_interval }
    }
}

/// Drive the monitor loop until the shutdown signal flips.
///
/// Each cycle is strictly sequential: probe, alert if the policy says so,
/// then sleep one interval. The shutdown signal interrupts an in-progress
/// sleep rather than waiting it out.
pub async fn run_monitor_loop(
    settings: Settings,
    prober: impl Probe,
    notifier: impl Notify,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut state = MonitorState::new(&settings);
    info!(url = %settings.remote_url, "starting health check loop");

    loop {
        let result = prober.probe().await;
        let was_retrying = state.phase() == Phase::Retrying;
        let action = state.record(result.is_up());

        if result.is_up() {
            if was_retrying {
                info!(url = %result.target, "target recovered");
            }
            info!("waiting {:.1} seconds before next check", action.sleep.as_secs_f64());
        } else {
            if action.send_alert {
                let cause = result.error_message.as_deref().unwrap_or("unknown error");
                let message = format!("{} is not responding.\nError: {}", result.target, cause);
                notifier.notify(&message).await;
            }
            warn!("waiting {} seconds before next check", action.sleep.as_secs());
        }

        tokio::select! {
            () = tokio::time::sleep(action.sleep) => {}
            _ = shutdown.changed() => {
                info!("health check loop shutting down");
                break;
            }
        }
    }
}
