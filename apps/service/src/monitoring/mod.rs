pub mod notifier;
/// Monitoring engine module - supervises a single remote target
///
/// This module is responsible for:
/// - Executing the bounded-time liveness probe against the target
/// - Driving the two-phase check loop and its interval policy
/// - Alerting the operator channel when the target stops responding
pub mod prober;
pub mod supervisor;
pub mod types;

pub use notifier::{Notify, TelegramNotifier};
pub use prober::{HttpProber, Probe};
pub use supervisor::{MonitorState, run_monitor_loop};
pub use types::{ProbeResult, ProbeStatus};
