//! Startup configuration, read once from the environment.
//!
//! Required: `REMOTE_URL`, `SSL_TOKEN`, `TELEGRAM_TOKEN`, `TELEGRAM_CHAT_ID`.
//! Optional: `CHECK_INTERVAL` (seconds, fractional), `RETRY_INTERVAL`,
//! `PROBE_TIMEOUT`, `NOTIFY_POLICY` (`transition`/`every`), `BIND`, `PORT`.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// When failure alerts are sent to the operator channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifyPolicy {
    /// One alert when the target goes from healthy to unhealthy.
    #[default]
    Transition,
    /// One alert on every failed cycle.
    Every,
}

impl FromStr for NotifyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "transition" => Ok(Self::Transition),
            "every" => Ok(Self::Every),
            other => Err(format!("expected \"transition\" or \"every\", got \"{other}\"")),
        }
    }
}

/// Immutable settings for one monitor instance.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the watched target, without the `/health` suffix.
    pub remote_url: String,
    /// Sleep between probes while the target is healthy.
    pub check_interval: Duration,
    /// Sleep between probes once a failure has been detected.
    pub retry_interval: Duration,
    /// Upper bound on a single probe exchange.
    pub probe_timeout: Duration,
    /// Shared secret, sent on outbound probes and expected on the
    /// inbound liveness endpoint.
    pub ssl_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
    pub notify_policy: NotifyPolicy,
    /// Liveness server bind address and port.
    pub bind: String,
    pub port: u16,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            remote_url: parse_remote_url(&required(&get, "REMOTE_URL")?)?,
            check_interval: parse_check_interval(get("CHECK_INTERVAL"))?,
            retry_interval: parse_seconds("RETRY_INTERVAL", get("RETRY_INTERVAL"), 900)?,
            probe_timeout: parse_seconds("PROBE_TIMEOUT", get("PROBE_TIMEOUT"), 60)?,
            ssl_token: required(&get, "SSL_TOKEN")?,
            telegram_token: required(&get, "TELEGRAM_TOKEN")?,
            telegram_chat_id: required(&get, "TELEGRAM_CHAT_ID")?,
            notify_policy: parse_or_default("NOTIFY_POLICY", get("NOTIFY_POLICY"), NotifyPolicy::default())?,
            bind: get("BIND").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or_default("PORT", get("PORT"), 8080)?,
        })
    }
}

fn required(get: &impl Fn(&str) -> Option<String>, name: &'static str) -> Result<String, ConfigError> {
    get(name).filter(|value| !value.trim().is_empty()).ok_or(ConfigError::Missing(name))
}

fn parse_or_default<T>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match raw {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|err: T::Err| ConfigError::Invalid { name, reason: err.to_string() }),
        _ => Ok(default),
    }
}

/// Whole seconds, must be positive.
fn parse_seconds(
    name: &'static str,
    raw: Option<String>,
    default: u64,
) -> Result<Duration, ConfigError> {
    let seconds: u64 = parse_or_default(name, raw, default)?;
    if seconds == 0 {
        return Err(ConfigError::Invalid { name, reason: "must be at least 1 second".to_string() });
    }
    Ok(Duration::from_secs(seconds))
}

/// Fractional seconds are allowed for the healthy-poll interval.
fn parse_check_interval(raw: Option<String>) -> Result<Duration, ConfigError> {
    let seconds: f64 = parse_or_default("CHECK_INTERVAL", raw, 60.0)?;
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(ConfigError::Invalid {
            name: "CHECK_INTERVAL",
            reason: format!("must be a positive number of seconds, got {seconds}"),
        });
    }
    Ok(Duration::from_secs_f64(seconds))
}

fn parse_remote_url(raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|err| ConfigError::Invalid { name: "REMOTE_URL", reason: err.to_string() })?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ConfigError::Invalid {
                name: "REMOTE_URL",
                reason: format!("unsupported scheme: {other}"),
            });
        }
    }

    Ok(raw.trim().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("REMOTE_URL", "https://api.example.com"),
            ("SSL_TOKEN", "sekrit"),
            ("TELEGRAM_TOKEN", "123:abc"),
            ("TELEGRAM_CHAT_ID", "42"),
        ])
    }

    fn settings_from(vars: HashMap<&'static str, &'static str>) -> Result<Settings, ConfigError> {
        Settings::from_lookup(|name| vars.get(name).map(|value| (*value).to_string()))
    }

    #[test]
    fn defaults_applied_for_optional_values() {
        let settings = settings_from(base_vars()).unwrap();

        assert_eq!(settings.check_interval, Duration::from_secs(60));
        assert_eq!(settings.retry_interval, Duration::from_secs(900));
        assert_eq!(settings.probe_timeout, Duration::from_secs(60));
        assert_eq!(settings.notify_policy, NotifyPolicy::Transition);
        assert_eq!(settings.bind, "0.0.0.0");
        assert_eq!(settings.port, 8080);
    }

    #[test]
    fn missing_remote_url_is_rejected() {
        let mut vars = base_vars();
        vars.remove("REMOTE_URL");

        let err = settings_from(vars).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("REMOTE_URL")));
    }

    #[test]
    fn blank_token_counts_as_missing() {
        let mut vars = base_vars();
        vars.insert("SSL_TOKEN", "  ");

        let err = settings_from(vars).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SSL_TOKEN")));
    }

    #[test]
    fn fractional_check_interval_is_allowed() {
        let mut vars = base_vars();
        vars.insert("CHECK_INTERVAL", "0.5");

        let settings = settings_from(vars).unwrap();
        assert_eq!(settings.check_interval, Duration::from_millis(500));
    }

    #[test]
    fn zero_check_interval_is_rejected() {
        let mut vars = base_vars();
        vars.insert("CHECK_INTERVAL", "0");

        assert!(matches!(
            settings_from(vars).unwrap_err(),
            ConfigError::Invalid { name: "CHECK_INTERVAL", .. }
        ));
    }

    #[test]
    fn non_numeric_retry_interval_is_rejected() {
        let mut vars = base_vars();
        vars.insert("RETRY_INTERVAL", "soon");

        assert!(matches!(
            settings_from(vars).unwrap_err(),
            ConfigError::Invalid { name: "RETRY_INTERVAL", .. }
        ));
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        let mut vars = base_vars();
        vars.insert("REMOTE_URL", "ftp://api.example.com");

        assert!(matches!(
            settings_from(vars).unwrap_err(),
            ConfigError::Invalid { name: "REMOTE_URL", .. }
        ));
    }

    #[test]
    fn trailing_slash_is_trimmed_from_remote_url() {
        let mut vars = base_vars();
        vars.insert("REMOTE_URL", "https://api.example.com/");

        let settings = settings_from(vars).unwrap();
        assert_eq!(settings.remote_url, "https://api.example.com");
    }

    #[test]
    fn notify_policy_is_parsed() {
        let mut vars = base_vars();
        vars.insert("NOTIFY_POLICY", "every");

        let settings = settings_from(vars).unwrap();
        assert_eq!(settings.notify_policy, NotifyPolicy::Every);
    }

    #[test]
    fn unknown_notify_policy_is_rejected() {
        let mut vars = base_vars();
        vars.insert("NOTIFY_POLICY", "sometimes");

        assert!(matches!(
            settings_from(vars).unwrap_err(),
            ConfigError::Invalid { name: "NOTIFY_POLICY", .. }
        ));
    }
}
