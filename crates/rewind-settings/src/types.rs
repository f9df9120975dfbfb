//! Settings schema.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::duration::{DEFAULT_IDLE_TIMEOUT_MS, parse_idle_timeout};

/// Which startup-mode message the host seeds into the bootstrap cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StartupMode {
    /// Interactive shell-recording mode.
    Shell,
    /// Replay of a recorded trace.
    Alt,
}

/// Network settings for the server shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host to bind.
    pub host: String,
    /// Port to bind (`0` auto-assigns).
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 7007,
        }
    }
}

/// Session-layer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Idle timeout: `<integer>[ms|s|m|h]` or `never`. `0` disables.
    pub idle_timeout: String,
    /// Startup mode seeded at boot.
    pub startup_mode: StartupMode,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            idle_timeout: "10m".into(),
            startup_mode: StartupMode::Alt,
        }
    }
}

impl SessionSettings {
    /// The idle timeout in milliseconds, or the disabled sentinel.
    ///
    /// A malformed value warns and falls back to the default; configuration
    /// problems never stop the host from serving.
    pub fn idle_timeout_ms(&self) -> i64 {
        match parse_idle_timeout(&self.idle_timeout) {
            Ok(ms) => ms,
            Err(err) => {
                warn!(
                    value = %self.idle_timeout,
                    error = %err,
                    default_ms = DEFAULT_IDLE_TIMEOUT_MS,
                    "invalid idle_timeout setting, using default"
                );
                DEFAULT_IDLE_TIMEOUT_MS
            }
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Default `tracing` filter directive (overridden by `REWIND_LOG`).
    pub filter: String,
    /// Optional log file; stderr when absent.
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "info".into(),
            file: None,
        }
    }
}

/// Root settings document (`~/.rewind/settings.json`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostSettings {
    /// Network settings.
    pub server: ServerSettings,
    /// Session-layer settings.
    pub session: SessionSettings,
    /// Logging settings.
    pub log: LogSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let s = HostSettings::default();
        assert_eq!(s.server.host, "127.0.0.1");
        assert_eq!(s.server.port, 7007);
        assert_eq!(s.session.idle_timeout, "10m");
        assert_eq!(s.session.startup_mode, StartupMode::Alt);
        assert_eq!(s.log.filter, "info");
        assert!(s.log.file.is_none());
    }

    #[test]
    fn idle_timeout_ms_parses_configured_value() {
        let s = SessionSettings {
            idle_timeout: "5s".into(),
            ..SessionSettings::default()
        };
        assert_eq!(s.idle_timeout_ms(), 5000);
    }

    #[test]
    fn idle_timeout_ms_falls_back_on_garbage() {
        let s = SessionSettings {
            idle_timeout: "whenever".into(),
            ..SessionSettings::default()
        };
        assert_eq!(s.idle_timeout_ms(), DEFAULT_IDLE_TIMEOUT_MS);
    }

    #[test]
    fn startup_mode_serializes_kebab_case() {
        let json = serde_json::to_string(&StartupMode::Shell).unwrap();
        assert_eq!(json, r#""shell""#);
        let back: StartupMode = serde_json::from_str(r#""alt""#).unwrap();
        assert_eq!(back, StartupMode::Alt);
    }

    #[test]
    fn partial_document_fills_defaults() {
        let s: HostSettings =
            serde_json::from_str(r#"{"session":{"idle_timeout":"30s"}}"#).unwrap();
        assert_eq!(s.session.idle_timeout, "30s");
        assert_eq!(s.server.port, 7007);
        assert_eq!(s.session.startup_mode, StartupMode::Alt);
    }
}
