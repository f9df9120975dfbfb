//! `/health` endpoint.

use std::time::Instant;

use serde::Serialize;

/// Health check response body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the host is running.
    pub status: String,
    /// Seconds since the host started.
    pub uptime_secs: u64,
    /// Whether a client transport is currently attached.
    pub client_attached: bool,
    /// Number of messages the bootstrap cache holds.
    pub bootstrap_entries: usize,
}

/// Build a health response from live state.
pub fn health_check(
    start_time: Instant,
    client_attached: bool,
    bootstrap_entries: usize,
) -> HealthResponse {
    HealthResponse {
        status: "ok".into(),
        uptime_secs: start_time.elapsed().as_secs(),
        client_attached,
        bootstrap_entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_ok() {
        let resp = health_check(Instant::now(), false, 0);
        assert_eq!(resp.status, "ok");
    }

    #[test]
    fn uptime_increases() {
        let start = Instant::now()
            .checked_sub(std::time::Duration::from_secs(60))
            .unwrap();
        let resp = health_check(start, false, 0);
        assert!(resp.uptime_secs >= 59);
    }

    #[test]
    fn state_is_reflected() {
        let resp = health_check(Instant::now(), true, 4);
        assert!(resp.client_attached);
        assert_eq!(resp.bootstrap_entries, 4);
    }

    #[test]
    fn serialization() {
        let resp = health_check(Instant::now(), true, 2);
        let json = serde_json::to_string(&resp).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert_eq!(parsed["client_attached"], true);
        assert_eq!(parsed["bootstrap_entries"], 2);
        assert!(parsed["uptime_secs"].is_number());
    }
}
