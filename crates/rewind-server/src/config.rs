//! Server configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the host's HTTP + WebSocket shell.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind (default `"127.0.0.1"`).
    pub host: String,
    /// Port to bind (default `0` for auto-assign).
    pub port: u16,
    /// Capacity of each connection's outbound channel; overflow drops.
    pub channel_capacity: usize,
    /// Interval between WebSocket Ping frames, in seconds.
    pub ping_interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            channel_capacity: 256,
            ping_interval_secs: 30,
        }
    }
}
