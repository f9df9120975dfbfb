//! The JSON frame every message travels in.

use chrono::Utc;
use rewind_core::EventPayload;
use serde::{Deserialize, Serialize};

/// One wire frame: `{"type": ..., "payload": ..., "timestamp": ...}`.
///
/// Inbound frames may omit `payload` (liveness messages) and `timestamp`;
/// outbound frames always carry both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// Message id, e.g. `"trace-loaded"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Message body.
    #[serde(default)]
    pub payload: EventPayload,
    /// RFC 3339 send time. Informational only; nothing orders on it.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub timestamp: String,
}

impl Envelope {
    /// Build an outbound frame stamped with the current wall-clock time.
    pub fn outbound(kind: &str, payload: &EventPayload) -> Self {
        Self {
            kind: kind.to_string(),
            payload: payload.clone(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    /// Parse an inbound frame. Returns `None` on malformed JSON; the
    /// caller logs and drops, it never fails the connection.
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }

    /// Serialize for the socket.
    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }
}
