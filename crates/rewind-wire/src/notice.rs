//! The `connection-disconnected` notice.

use rewind_core::EventPayload;
use serde::{Deserialize, Serialize};

/// Why the host is dropping a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisconnectReason {
    /// A newer connection took over the session slot.
    Superseded,
    /// The configured idle timeout elapsed.
    IdleTimeout,
}

/// Body of a `connection-disconnected` message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisconnectNotice {
    /// Machine-readable reason.
    pub reason: DisconnectReason,
    /// Human-readable explanation shown by the client.
    pub message: String,
}

impl DisconnectNotice {
    /// Notice for a transport replaced by a newer connection.
    pub fn superseded() -> Self {
        Self {
            reason: DisconnectReason::Superseded,
            message: "another client connected and took over this session".into(),
        }
    }

    /// Notice sent just before an idle-timeout exit.
    pub fn idle_timeout() -> Self {
        Self {
            reason: DisconnectReason::IdleTimeout,
            message: "session idle timeout reached, host is shutting down".into(),
        }
    }

    /// The notice as an event payload. Serialization of this shape cannot
    /// fail, so a null payload is only a theoretical fallback.
    pub fn to_payload(&self) -> EventPayload {
        serde_json::to_value(self).unwrap_or(EventPayload::Null)
    }
}
