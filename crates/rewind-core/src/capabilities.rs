//! Collaborator capabilities consumed by the session layer.

use std::sync::Arc;
use std::time::Instant;

/// JSON payload carried by every named event.
pub type EventPayload = serde_json::Value;

/// A handler bound to a named event.
///
/// Handlers receive the event name alongside the payload so that a single
/// handler can be bound to the wildcard event and still tell messages apart.
pub type EventHandler = Arc<dyn Fn(&str, &EventPayload) + Send + Sync>;

/// Wildcard event name: a subscription under this name receives every
/// inbound event the transport dispatches, in addition to the exact-name
/// subscribers.
pub const ANY_EVENT: &str = "*";

/// Opaque token identifying one live subscription on one transport.
///
/// Tokens are only meaningful to the transport that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// An event-based bidirectional connection supplied by the networking layer.
///
/// The session layer never owns a transport's lifetime: the networking layer
/// creates one per client connection and discards it on disconnect. The
/// session layer only holds a reference while the transport is active.
///
/// Contract for implementations:
/// - every inbound event must be delivered to its exact-name subscribers and
///   then to [`ANY_EVENT`] subscribers;
/// - `subscribe` returns `None` when the transport does not support event
///   binding (placeholder transports); callers treat that as a no-op;
/// - `emit` is fire-and-forget and must never block. The returned flag only
///   reports whether the message was accepted for delivery.
pub trait Transport: Send + Sync {
    /// Stable identifier of the underlying connection.
    fn connection_id(&self) -> &str;

    /// Bind `handler` to `event`. Returns `None` if binding is unsupported.
    fn subscribe(&self, event: &str, handler: EventHandler) -> Option<SubscriptionId>;

    /// Remove a previously issued subscription. Returns `false` if the token
    /// was unknown or binding is unsupported.
    fn unsubscribe(&self, event: &str, id: SubscriptionId) -> bool;

    /// Send `payload` to the client under `event`.
    fn emit(&self, event: &str, payload: &EventPayload) -> bool;
}

/// Monotonic time source read by the idle watchdog.
pub trait MonotonicClock: Send + Sync {
    /// Milliseconds elapsed on a process-local monotonic clock.
    fn now_ms(&self) -> u64;
}

/// [`MonotonicClock`] backed by [`Instant`], anchored at construction.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock anchored at the current instant.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for SystemClock {
    #[allow(clippy::cast_possible_truncation)]
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Process-termination capability, injected so the watchdog is testable.
pub trait ProcessExit: Send + Sync {
    /// Terminate the process with `code`.
    fn exit(&self, code: i32);
}

/// [`ProcessExit`] that really terminates via [`std::process::exit`].
pub struct RealProcessExit;

impl ProcessExit for RealProcessExit {
    fn exit(&self, code: i32) {
        std::process::exit(code);
    }
}
