//! Process-wide session state, constructed once and threaded through.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use rewind_core::MonotonicClock;

use crate::bootstrap::BootstrapCache;
use crate::registry::HandlerRegistry;

/// A consistent read of the idle-relevant state.
#[derive(Debug, Clone, Copy)]
pub struct IdleSnapshot {
    /// Whether a client transport is currently attached.
    pub attached: bool,
    /// When the last connection or disconnection happened.
    pub last_connection_ms: u64,
    /// When the last inbound message arrived.
    pub last_activity_ms: u64,
}

/// Idle timestamps, mutated only by the session manager and read by the
/// watchdog. Stores use `fetch_max` so the values are monotonic
/// non-decreasing for the process lifetime.
pub struct SessionState {
    last_connection_ms: AtomicU64,
    last_activity_ms: AtomicU64,
    attached: AtomicBool,
}

impl SessionState {
    /// State at process start: detached, both clocks at `now`.
    pub fn new(now_ms: u64) -> Self {
        Self {
            last_connection_ms: AtomicU64::new(now_ms),
            last_activity_ms: AtomicU64::new(now_ms),
            attached: AtomicBool::new(false),
        }
    }

    /// A client connected (or superseded the previous one).
    pub fn mark_connected(&self, now_ms: u64) {
        let _ = self.last_connection_ms.fetch_max(now_ms, Ordering::SeqCst);
        let _ = self.last_activity_ms.fetch_max(now_ms, Ordering::SeqCst);
        self.attached.store(true, Ordering::SeqCst);
    }

    /// An inbound message arrived on the active transport.
    pub fn mark_activity(&self, now_ms: u64) {
        let _ = self.last_activity_ms.fetch_max(now_ms, Ordering::SeqCst);
    }

    /// The active client disconnected; the "no connection" clock restarts.
    pub fn mark_disconnected(&self, now_ms: u64) {
        let _ = self.last_connection_ms.fetch_max(now_ms, Ordering::SeqCst);
        self.attached.store(false, Ordering::SeqCst);
    }

    /// Read all three fields.
    pub fn snapshot(&self) -> IdleSnapshot {
        IdleSnapshot {
            attached: self.attached.load(Ordering::SeqCst),
            last_connection_ms: self.last_connection_ms.load(Ordering::SeqCst),
            last_activity_ms: self.last_activity_ms.load(Ordering::SeqCst),
        }
    }
}

/// The explicit process-wide context: the handler registry (which owns the
/// single active-transport reference), the bootstrap cache, the idle state
/// and the clock. Constructed once at process start and shared by the
/// session manager, the emit facade and the watchdog.
pub struct SessionContext {
    registry: HandlerRegistry,
    bootstrap: BootstrapCache,
    state: SessionState,
    clock: Arc<dyn MonotonicClock>,
}

impl SessionContext {
    /// Build a fresh context around `clock`.
    pub fn new(clock: Arc<dyn MonotonicClock>) -> Arc<Self> {
        let now = clock.now_ms();
        Arc::new(Self {
            registry: HandlerRegistry::new(),
            bootstrap: BootstrapCache::new(),
            state: SessionState::new(now),
            clock,
        })
    }

    /// The durable handler registry.
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// The bootstrap cache.
    pub fn bootstrap(&self) -> &BootstrapCache {
        &self.bootstrap
    }

    /// The idle state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The monotonic clock.
    pub fn clock(&self) -> &Arc<dyn MonotonicClock> {
        &self.clock
    }

    /// Current clock reading.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}
