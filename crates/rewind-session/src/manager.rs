//! Connection lifecycle state machine.
//!
//! Two states: no client, or exactly one attached client. A new connection
//! always fully supersedes the previous one; the superseded transport gets a
//! best-effort notice before it is unbound. The whole
//! connect/supersede/rebind sequence runs to completion inside one call, so
//! a watchdog tick can never observe a half-migrated state.

use std::sync::Arc;

use rewind_core::Transport;
use rewind_wire::messages::CONNECTION_DISCONNECTED;
use rewind_wire::notice::DisconnectNotice;
use tracing::{debug, info};

use crate::context::SessionContext;

/// Orchestrates the session layer against real connection events.
///
/// The networking layer calls [`client_connected`](Self::client_connected)
/// and [`client_disconnected`](Self::client_disconnected); everything else
/// (rebinding, timestamps, supersession, replay) happens in here.
pub struct SessionManager {
    ctx: Arc<SessionContext>,
}

impl SessionManager {
    /// Create a manager over the shared context.
    pub fn new(ctx: Arc<SessionContext>) -> Self {
        Self { ctx }
    }

    /// The shared context.
    pub fn context(&self) -> &Arc<SessionContext> {
        &self.ctx
    }

    /// A transport connected.
    ///
    /// 1. Notify and unbind the previous transport, if a different one was
    ///    active (supersession)
    /// 2. Bind every registered handler to the new transport
    /// 3. Reset the connection and activity clocks, mark attached
    /// 4. Replay the bootstrap cache so the client reconstructs exactly the
    ///    state a fresh client would see
    pub fn client_connected(&self, transport: Arc<dyn Transport>) {
        let registry = self.ctx.registry();
        if let Some(previous) = registry.active_transport() {
            if Arc::ptr_eq(&previous, &transport) {
                debug!(
                    connection_id = transport.connection_id(),
                    "transport already active, ignoring duplicate connect"
                );
                return;
            }
            info!(
                old = previous.connection_id(),
                new = transport.connection_id(),
                "client superseded by new connection"
            );
            let notice = DisconnectNotice::superseded().to_payload();
            if !previous.emit(CONNECTION_DISCONNECTED, &notice) {
                debug!(
                    connection_id = previous.connection_id(),
                    "superseded transport did not accept disconnect notice"
                );
            }
        } else {
            info!(connection_id = transport.connection_id(), "client connected");
        }

        registry.attach_socket(transport.clone());
        self.ctx.state().mark_connected(self.ctx.now_ms());

        let mut replayed = 0usize;
        self.ctx.bootstrap().replay(|id, payload| {
            if !transport.emit(id, payload) {
                debug!(event = id, "bootstrap message not accepted by transport");
            }
            replayed += 1;
        });
        debug!(
            connection_id = transport.connection_id(),
            replayed, "bootstrap replay complete"
        );
    }

    /// A transport disconnected.
    ///
    /// Only the active transport's disconnect moves the session to the
    /// no-client state; a superseded socket lingering briefly and then
    /// closing must not detach its successor.
    pub fn client_disconnected(&self, transport: &Arc<dyn Transport>) {
        let registry = self.ctx.registry();
        match registry.active_transport() {
            Some(active) if Arc::ptr_eq(&active, transport) => {
                registry.detach_socket();
                self.ctx.state().mark_disconnected(self.ctx.now_ms());
                info!(
                    connection_id = transport.connection_id(),
                    "client disconnected"
                );
            }
            _ => debug!(
                connection_id = transport.connection_id(),
                "stale transport disconnect ignored"
            ),
        }
    }
}
