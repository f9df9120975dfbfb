//! The only outbound path the rest of the host uses.

use std::sync::Arc;

use rewind_core::EventPayload;
use rewind_wire::is_bootstrap;
use tracing::debug;

use crate::context::SessionContext;

/// Forwards messages to the active transport and records whitelisted ids in
/// the bootstrap cache. Never fails, never blocks, never buffers for a
/// disconnected client. Delivery is at-most-once; recovery happens through
/// the bootstrap replay on the next connection.
#[derive(Clone)]
pub struct EmitFacade {
    ctx: Arc<SessionContext>,
}

impl EmitFacade {
    /// Create a facade over `ctx`.
    pub fn new(ctx: Arc<SessionContext>) -> Self {
        Self { ctx }
    }

    /// Send `payload` under `id`.
    ///
    /// Whitelisted ids are upserted into the bootstrap cache first, whether
    /// or not a client is connected, so a later reconnect recovers the
    /// latest state even when this very emit is dropped.
    pub fn emit(&self, id: &str, payload: &EventPayload) {
        if is_bootstrap(id) {
            self.ctx.bootstrap().upsert(id, payload.clone());
        }
        match self.ctx.registry().active_transport() {
            Some(transport) => {
                if !transport.emit(id, payload) {
                    debug!(
                        event = id,
                        connection_id = transport.connection_id(),
                        "transport did not accept message, dropped"
                    );
                }
            }
            None => debug!(event = id, "no active client, message dropped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::SessionManager;
    use crate::testutil::TestTransport;
    use rewind_core::SystemClock;
    use serde_json::json;

    fn make() -> (Arc<SessionContext>, SessionManager, EmitFacade) {
        let ctx = SessionContext::new(Arc::new(SystemClock::new()));
        let manager = SessionManager::new(ctx.clone());
        let emit = EmitFacade::new(ctx.clone());
        (ctx, manager, emit)
    }

    #[test]
    fn whitelisted_emit_without_client_is_cached_not_lost() {
        let (ctx, _manager, emit) = make();
        emit.emit("trace-loaded", &json!({"events": 7}));
        assert_eq!(ctx.bootstrap().len(), 1);
    }

    #[test]
    fn non_whitelisted_emit_is_never_cached() {
        let (ctx, _manager, emit) = make();
        emit.emit("step-response", &json!({"line": 3}));
        assert!(ctx.bootstrap().is_empty());
    }

    #[test]
    fn emit_with_client_delivers_and_caches() {
        let (ctx, manager, emit) = make();
        let transport = TestTransport::arc("a");
        manager.client_connected(transport.clone());

        emit.emit("symbols-loaded", &json!({"count": 10}));

        assert!(transport.sent_ids().iter().any(|id| id == "symbols-loaded"));
        assert_eq!(ctx.bootstrap().len(), 1);
    }

    #[test]
    fn emit_caches_even_while_delivering_elsewhere() {
        let (ctx, manager, emit) = make();
        let transport = TestTransport::arc("a");
        manager.client_connected(transport);

        emit.emit("trace-loaded", &json!({"v": 1}));
        emit.emit("trace-loaded", &json!({"v": 2}));

        let entries = ctx.bootstrap().ordered();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].payload, json!({"v": 2}));
    }

    #[test]
    fn emit_without_client_does_not_panic() {
        let (_ctx, _manager, emit) = make();
        emit.emit("connection-disconnected", &json!({"reason": "idle-timeout"}));
    }
}
