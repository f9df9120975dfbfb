//! Startup wiring: the plain ordered list of `(event, handler)` pairs.
//!
//! Every handler the host ever needs is registered here, once, before the
//! server starts accepting connections. The registry keeps the entries for
//! the process lifetime and rebinds them on every transport change, so no
//! code elsewhere re-registers anything.

use std::sync::Arc;

use rewind_core::{ANY_EVENT, EventHandler, EventPayload, HostError};
use rewind_session::{HandlerRegistry, SessionContext};
use rewind_wire::is_inbound_event;
use rewind_wire::messages::{
    ADD_BREAKPOINT, CONTINUE_FORWARD, CONTINUE_REVERSE, KEEPALIVE, LOAD_CALLTRACE, LOAD_EVENTS,
    LOAD_TRACE, REMOVE_BREAKPOINT, RUN_TO_ENTRY, STEP,
};
use tracing::debug;

/// Channel to the sibling debugging backend. The host forwards named
/// debugger events through it and nothing more; stepping, breakpoints and
/// trace queries are the backend's business.
pub trait BackendLink: Send + Sync {
    /// Hand one inbound client event to the backend.
    fn forward(&self, event: &str, payload: &EventPayload);
}

/// A [`BackendLink`] that only logs. Used when the host runs without a
/// backend (tests, `--no-backend` style launches).
pub struct StubBackendLink;

impl BackendLink for StubBackendLink {
    fn forward(&self, event: &str, payload: &EventPayload) {
        debug!(event, %payload, "no backend attached, event dropped");
    }
}

/// Debugger events the client may send, forwarded verbatim to the backend.
/// Ordering here fixes the registration (and thus rebinding) order.
const FORWARDED_EVENTS: [&str; 9] = [
    LOAD_TRACE,
    STEP,
    CONTINUE_FORWARD,
    CONTINUE_REVERSE,
    ADD_BREAKPOINT,
    REMOVE_BREAKPOINT,
    RUN_TO_ENTRY,
    LOAD_EVENTS,
    LOAD_CALLTRACE,
];

/// Build the ordered handler list for a client session.
///
/// 1. The wildcard activity hook: any inbound traffic keeps the session
///    alive, so new message types need no extra wiring
/// 2. `keepalive`: explicitly accepted; its activity reset already rides
///    the wildcard hook, the handler itself has nothing left to do
/// 3. The debugger-protocol forwarders, in fixed order
pub fn client_event_handlers(
    ctx: &Arc<SessionContext>,
    backend: Arc<dyn BackendLink>,
) -> Vec<(String, EventHandler)> {
    let mut handlers: Vec<(String, EventHandler)> = Vec::new();

    let hook_ctx = ctx.clone();
    handlers.push((
        ANY_EVENT.to_string(),
        Arc::new(move |_, _| {
            let now = hook_ctx.now_ms();
            hook_ctx.state().mark_activity(now);
        }),
    ));

    handlers.push((KEEPALIVE.to_string(), Arc::new(|_, _| {})));

    for event in FORWARDED_EVENTS {
        let link = backend.clone();
        handlers.push((
            event.to_string(),
            Arc::new(move |name, payload| link.forward(name, payload)),
        ));
    }

    handlers
}

/// Register an ordered handler list, validating every event name against
/// the declared inbound table first. Malformed wiring fails here, at
/// startup, not at dispatch time.
pub fn register_handlers(
    registry: &HandlerRegistry,
    handlers: Vec<(String, EventHandler)>,
) -> Result<(), HostError> {
    for (event, _) in &handlers {
        if event != ANY_EVENT && !is_inbound_event(event) {
            return Err(HostError::UnknownWiringEvent {
                event: event.clone(),
            });
        }
    }
    for (event, handler) in handlers {
        registry.register_handler(&event, handler);
    }
    Ok(())
}

/// Wire the standard client handlers into `ctx`'s registry.
pub fn wire_session(
    ctx: &Arc<SessionContext>,
    backend: Arc<dyn BackendLink>,
) -> Result<(), HostError> {
    register_handlers(ctx.registry(), client_event_handlers(ctx, backend))
}
