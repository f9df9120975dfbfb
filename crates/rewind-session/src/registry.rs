//! Durable event → handler mapping, bound to the active transport.

use std::sync::Arc;

use parking_lot::Mutex;
use rewind_core::{EventHandler, SubscriptionId, Transport};
use tracing::debug;

/// One registered handler. Entries are kept in registration order so that
/// rebinding reproduces a stable order on every transport.
struct HandlerEntry {
    event: String,
    handler: EventHandler,
}

/// A live binding of one entry on the active transport.
struct Binding {
    event: String,
    token: SubscriptionId,
}

struct RegistryInner {
    entries: Vec<HandlerEntry>,
    active: Option<Arc<dyn Transport>>,
    bindings: Vec<Binding>,
}

/// Holds the durable mapping of event name → handler and binds it to
/// whichever transport is currently active.
///
/// Entries persist for the process lifetime: registering once is enough no
/// matter how many times the physical connection is replaced. Registering
/// the same event twice yields two live bindings; callers wire each event
/// once during startup.
pub struct HandlerRegistry {
    inner: Mutex<RegistryInner>,
}

impl HandlerRegistry {
    /// Create an empty registry with no active transport.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RegistryInner {
                entries: Vec::new(),
                active: None,
                bindings: Vec::new(),
            }),
        }
    }

    /// Append a handler for `event`. If a transport is currently active the
    /// handler is bound to it immediately.
    pub fn register_handler(&self, event: &str, handler: EventHandler) {
        let mut inner = self.inner.lock();
        inner.entries.push(HandlerEntry {
            event: event.to_string(),
            handler: handler.clone(),
        });
        if let Some(transport) = inner.active.clone() {
            match transport.subscribe(event, handler) {
                Some(token) => inner.bindings.push(Binding {
                    event: event.to_string(),
                    token,
                }),
                None => debug!(
                    event,
                    connection_id = transport.connection_id(),
                    "transport does not support binding, handler left unbound"
                ),
            }
        }
    }

    /// Make `transport` the active one, unbinding every handler from the
    /// previous transport first. A no-op when `transport` is already active.
    pub fn attach_socket(&self, transport: Arc<dyn Transport>) {
        let mut inner = self.inner.lock();
        if let Some(current) = &inner.active {
            if Arc::ptr_eq(current, &transport) {
                debug!(
                    connection_id = transport.connection_id(),
                    "transport already attached"
                );
                return;
            }
        }
        Self::unbind_all(&mut inner);
        inner.active = Some(transport);
        Self::bind_all(&mut inner);
    }

    /// Unbind every handler from the active transport and clear it.
    pub fn detach_socket(&self) {
        let mut inner = self.inner.lock();
        Self::unbind_all(&mut inner);
        inner.active = None;
    }

    /// The currently active transport, if any.
    pub fn active_transport(&self) -> Option<Arc<dyn Transport>> {
        self.inner.lock().active.clone()
    }

    /// Number of registered entries (not live bindings).
    pub fn handler_count(&self) -> usize {
        self.inner.lock().entries.len()
    }

    fn bind_all(inner: &mut RegistryInner) {
        let Some(transport) = inner.active.clone() else {
            return;
        };
        for entry in &inner.entries {
            match transport.subscribe(&entry.event, entry.handler.clone()) {
                Some(token) => inner.bindings.push(Binding {
                    event: entry.event.clone(),
                    token,
                }),
                None => debug!(
                    event = %entry.event,
                    connection_id = transport.connection_id(),
                    "transport does not support binding, handler left unbound"
                ),
            }
        }
    }

    /// Unbinding goes through the transport's own unsubscribe so that events
    /// still arriving on a detached transport can never reach handlers.
    fn unbind_all(inner: &mut RegistryInner) {
        let Some(transport) = inner.active.clone() else {
            inner.bindings.clear();
            return;
        };
        for binding in inner.bindings.drain(..) {
            if !transport.unsubscribe(&binding.event, binding.token) {
                debug!(
                    event = %binding.event,
                    connection_id = transport.connection_id(),
                    "transport did not recognize subscription during unbind"
                );
            }
        }
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
