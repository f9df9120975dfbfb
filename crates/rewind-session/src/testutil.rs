//! Shared transport doubles for the unit tests in this crate.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use parking_lot::Mutex;
use rewind_core::{ANY_EVENT, EventHandler, EventPayload, SubscriptionId, Transport};

/// In-memory transport with a real subscription table: subscribed handlers
/// fire on [`TestTransport::dispatch`], emits are recorded.
pub struct TestTransport {
    id: String,
    subs: Mutex<HashMap<String, Vec<(SubscriptionId, EventHandler)>>>,
    next_token: AtomicU64,
    sent: Mutex<Vec<(String, EventPayload)>>,
}

impl TestTransport {
    pub fn arc(id: &str) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            subs: Mutex::new(HashMap::new()),
            next_token: AtomicU64::new(1),
            sent: Mutex::new(Vec::new()),
        })
    }

    /// Simulate an inbound event arriving on this transport.
    pub fn dispatch(&self, event: &str, payload: &EventPayload) {
        let handlers: Vec<EventHandler> = {
            let subs = self.subs.lock();
            let mut out = Vec::new();
            if let Some(exact) = subs.get(event) {
                out.extend(exact.iter().map(|(_, h)| h.clone()));
            }
            if event != ANY_EVENT {
                if let Some(any) = subs.get(ANY_EVENT) {
                    out.extend(any.iter().map(|(_, h)| h.clone()));
                }
            }
            out
        };
        for handler in handlers {
            (*handler)(event, payload);
        }
    }

    /// Everything emitted to this transport, in order.
    pub fn sent(&self) -> Vec<(String, EventPayload)> {
        self.sent.lock().clone()
    }

    /// Just the emitted message ids, in order.
    pub fn sent_ids(&self) -> Vec<String> {
        self.sent.lock().iter().map(|(id, _)| id.clone()).collect()
    }
}

impl Transport for TestTransport {
    fn connection_id(&self) -> &str {
        &self.id
    }

    fn subscribe(&self, event: &str, handler: EventHandler) -> Option<SubscriptionId> {
        let token = SubscriptionId(self.next_token.fetch_add(1, Ordering::Relaxed));
        self.subs
            .lock()
            .entry(event.to_string())
            .or_default()
            .push((token, handler));
        Some(token)
    }

    fn unsubscribe(&self, event: &str, id: SubscriptionId) -> bool {
        let mut subs = self.subs.lock();
        if let Some(handlers) = subs.get_mut(event) {
            let before = handlers.len();
            handlers.retain(|(token, _)| *token != id);
            return handlers.len() < before;
        }
        false
    }

    fn emit(&self, event: &str, payload: &EventPayload) -> bool {
        self.sent.lock().push((event.to_string(), payload.clone()));
        true
    }
}

/// Placeholder transport without a binding capability: `subscribe` always
/// declines. Emits are still recorded.
pub struct NullBindingTransport {
    id: String,
    sent: Mutex<Vec<(String, EventPayload)>>,
}

impl NullBindingTransport {
    pub fn arc(id: &str) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent_ids(&self) -> Vec<String> {
        self.sent.lock().iter().map(|(id, _)| id.clone()).collect()
    }
}

impl Transport for NullBindingTransport {
    fn connection_id(&self) -> &str {
        &self.id
    }

    fn subscribe(&self, _event: &str, _handler: EventHandler) -> Option<SubscriptionId> {
        None
    }

    fn unsubscribe(&self, _event: &str, _id: SubscriptionId) -> bool {
        false
    }

    fn emit(&self, event: &str, payload: &EventPayload) -> bool {
        self.sent.lock().push((event.to_string(), payload.clone()));
        true
    }
}

/// A handler that counts invocations.
pub fn counting_handler() -> (EventHandler, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();
    let handler: EventHandler = Arc::new(move |_, _| {
        let _ = counter.fetch_add(1, Ordering::SeqCst);
    });
    (handler, count)
}
