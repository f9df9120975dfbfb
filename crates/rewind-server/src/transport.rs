//! The concrete [`Transport`] over one WebSocket connection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use rewind_core::{ANY_EVENT, EventHandler, EventPayload, SubscriptionId, Transport};
use rewind_wire::Envelope;
use tokio::sync::mpsc;
use tracing::debug;

/// One client connection as the session layer sees it.
///
/// Outbound messages are serialized into envelopes and pushed onto a bounded
/// channel drained by the socket's write task; a full channel drops the
/// message and counts it, it never blocks the emitter. Inbound frames are
/// fed through [`WsTransport::dispatch`] by the read loop and fan out to the
/// exact-name subscribers and then the wildcard subscribers.
pub struct WsTransport {
    id: String,
    tx: mpsc::Sender<String>,
    subs: RwLock<HashMap<String, Vec<(SubscriptionId, EventHandler)>>>,
    next_token: AtomicU64,
    dropped: AtomicU64,
}

impl WsTransport {
    /// Create a transport writing frames into `tx`.
    pub fn new(id: String, tx: mpsc::Sender<String>) -> Self {
        Self {
            id,
            tx,
            subs: RwLock::new(HashMap::new()),
            next_token: AtomicU64::new(1),
            dropped: AtomicU64::new(0),
        }
    }

    /// Deliver one inbound event to the subscribed handlers.
    ///
    /// Handlers are cloned out of the table before invocation so that a
    /// handler may subscribe or emit without deadlocking.
    pub fn dispatch(&self, event: &str, payload: &EventPayload) {
        let handlers: Vec<EventHandler> = {
            let subs = self.subs.read();
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

    /// Messages dropped because the outbound channel was full or closed.
    pub fn drop_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Number of live subscriptions (all events).
    pub fn subscription_count(&self) -> usize {
        self.subs.read().values().map(Vec::len).sum()
    }
}

impl Transport for WsTransport {
    fn connection_id(&self) -> &str {
        &self.id
    }

    fn subscribe(&self, event: &str, handler: EventHandler) -> Option<SubscriptionId> {
        let token = SubscriptionId(self.next_token.fetch_add(1, Ordering::Relaxed));
        self.subs
            .write()
            .entry(event.to_string())
            .or_default()
            .push((token, handler));
        Some(token)
    }

    fn unsubscribe(&self, event: &str, id: SubscriptionId) -> bool {
        let mut subs = self.subs.write();
        if let Some(handlers) = subs.get_mut(event) {
            let before = handlers.len();
            handlers.retain(|(token, _)| *token != id);
            let removed = handlers.len() < before;
            if handlers.is_empty() {
                let _ = subs.remove(event);
            }
            return removed;
        }
        false
    }

    fn emit(&self, event: &str, payload: &EventPayload) -> bool {
        let Some(json) = Envelope::outbound(event, payload).to_json() else {
            debug!(event, "failed to serialize outbound envelope");
            return false;
        };
        if self.tx.try_send(json).is_ok() {
            true
        } else {
            let _ = self.dropped.fetch_add(1, Ordering::Relaxed);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    fn make_transport() -> (WsTransport, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(8);
        (WsTransport::new("conn_1".into(), tx), rx)
    }

    fn counting() -> (EventHandler, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let handler: EventHandler = Arc::new(move |_, _| {
            let _ = counter.fetch_add(1, Ordering::SeqCst);
        });
        (handler, count)
    }

    #[tokio::test]
    async fn emit_writes_an_envelope() {
        let (transport, mut rx) = make_transport();
        assert!(transport.emit("trace-loaded", &json!({"events": 3})));

        let frame = rx.recv().await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(parsed["type"], "trace-loaded");
        assert_eq!(parsed["payload"]["events"], 3);
    }

    #[test]
    fn emit_to_full_channel_drops_and_counts() {
        let (tx, _rx) = mpsc::channel(1);
        let transport = WsTransport::new("conn_2".into(), tx);
        assert!(transport.emit("a", &json!(1)));
        assert!(!transport.emit("b", &json!(2)));
        assert_eq!(transport.drop_count(), 1);
    }

    #[test]
    fn emit_to_closed_channel_drops_and_counts() {
        let (tx, rx) = mpsc::channel(8);
        drop(rx);
        let transport = WsTransport::new("conn_3".into(), tx);
        assert!(!transport.emit("a", &json!(1)));
        assert_eq!(transport.drop_count(), 1);
    }

    #[test]
    fn dispatch_reaches_exact_subscriber() {
        let (transport, _rx) = make_transport();
        let (handler, count) = counting();
        let _ = transport.subscribe("step", handler).unwrap();

        transport.dispatch("step", &json!({}));
        transport.dispatch("other", &json!({}));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dispatch_reaches_wildcard_subscriber_for_every_event() {
        let (transport, _rx) = make_transport();
        let (handler, count) = counting();
        let _ = transport.subscribe(ANY_EVENT, handler).unwrap();

        transport.dispatch("step", &json!({}));
        transport.dispatch("keepalive", &json!({}));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn exact_subscriber_fires_before_wildcard() {
        let (transport, _rx) = make_transport();
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let o1 = order.clone();
        let _ = transport.subscribe(
            "step",
            Arc::new(move |_, _| o1.lock().push("exact")),
        );
        let o2 = order.clone();
        let _ = transport.subscribe(
            ANY_EVENT,
            Arc::new(move |_, _| o2.lock().push("wildcard")),
        );

        transport.dispatch("step", &json!({}));
        assert_eq!(*order.lock(), vec!["exact", "wildcard"]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let (transport, _rx) = make_transport();
        let (handler, count) = counting();
        let token = transport.subscribe("step", handler).unwrap();

        assert!(transport.unsubscribe("step", token));
        transport.dispatch("step", &json!({}));
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(transport.subscription_count(), 0);
    }

    #[test]
    fn unsubscribe_unknown_token_is_false() {
        let (transport, _rx) = make_transport();
        assert!(!transport.unsubscribe("step", SubscriptionId(99)));
    }

    #[test]
    fn wildcard_handler_receives_the_event_name() {
        let (transport, _rx) = make_transport();
        let seen = Arc::new(parking_lot::Mutex::new(String::new()));
        let seen2 = seen.clone();
        let _ = transport.subscribe(
            ANY_EVENT,
            Arc::new(move |event, _| *seen2.lock() = event.to_string()),
        );

        transport.dispatch("load-trace", &json!({}));
        assert_eq!(*seen.lock(), "load-trace");
    }
}
