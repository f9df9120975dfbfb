//! WebSocket session lifecycle — handles a single connected client from
//! upgrade through disconnect.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use metrics::{counter, gauge, histogram};
use rewind_core::{EventPayload, Transport};
use rewind_session::SessionManager;
use rewind_wire::Envelope;
use rewind_wire::messages::CONNECTION_WELCOME;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::metrics as metric_names;
use crate::transport::WsTransport;

/// Run a WebSocket session for a connected client.
///
/// 1. Sends a `connection-welcome` frame with the connection id
/// 2. Hands the transport to the session manager (supersession, rebind,
///    bootstrap replay all happen inside that call)
/// 3. Forwards outbound frames and periodic Ping frames on a write task
/// 4. Dispatches inbound envelopes into the subscribed handlers
/// 5. Detaches on disconnect
#[instrument(skip_all, fields(client_id = %client_id))]
pub async fn run_ws_session(
    ws: WebSocket,
    client_id: String,
    session: Arc<SessionManager>,
    channel_capacity: usize,
    ping_interval: Duration,
) {
    let (mut ws_tx, mut ws_rx) = ws.split();

    let (send_tx, mut send_rx) = mpsc::channel::<String>(channel_capacity);
    let ws_transport = Arc::new(WsTransport::new(client_id.clone(), send_tx));
    let transport: Arc<dyn Transport> = ws_transport.clone();

    let connection_start = Instant::now();
    info!("client connected");
    counter!(metric_names::WS_CONNECTIONS_TOTAL).increment(1);
    gauge!(metric_names::WS_CONNECTIONS_ACTIVE).increment(1.0);

    let welcome: EventPayload = serde_json::json!({ "connectionId": client_id });
    if !transport.emit(CONNECTION_WELCOME, &welcome) {
        debug!("welcome frame not enqueued");
    }

    // Supersede any previous client, rebind handlers, replay bootstrap.
    session.client_connected(transport.clone());

    // Outbound forwarder with periodic Ping frames. Frame-level pings keep
    // intermediaries from reaping quiet connections; they are not session
    // activity.
    let outbound = tokio::spawn(async move {
        let mut ping = tokio::time::interval(ping_interval);
        // Skip the immediate first tick
        let _ = ping.tick().await;

        loop {
            tokio::select! {
                msg = send_rx.recv() => {
                    match msg {
                        Some(text) => {
                            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                _ = ping.tick() => {
                    if ws_tx.send(Message::Ping(vec![].into())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // Inbound loop: every parsed envelope goes through the transport's
    // dispatch, which is what resets the session's activity clock via the
    // wildcard hook.
    while let Some(Ok(msg)) = ws_rx.next().await {
        let text = match msg {
            Message::Text(ref t) => Some(t.to_string()),
            Message::Binary(ref data) => match std::str::from_utf8(data) {
                Ok(s) => Some(s.to_string()),
                Err(_) => {
                    debug!(len = data.len(), "ignoring non-UTF8 binary frame");
                    None
                }
            },
            Message::Close(_) => {
                info!("client sent close frame");
                break;
            }
            Message::Ping(_) | Message::Pong(_) => None,
        };

        let Some(text) = text else { continue };

        let Some(envelope) = Envelope::parse(&text) else {
            warn!(frame = %truncate(&text, 120), "dropping malformed frame");
            continue;
        };

        counter!(metric_names::WS_EVENTS_DISPATCHED_TOTAL).increment(1);
        ws_transport.dispatch(&envelope.kind, &envelope.payload);
    }

    info!(dropped = ws_transport.drop_count(), "client disconnected");
    counter!(metric_names::WS_DISCONNECTIONS_TOTAL).increment(1);
    gauge!(metric_names::WS_CONNECTIONS_ACTIVE).decrement(1.0);
    histogram!(metric_names::WS_CONNECTION_DURATION_SECONDS)
        .record(connection_start.elapsed().as_secs_f64());

    session.client_disconnected(&transport);
    outbound.abort();
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
