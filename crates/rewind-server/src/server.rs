//! `HostServer` — Axum HTTP + WebSocket server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use axum::extract::{State, WebSocketUpgrade};
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use metrics_exporter_prometheus::PrometheusHandle;
use rewind_session::SessionManager;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::error;
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::health::{self, HealthResponse};
use crate::ws::run_ws_session;

/// Shared state accessible from Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// The session manager every connection is handed to.
    pub session: Arc<SessionManager>,
    /// When the host started.
    pub start_time: Instant,
    /// Prometheus render handle for `/metrics`.
    pub metrics: PrometheusHandle,
    /// Outbound channel capacity per connection.
    pub channel_capacity: usize,
    /// Interval between WebSocket Ping frames.
    pub ping_interval: Duration,
}

/// The host's HTTP + WebSocket server.
pub struct HostServer {
    config: ServerConfig,
    state: AppState,
}

impl HostServer {
    /// Create a new server.
    pub fn new(
        config: ServerConfig,
        session: Arc<SessionManager>,
        metrics: PrometheusHandle,
    ) -> Self {
        let state = AppState {
            session,
            start_time: Instant::now(),
            metrics,
            channel_capacity: config.channel_capacity,
            ping_interval: Duration::from_secs(config.ping_interval_secs),
        };
        Self { config, state }
    }

    /// Build the Axum router with all routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/metrics", get(metrics_handler))
            .route("/ws", get(ws_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind the configured address and serve on a spawned task.
    ///
    /// Returns the bound address (useful with port `0`) and the serve task
    /// handle.
    pub async fn listen(&self) -> std::io::Result<(SocketAddr, JoinHandle<()>)> {
        let listener =
            tokio::net::TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        let addr = listener.local_addr()?;
        let app = self.router();
        let handle = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                error!(error = %err, "server task ended with error");
            }
        });
        Ok((addr, handle))
    }

    /// Like [`listen`](Self::listen), but the serve loop drains and stops
    /// when `cancel` fires.
    pub async fn listen_with_shutdown(
        &self,
        cancel: CancellationToken,
    ) -> std::io::Result<(SocketAddr, JoinHandle<()>)> {
        let listener =
            tokio::net::TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        let addr = listener.local_addr()?;
        let app = self.router();
        let handle = tokio::spawn(async move {
            let serve = axum::serve(listener, app)
                .with_graceful_shutdown(cancel.cancelled_owned());
            if let Err(err) = serve.await {
                error!(error = %err, "server task ended with error");
            }
        });
        Ok((addr, handle))
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get the session manager.
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.state.session
    }
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let ctx = state.session.context();
    let resp = health::health_check(
        state.start_time,
        ctx.registry().active_transport().is_some(),
        ctx.bootstrap().len(),
    );
    Json(resp)
}

/// GET /metrics
async fn metrics_handler(State(state): State<AppState>) -> String {
    state.metrics.render()
}

/// GET /ws — upgrade and run the client session.
async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    let client_id = format!("conn_{}", Uuid::now_v7());
    ws.on_upgrade(move |socket| {
        run_ws_session(
            socket,
            client_id,
            state.session.clone(),
            state.channel_capacity,
            state.ping_interval,
        )
    })
}
