//! # rewind-server
//!
//! Axum HTTP + WebSocket shell around the session layer. Each accepted
//! `/ws` upgrade becomes a [`transport::WsTransport`] handed to the session
//! manager; the read loop dispatches inbound envelopes into the handler
//! registry; `/health` and `/metrics` expose liveness and counters.

#![deny(unsafe_code)]

pub mod config;
pub mod health;
pub mod metrics;
pub mod server;
pub mod transport;
pub mod wiring;
pub mod ws;

pub use config::ServerConfig;
pub use server::{AppState, HostServer};
pub use transport::WsTransport;
pub use wiring::{BackendLink, StubBackendLink, wire_session};
