//! # rewind-session
//!
//! The resilient session layer of the rewind debugger host: exactly one UI
//! client holds a logical debugging session across an unreliable, frequently
//! replaced physical connection.
//!
//! - [`registry::HandlerRegistry`] — durable event → handler mapping, bound
//!   and rebound to whichever transport is currently active
//! - [`bootstrap::BootstrapCache`] — latest-value-wins snapshot of the
//!   bootstrap whitelist, replayed deterministically on reconnect
//! - [`watchdog`] — decides when an abandoned host should exit
//! - [`manager::SessionManager`] — the connection lifecycle state machine
//! - [`emit::EmitFacade`] — the only outbound path the rest of the host uses
//!
//! All mutation happens synchronously inside event handlers; the shared
//! tables use short non-async locks and the idle timestamps are atomics.

#![deny(unsafe_code)]

pub mod bootstrap;
pub mod context;
pub mod emit;
pub mod manager;
pub mod registry;
pub mod watchdog;

pub use bootstrap::{BootstrapCache, BootstrapEntry};
pub use context::SessionContext;
pub use emit::EmitFacade;
pub use manager::SessionManager;
pub use registry::HandlerRegistry;
pub use watchdog::{idle_check_interval, run_idle_watchdog, should_exit_idle};

#[cfg(test)]
pub(crate) mod testutil;
