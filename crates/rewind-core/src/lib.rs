//! # rewind-core
//!
//! Foundation types for the rewind debugger host.
//!
//! This crate provides the shared vocabulary that the session layer and the
//! server shell depend on:
//!
//! - **Capabilities**: `Transport`, `MonotonicClock`, `ProcessExit` — the
//!   seams through which the host touches its collaborators
//! - **Handler types**: `EventHandler`, `EventPayload`, `SubscriptionId`
//! - **Errors**: `HostError` hierarchy via `thiserror`

#![deny(unsafe_code)]

pub mod capabilities;
pub mod errors;

pub use capabilities::{
    ANY_EVENT, EventHandler, EventPayload, MonotonicClock, ProcessExit, RealProcessExit,
    SubscriptionId, SystemClock, Transport,
};
pub use errors::HostError;
