//! # rewind-wire
//!
//! Wire contracts between the rewind host and its UI client:
//!
//! - **Message ids**: the outbound bootstrap whitelist with its priority
//!   order, and the declared inbound event table
//! - **Envelope**: the JSON frame every message travels in
//! - **Notices**: the `connection-disconnected` payload

#![deny(unsafe_code)]

pub mod envelope;
pub mod messages;
pub mod notice;

pub use envelope::Envelope;
pub use messages::{
    BOOTSTRAP_PRIORITY, BOOTSTRAP_WHITELIST, INBOUND_EVENTS, is_bootstrap, is_inbound_event,
    priority_rank,
};
pub use notice::{DisconnectNotice, DisconnectReason};
