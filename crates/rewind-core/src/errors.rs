//! Error hierarchy for the rewind host.
//!
//! None of these propagate out of the session layer as failures; every
//! path degrades to logging plus a safe no-op. The types exist so that
//! degradation sites log something structured and so the settings layer can
//! report what it fell back from. An idle-timeout exit is deliberately not
//! represented here: it is a clean, intentional termination, not an error.

use thiserror::Error;

/// Failures the host can observe while managing a client session.
#[derive(Debug, Error)]
pub enum HostError {
    /// An emit was attempted with no active client transport.
    #[error("no active client transport for '{event}'")]
    TransportUnavailable {
        /// Event the caller tried to send.
        event: String,
    },

    /// A transport without subscribe/unsubscribe support was attached.
    #[error("transport '{connection_id}' does not support event binding")]
    BindingUnsupported {
        /// Connection id of the offending transport.
        connection_id: String,
    },

    /// An idle-timeout setting could not be parsed.
    #[error("unparsable idle-timeout value '{value}'")]
    MalformedTimeoutConfig {
        /// The raw configured value.
        value: String,
    },

    /// Startup wiring referenced an event name outside the declared table.
    #[error("unknown inbound event '{event}' in startup wiring")]
    UnknownWiringEvent {
        /// The undeclared event name.
        event: String,
    },
}
