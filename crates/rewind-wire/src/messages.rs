//! Message-id constants and the bootstrap whitelist.

/// Handshake: sent once the host process is ready to serve a client.
pub const SESSION_STARTED: &str = "session-started";
/// Handshake: initial session description (pid, version, trace summary).
pub const SESSION_INIT: &str = "session-init";
/// Startup mode: the host was launched as an interactive shell recorder.
pub const START_SHELL_MODE: &str = "start-shell-mode";
/// Startup mode: the host was launched against a recorded trace.
pub const START_ALT_MODE: &str = "start-alt-mode";
/// No trace is loaded; the client should show its empty state.
pub const NO_ACTIVE_TRACE: &str = "no-active-trace";
/// The client should show the welcome screen.
pub const WELCOME_SCREEN: &str = "welcome-screen";
/// Derived state: trace metadata finished loading.
pub const TRACE_LOADED: &str = "trace-loaded";
/// Derived state: the trace's file list finished loading.
pub const FILENAMES_LOADED: &str = "filenames-loaded";
/// Derived state: the recorded filesystem snapshot finished loading.
pub const FILESYSTEM_LOADED: &str = "filesystem-loaded";
/// Derived state: debug symbols finished loading.
pub const SYMBOLS_LOADED: &str = "symbols-loaded";

/// Notice sent to a transport that is being dropped (superseded or idle).
pub const CONNECTION_DISCONNECTED: &str = "connection-disconnected";
/// First frame on every new connection, carrying the connection id.
pub const CONNECTION_WELCOME: &str = "connection-welcome";

/// Handshake-class ids that must replay before anything else, in this order.
pub const BOOTSTRAP_PRIORITY: [&str; 6] = [
    SESSION_STARTED,
    SESSION_INIT,
    START_SHELL_MODE,
    START_ALT_MODE,
    NO_ACTIVE_TRACE,
    WELCOME_SCREEN,
];

/// Every id the bootstrap cache records. Ids outside this list are
/// delivered at most once and never replayed.
pub const BOOTSTRAP_WHITELIST: [&str; 10] = [
    SESSION_STARTED,
    SESSION_INIT,
    START_SHELL_MODE,
    START_ALT_MODE,
    NO_ACTIVE_TRACE,
    WELCOME_SCREEN,
    TRACE_LOADED,
    FILENAMES_LOADED,
    FILESYSTEM_LOADED,
    SYMBOLS_LOADED,
];

/// Inbound: the client asks the host to load a recorded trace.
pub const LOAD_TRACE: &str = "load-trace";
/// Inbound: single step in the current direction.
pub const STEP: &str = "step";
/// Inbound: continue forward to the next stop point.
pub const CONTINUE_FORWARD: &str = "continue-forward";
/// Inbound: continue backward to the previous stop point.
pub const CONTINUE_REVERSE: &str = "continue-reverse";
/// Inbound: add a breakpoint.
pub const ADD_BREAKPOINT: &str = "add-breakpoint";
/// Inbound: remove a breakpoint.
pub const REMOVE_BREAKPOINT: &str = "remove-breakpoint";
/// Inbound: jump to the traced program's entry point.
pub const RUN_TO_ENTRY: &str = "run-to-entry";
/// Inbound: load a page of the recorded event log.
pub const LOAD_EVENTS: &str = "load-events";
/// Inbound: load a page of the recorded call trace.
pub const LOAD_CALLTRACE: &str = "load-calltrace";
/// Inbound: liveness-only message; carries no payload and triggers nothing.
pub const KEEPALIVE: &str = "keepalive";

/// The declared inbound event table. Startup wiring validates every
/// registration against this list so a misspelled event name fails at boot
/// instead of silently never firing.
pub const INBOUND_EVENTS: [&str; 10] = [
    LOAD_TRACE,
    STEP,
    CONTINUE_FORWARD,
    CONTINUE_REVERSE,
    ADD_BREAKPOINT,
    REMOVE_BREAKPOINT,
    RUN_TO_ENTRY,
    LOAD_EVENTS,
    LOAD_CALLTRACE,
    KEEPALIVE,
];

/// Whether `id` belongs to the bootstrap whitelist.
pub fn is_bootstrap(id: &str) -> bool {
    BOOTSTRAP_WHITELIST.contains(&id)
}

/// Position of `id` in the replay priority order, if it has one.
pub fn priority_rank(id: &str) -> Option<usize> {
    BOOTSTRAP_PRIORITY.iter().position(|p| *p == id)
}

/// Whether `event` is in the declared inbound table.
pub fn is_inbound_event(event: &str) -> bool {
    INBOUND_EVENTS.contains(&event)
}
