//! Idle watchdog: decides when an abandoned host should exit.

use std::sync::Arc;
use std::time::Duration;

use rewind_core::ProcessExit;
use rewind_wire::messages::CONNECTION_DISCONNECTED;
use rewind_wire::notice::DisconnectNotice;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::context::SessionContext;
use crate::emit::EmitFacade;

/// Poll interval for a configured timeout, in milliseconds.
///
/// `-1` (any negative timeout) means disabled. Otherwise polls at half the
/// timeout, floored at 1s to avoid busy-looping on tiny timeouts and capped
/// at 5s so very large timeouts still get timely checks.
pub fn idle_check_interval(timeout_ms: i64) -> i64 {
    if timeout_ms < 0 {
        return -1;
    }
    (timeout_ms / 2).clamp(1000, 5000)
}

/// Whether the process has been abandoned.
///
/// Attached: no inbound activity for `timeout_ms`. Detached: no connection
/// for `timeout_ms`. A negative timeout disables the check entirely.
pub fn should_exit_idle(
    attached: bool,
    last_connection_ms: u64,
    last_activity_ms: u64,
    now_ms: u64,
    timeout_ms: i64,
) -> bool {
    if timeout_ms < 0 {
        return false;
    }
    #[allow(clippy::cast_sign_loss)]
    let timeout = timeout_ms as u64;
    if attached {
        now_ms.saturating_sub(last_activity_ms) >= timeout
    } else {
        now_ms.saturating_sub(last_connection_ms) >= timeout
    }
}

/// Run the idle watchdog until it fires or is cancelled.
///
/// Started exactly once at process boot. The timer is never rescheduled;
/// correctness rests solely on re-evaluating the timestamp comparison each
/// tick, which leaves no cancel/reschedule races to get wrong.
///
/// On a positive decision: best-effort `connection-disconnected` notice to
/// the active transport if one exists, then `exit(0)`. An idle timeout is
/// an expected lifecycle outcome, not a failure.
pub async fn run_idle_watchdog(
    ctx: Arc<SessionContext>,
    emit: EmitFacade,
    timeout_ms: i64,
    exit: Arc<dyn ProcessExit>,
    cancel: CancellationToken,
) {
    let interval_ms = idle_check_interval(timeout_ms);
    if interval_ms < 0 {
        info!("idle watchdog disabled");
        return;
    }
    #[allow(clippy::cast_sign_loss)]
    let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms as u64));
    // The immediate first tick would fire before any client had a chance.
    let _ = ticker.tick().await;

    debug!(timeout_ms, interval_ms, "idle watchdog running");
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let snap = ctx.state().snapshot();
                let now = ctx.now_ms();
                if should_exit_idle(
                    snap.attached,
                    snap.last_connection_ms,
                    snap.last_activity_ms,
                    now,
                    timeout_ms,
                ) {
                    emit.emit(
                        CONNECTION_DISCONNECTED,
                        &DisconnectNotice::idle_timeout().to_payload(),
                    );
                    info!(
                        attached = snap.attached,
                        timeout_ms,
                        "idle timeout reached, exiting"
                    );
                    exit.exit(0);
                    return;
                }
            }
            () = cancel.cancelled() => {
                debug!("idle watchdog cancelled");
                return;
            }
        }
    }
}
