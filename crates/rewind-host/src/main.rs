//! # rewind-host
//!
//! Rewind debugger host binary — loads settings, wires the session layer,
//! seeds the bootstrap cache, starts the idle watchdog and serves the
//! WebSocket shell until Ctrl-C.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use rewind_core::{RealProcessExit, SystemClock};
use rewind_server::{HostServer, ServerConfig, StubBackendLink, wire_session};
use rewind_session::{EmitFacade, SessionContext, SessionManager, run_idle_watchdog};
use rewind_settings::{
    HostSettings, StartupMode, load_settings, load_settings_from_path, parse_idle_timeout,
};
use rewind_wire::messages::{
    NO_ACTIVE_TRACE, SESSION_INIT, SESSION_STARTED, START_ALT_MODE, START_SHELL_MODE,
};

/// Rewind debugger host.
#[derive(Parser, Debug)]
#[command(name = "rewind-host", about = "Rewind debugger host process")]
struct Cli {
    /// Host to bind.
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (0 auto-assigns).
    #[arg(long)]
    port: Option<u16>,

    /// Idle timeout, e.g. `30s`, `10m`, `600000`, or `never`.
    #[arg(long)]
    idle_timeout: Option<String>,

    /// Alternate settings file path.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Log file (stderr when omitted).
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Startup mode seeded for the client: `shell` or `alt`.
    #[arg(long)]
    startup_mode: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // An explicitly requested settings file must load; the default path is
    // best-effort.
    let mut settings = match &cli.settings {
        Some(path) => load_settings_from_path(path)
            .with_context(|| format!("cannot load settings from {}", path.display()))?,
        None => load_settings().unwrap_or_else(|err| {
            eprintln!("warning: ignoring unreadable settings file: {err}");
            HostSettings::default()
        }),
    };
    let log_file = cli.log_file.clone().or(settings.log.file.clone());
    rewind_logging::init(&settings.log.filter, log_file.as_deref())
        .map_err(|err| anyhow::anyhow!("logging init failed: {err}"))?;

    apply_cli_overrides(&mut settings, &cli)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        idle_timeout = %settings.session.idle_timeout,
        "rewind host starting"
    );

    let ctx = SessionContext::new(Arc::new(SystemClock::new()));
    let emit = EmitFacade::new(ctx.clone());
    let session = Arc::new(SessionManager::new(ctx.clone()));

    // The backend supervisor lives outside this process shell; events are
    // forwarded into a stub until one is attached.
    wire_session(&ctx, Arc::new(StubBackendLink)).context("startup wiring failed")?;

    seed_bootstrap(&emit, &settings);

    let cancel = CancellationToken::new();
    let watchdog = tokio::spawn(run_idle_watchdog(
        ctx.clone(),
        emit.clone(),
        settings.session.idle_timeout_ms(),
        Arc::new(RealProcessExit),
        cancel.clone(),
    ));

    let metrics = rewind_server::metrics::install_recorder();
    let config = ServerConfig {
        host: settings.server.host.clone(),
        port: settings.server.port,
        ..ServerConfig::default()
    };
    let server = HostServer::new(config, session, metrics);
    let (addr, serve) = server
        .listen_with_shutdown(cancel.clone())
        .await
        .context("failed to bind server address")?;
    info!(%addr, "rewind host listening");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    info!("shutting down");
    cancel.cancel();
    let _ = watchdog.await;
    let _ = serve.await;
    Ok(())
}

/// Fold CLI flags over the loaded settings.
fn apply_cli_overrides(settings: &mut HostSettings, cli: &Cli) -> Result<()> {
    if let Some(host) = &cli.host {
        settings.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        settings.server.port = port;
    }
    if let Some(timeout) = &cli.idle_timeout {
        // A malformed value falls back to the configured one; timeouts are
        // never worth refusing to start over.
        if parse_idle_timeout(timeout).is_ok() {
            settings.session.idle_timeout = timeout.clone();
        } else {
            warn!(value = %timeout, "ignoring malformed --idle-timeout");
        }
    }
    if let Some(mode) = &cli.startup_mode {
        settings.session.startup_mode = match mode.as_str() {
            "shell" => StartupMode::Shell,
            "alt" => StartupMode::Alt,
            other => anyhow::bail!("unknown startup mode '{other}' (expected shell or alt)"),
        };
    }
    Ok(())
}

/// Seed the handshake messages so the very first client and every
/// reconnecting client traverse the same bootstrap replay path.
fn seed_bootstrap(emit: &EmitFacade, settings: &HostSettings) {
    emit.emit(SESSION_STARTED, &json!({ "pid": std::process::id() }));
    emit.emit(
        SESSION_INIT,
        &json!({
            "version": env!("CARGO_PKG_VERSION"),
            "startupMode": settings.session.startup_mode,
        }),
    );
    let mode_message = match settings.session.startup_mode {
        StartupMode::Shell => START_SHELL_MODE,
        StartupMode::Alt => START_ALT_MODE,
    };
    emit.emit(mode_message, &json!({}));
    emit.emit(NO_ACTIVE_TRACE, &json!({}));
}
