//! # rewind-settings
//!
//! Configuration management for the rewind host.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults** — [`HostSettings::default()`]
//! 2. **User file** — `~/.rewind/settings.json` (deep-merged over defaults)
//! 3. **Environment variables** — `REWIND_*` overrides (highest priority)
//!
//! The loaded value is constructed once at boot and threaded through the
//! host explicitly; there is no global settings singleton.

#![deny(unsafe_code)]

pub mod duration;
pub mod errors;
pub mod loader;
pub mod types;

pub use duration::{DEFAULT_IDLE_TIMEOUT_MS, IDLE_DISABLED_MS, parse_idle_timeout};
pub use errors::{Result, SettingsError};
pub use loader::{apply_env_overrides, deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::{HostSettings, LogSettings, ServerSettings, SessionSettings, StartupMode};
