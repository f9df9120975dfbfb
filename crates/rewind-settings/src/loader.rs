//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`HostSettings::default()`]
//! 2. If `~/.rewind/settings.json` exists, deep-merge user values over defaults
//! 3. Apply `REWIND_*` environment overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::duration::parse_idle_timeout;
use crate::errors::Result;
use crate::types::HostSettings;

/// Resolve the path to the settings file.
///
/// `REWIND_SETTINGS` overrides the default `~/.rewind/settings.json`.
pub fn settings_path() -> PathBuf {
    if let Ok(path) = std::env::var("REWIND_SETTINGS") {
        return PathBuf::from(path);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".rewind").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<HostSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<HostSettings> {
    let defaults = serde_json::to_value(HostSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: HostSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `REWIND_*` environment overrides to loaded settings.
///
/// Invalid values warn and are ignored (fall back to file/default); the
/// environment can never make the host refuse to start.
pub fn apply_env_overrides(settings: &mut HostSettings) {
    if let Some(v) = read_env_string("REWIND_HOST") {
        settings.server.host = v;
    }
    if let Some(v) = read_env_u16("REWIND_PORT") {
        settings.server.port = v;
    }
    if let Some(v) = read_env_string("REWIND_IDLE_TIMEOUT") {
        if parse_idle_timeout(&v).is_ok() {
            settings.session.idle_timeout = v;
        } else {
            warn!(value = %v, "invalid REWIND_IDLE_TIMEOUT, ignoring");
        }
    }
    if let Some(v) = read_env_string("REWIND_LOG") {
        settings.log.filter = v;
    }
}

// ── Env var readers (thin wrappers over pure parsing) ───────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_u16(name: &str) -> Option<u16> {
    let val = std::env::var(name).ok()?;
    let result = val.parse().ok();
    if result.is_none() {
        warn!(key = name, value = %val, "invalid port env var, ignoring");
    }
    result
}
