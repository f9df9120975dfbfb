//! The idle-timeout duration grammar.
//!
//! Accepted forms: `<integer>` (milliseconds), `<integer>ms`, `<integer>s`,
//! `<integer>m`, `<integer>h` (units case-insensitive), or the literal
//! `never`. A value of zero and `never` both disable the watchdog and
//! normalize to [`IDLE_DISABLED_MS`].

use crate::errors::SettingsError;

/// Sentinel for a disabled idle timeout.
pub const IDLE_DISABLED_MS: i64 = -1;

/// Default idle timeout: 10 minutes.
pub const DEFAULT_IDLE_TIMEOUT_MS: i64 = 600_000;

/// Parse an idle-timeout string into milliseconds.
///
/// Returns [`IDLE_DISABLED_MS`] for `never` and for any value that works
/// out to zero. Negative and non-numeric values are malformed.
pub fn parse_idle_timeout(raw: &str) -> Result<i64, SettingsError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("never") {
        return Ok(IDLE_DISABLED_MS);
    }

    let lower = trimmed.to_ascii_lowercase();
    let (digits, multiplier) = if let Some(d) = lower.strip_suffix("ms") {
        (d, 1)
    } else if let Some(d) = lower.strip_suffix('s') {
        (d, 1000)
    } else if let Some(d) = lower.strip_suffix('m') {
        (d, 60_000)
    } else if let Some(d) = lower.strip_suffix('h') {
        (d, 3_600_000)
    } else {
        (lower.as_str(), 1)
    };

    let malformed = || SettingsError::MalformedTimeout {
        value: raw.to_string(),
    };

    let value: i64 = digits.trim().parse().map_err(|_| malformed())?;
    if value < 0 {
        return Err(malformed());
    }
    let ms = value.checked_mul(multiplier).ok_or_else(malformed)?;
    Ok(if ms == 0 { IDLE_DISABLED_MS } else { ms })
}
