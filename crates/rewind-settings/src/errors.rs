//! Settings error types.

use thiserror::Error;

/// Result alias for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Errors raised while loading or interpreting settings.
///
/// Callers of the loader treat every variant as "warn and fall back"; only
/// the binary decides whether a completely unreadable file is worth
/// surfacing to the user.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings file could not be read.
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid JSON, or did not match the schema.
    #[error("failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),

    /// Idle-timeout value did not match `<integer>[ms|s|m|h]` or `never`.
    #[error("unparsable idle-timeout value '{value}'")]
    MalformedTimeout {
        /// The raw configured value.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_timeout_display() {
        let err = SettingsError::MalformedTimeout {
            value: "soon".into(),
        };
        assert_eq!(err.to_string(), "unparsable idle-timeout value 'soon'");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: SettingsError = io.into();
        assert!(err.to_string().contains("gone"));
    }
}
