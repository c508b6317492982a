//! Error types for date formats and settings.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from compiling a date format pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The pattern is empty or only whitespace.
    #[error("Date format cannot be empty")]
    Empty,

    /// A `[` escape is never closed.
    #[error("Unterminated '[' at position {position} in format '{pattern}'")]
    UnterminatedLiteral { pattern: String, position: usize },
}

/// Errors from loading or saving settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// No platform config directory is available.
    #[error("No config directory")]
    NoConfigDir,

    /// Reading or writing the settings file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for the settings schema.
    #[error("Invalid settings file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Settings could not be serialized.
    #[error("Failed to serialize settings: {message}")]
    Serialize { message: String },
}

impl SettingsError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_message() {
        let err = FormatError::UnterminatedLiteral {
            pattern: "YYYY-[W".to_string(),
            position: 5,
        };
        assert!(err.to_string().contains("position 5"));
    }

    #[test]
    fn test_settings_error_io() {
        let err = SettingsError::io(
            "/test/settings.toml",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, SettingsError::Io { .. }));
        assert!(err.to_string().contains("/test/settings.toml"));
    }
}
