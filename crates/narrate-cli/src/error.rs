//! CLI-specific error types and mappings.
//!
//! Maps narration and settings errors to exit codes and user-facing messages.

use narrate_core::{NarrationError, SettingsError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Narration pipeline error.
    #[error("{0}")]
    Narration(String),

    /// Argument or input file error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CliError {
    /// Map error to appropriate exit code (sysexits.h where one fits).
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Narration(_) => 1,
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
        }
    }
}

impl From<NarrationError> for CliError {
    fn from(err: NarrationError) -> Self {
        match err {
            NarrationError::Settings(settings_err) => Self::from(settings_err),
            NarrationError::Io(io_err) => Self::Io(io_err.to_string()),
            other => Self::Narration(other.to_string()),
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_errors_are_config_errors() {
        let err = CliError::from(NarrationError::from(SettingsError::InvalidVolume(3.0)));
        assert!(matches!(err, CliError::Config(_)));
        assert_eq!(err.exit_code(), 78);
    }

    #[test]
    fn test_driver_errors_exit_with_one() {
        let err = CliError::from(NarrationError::DriverStopped);
        assert_eq!(err.exit_code(), 1);
    }
}
