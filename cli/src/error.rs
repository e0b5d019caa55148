//! Command error types for CLI output
//!
//! Errors serialize to `{"code": "...", "message": "..."}` for `--json` output.

use serde::Serialize;

use ebp_core::{ConfigError, ExportError, SelectionError, SubmitError};

/// Errors returned by CLI commands
///
/// Each variant serializes with a snake_case `code` field.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum CommandError {
    // Selection errors
    EmptyBatch { message: String },
    InvalidSelection { message: String, files: Vec<String> },

    // Configuration errors
    ConfigError { message: String },

    // Operation errors
    BatchInProgress { message: String },
    ReadError { message: String },
    ExtractionError { message: String },
    ExportError { message: String },
    InternalError { message: String },
}

impl CommandError {
    pub fn read(message: impl Into<String>) -> Self {
        Self::ReadError {
            message: message.into(),
        }
    }

    pub fn extraction(message: impl Into<String>) -> Self {
        Self::ExtractionError {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::EmptyBatch { message }
            | Self::InvalidSelection { message, .. }
            | Self::ConfigError { message }
            | Self::BatchInProgress { message }
            | Self::ReadError { message }
            | Self::ExtractionError { message }
            | Self::ExportError { message }
            | Self::InternalError { message } => message,
        }
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for CommandError {}

impl From<SelectionError> for CommandError {
    fn from(err: SelectionError) -> Self {
        let message = err.to_string();
        match err {
            SelectionError::EmptyBatch => Self::EmptyBatch { message },
            SelectionError::InvalidSelection { files } => {
                Self::InvalidSelection { message, files }
            }
        }
    }
}

impl From<SubmitError> for CommandError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Selection(e) => e.into(),
            SubmitError::BatchInProgress => Self::BatchInProgress {
                message: err.to_string(),
            },
        }
    }
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        Self::ConfigError {
            message: err.to_string(),
        }
    }
}

impl From<ExportError> for CommandError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Config(e) => e.into(),
            other => Self::ExportError {
                message: other.to_string(),
            },
        }
    }
}

// Conversion from anyhow::Error (used by ebp-core)
impl From<anyhow::Error> for CommandError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(format!("{:#}", err))
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        Self::read(err.to_string())
    }
}

/// Result type alias for commands
pub type CommandResult<T> = Result<T, CommandError>;

/// Extension trait for converting Results to CommandResult
pub trait ResultExt<T> {
    fn read_err(self) -> CommandResult<T>;
    fn internal_err(self) -> CommandResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn read_err(self) -> CommandResult<T> {
        self.map_err(|e| CommandError::read(e.to_string()))
    }

    fn internal_err(self) -> CommandResult<T> {
        self.map_err(|e| CommandError::internal(e.to_string()))
    }
}
