//! Error handling for the bootstrapper
//!
//! Provides the crate's error type using thiserror. Every error maps to the
//! process exit status the binary reports, so a failing step's status
//! propagates unchanged to the caller.

use thiserror::Error;

/// Exit status for configuration errors (unknown flag, bad variant tag).
pub const EXIT_CONFIG: i32 = 1;
/// Shell convention for "command not found".
pub const EXIT_NOT_FOUND: i32 = 127;
/// Shell convention for "found but not executable".
pub const EXIT_NOT_EXECUTABLE: i32 = 126;

/// Main error type for the bootstrapper
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// Invalid or unknown configuration, detected before any side effect
    #[error("Configuration error: {0}")]
    Config(String),

    /// A step's child process exited unsuccessfully
    #[error("{step} failed (exit code {code})")]
    StepFailed { step: String, code: i32 },

    /// A step's child process could not be started at all
    #[error("{step} could not start `{program}`: {source}")]
    Spawn {
        step: String,
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The environment required by `--verify-only` is absent
    #[error("No virtual environment found at {0}")]
    MissingEnvironment(String),

    /// IO errors (path resolution, pipes)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The verification probe printed something that is not its JSON report
    #[error("Probe output error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for bootstrap operations
pub type Result<T> = std::result::Result<T, BootstrapError>;

impl BootstrapError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a step failure carrying the child's exit status
    pub fn step_failed(step: impl Into<String>, code: i32) -> Self {
        Self::StepFailed {
            step: step.into(),
            code,
        }
    }

    /// Process exit status to report for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => EXIT_CONFIG,
            Self::StepFailed { code, .. } => *code,
            Self::Spawn { source, .. } => match source.kind() {
                std::io::ErrorKind::NotFound => EXIT_NOT_FOUND,
                std::io::ErrorKind::PermissionDenied => EXIT_NOT_EXECUTABLE,
                _ => 1,
            },
            Self::MissingEnvironment(_) | Self::Io(_) | Self::Json(_) => 1,
        }
    }
}
