//! Error types for `decorable`
//!
//! Wrapped methods keep their own error types: nothing in this module ever
//! replaces or wraps an error returned by a decorated method. The types here
//! cover decoration-time misconfiguration, configuration loading, and the
//! CLI.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `decorable` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, bad duration)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Decoration error (wrapper applied to a non-method target)
    pub const DECORATE_ERROR: i32 = 4;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `decorable` operations.
///
/// Aggregates the domain-specific errors and maps them to exit codes.
#[derive(Debug, Error)]
pub enum DecorableError {
    /// Wrapper misapplied at decoration time
    #[error(transparent)]
    Decorate(#[from] DecorateError),

    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization of an output record failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid command-line usage
    #[error("usage error: {0}")]
    Usage(String),
}

impl DecorableError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => ExitCode::CONFIG_ERROR,
            Self::Json(_) => ExitCode::ERROR,
            Self::Decorate(_) => ExitCode::DECORATE_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
            Self::Usage(_) => ExitCode::USAGE_ERROR,
        }
    }
}

// ============================================================================
// Decoration Errors
// ============================================================================

/// Errors raised when a wrapper is applied, before any invocation happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecorateError {
    /// The wrapper was applied to something other than a method of a type
    #[error("{decorator} supports only methods (got {target})")]
    UnsupportedTarget {
        /// Name of the wrapper (`"Loggable"`, `"Monitorable"`)
        decorator: &'static str,
        /// Description of the rejected target
        target: String,
    },

    /// A wrapper that schedules timers was built outside a tokio runtime
    #[error("{decorator} must be created inside a tokio runtime")]
    NoRuntime {
        /// Name of the wrapper
        decorator: &'static str,
    },
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("cannot read {path}: {source}")]
    Read {
        /// Path to the configuration file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing failed
    #[error("parse error in {origin}: {message}")]
    Parse {
        /// File path or `"<inline>"`
        origin: String,
        /// Error message from the parser
        message: String,
    },

    /// A duration string could not be parsed
    #[error("invalid duration for '{field}': got '{value}' ({message})")]
    InvalidDuration {
        /// Field or variable holding the duration
        field: String,
        /// The value provided
        value: String,
        /// Parser message
        message: String,
    },
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `decorable` operations.
pub type Result<T> = std::result::Result<T, DecorableError>;

// ============================================================================
// Tests
// ============================================================================
