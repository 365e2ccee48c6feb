//! Semantic error types for boshtask.
//!
//! Conditions a caller might inspect are modelled as `thiserror` enums. The
//! binary converts them into `eyre::Report` at the application boundary.
//!
//! A nonzero exit code from the task process is not an error: it is an
//! observed result carried by [`crate::harness::ExecutionResult`].

use std::sync::Arc;
use std::time::Duration;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be parsed.
    #[error("failed to parse configuration file: {message}")]
    ParseError {
        /// A description of the parse error.
        message: String,
    },

    /// A required configuration value is missing.
    #[error("missing required configuration: {field}")]
    MissingRequired {
        /// The name of the missing field.
        field: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The `OrthoConfig` library returned an error during layer merging.
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

/// Errors that can occur while loading task definitions.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The task definition file does not exist.
    #[error("task definition not found: {path}")]
    NotFound {
        /// The path that was looked up.
        path: Utf8PathBuf,
    },

    /// The task definition file exists but could not be read.
    #[error("failed to read task definition '{path}': {message}")]
    ReadFailed {
        /// The path of the definition.
        path: Utf8PathBuf,
        /// A description of the I/O failure.
        message: String,
    },

    /// The task definition is not a valid document.
    #[error("failed to parse task definition '{path}': {message}")]
    ParseFailed {
        /// The path of the definition.
        path: Utf8PathBuf,
        /// A description of the parse failure.
        message: String,
    },

    /// No task with the requested name exists in the catalog.
    #[error("unknown task '{name}' in {dir}")]
    UnknownTask {
        /// The requested task name.
        name: String,
        /// The catalog directory that was searched.
        dir: Utf8PathBuf,
    },
}

/// Setup failures raised while running a resolved invocation.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// The container runtime could not be started.
    #[error("failed to spawn container runtime '{program}': {message}")]
    SpawnFailed {
        /// The program that was spawned.
        program: String,
        /// A description of the spawn failure.
        message: String,
    },

    /// The child did not exit within the configured timeout.
    #[error("container invocation timed out after {timeout:?}")]
    Timeout {
        /// The timeout that elapsed.
        timeout: Duration,
    },

    /// Output from the child could not be collected.
    #[error("failed to capture container output: {message}")]
    OutputCaptureFailed {
        /// A description of the capture failure.
        message: String,
    },

    /// The child terminated without reporting an exit code (e.g. by signal).
    #[error("container runtime '{program}' terminated without an exit code")]
    Terminated {
        /// The program that was spawned.
        program: String,
    },
}

/// Top-level error type for boshtask.
#[derive(Debug, Error)]
pub enum BoshTaskError {
    /// An error occurred during configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred loading a task definition.
    #[error(transparent)]
    Task(#[from] TaskError),

    /// An error occurred running the container.
    #[error(transparent)]
    Container(#[from] ContainerError),
}

/// A specialised `Result` type for boshtask operations.
pub type Result<T> = std::result::Result<T, BoshTaskError>;
