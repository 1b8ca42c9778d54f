//! Error types for easyenv operations.
//!
//! Two layers of errors exist:
//!
//! - [`ResolutionError`] describes why a single configuration key (or the
//!   environment bootstrap) could not be resolved. It is `Clone` because a
//!   failed outcome is cached and handed to every caller that asks for the
//!   key afterwards.
//! - [`EasyEnvError`] is the crate-wide error used by configuration loading,
//!   snapshot persistence and the CLI. Resolution failures convert into it
//!   transparently.

use std::path::PathBuf;
use thiserror::Error;

/// Why a configuration key could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// The key was never declared in the resolution map.
    #[error("Env resolution not defined for '{key}'")]
    UnknownKey { key: String },

    /// The key is declared, but has neither a value for the active
    /// environment nor a `default` value.
    #[error("Resolution string not found for '{key}' for env '{env}'. Default not found either.")]
    MissingEnvironmentValue { key: String, env: String },

    /// The injected variable resolver rejected a deferred marker.
    #[error("Unable to resolve '{source_spec}': {message}")]
    UpstreamLookupFailure {
        source_spec: String,
        message: String,
    },

    /// The environment name could not be inferred from its source.
    #[error("Could not infer env name from source '{source_spec}': {message}")]
    EnvironmentBootstrapFailure {
        source_spec: String,
        message: String,
    },

    /// The task computing a key ended without producing an outcome.
    #[error("Resolution of '{key}' was aborted: {message}")]
    ComputationAborted { key: String, message: String },
}

impl ResolutionError {
    /// Short machine-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownKey { .. } => "unknown-key",
            Self::MissingEnvironmentValue { .. } => "missing-environment-value",
            Self::UpstreamLookupFailure { .. } => "upstream-lookup-failure",
            Self::EnvironmentBootstrapFailure { .. } => "environment-bootstrap-failure",
            Self::ComputationAborted { .. } => "computation-aborted",
        }
    }
}

/// Core error type for easyenv operations.
#[derive(Debug, Error)]
pub enum EasyEnvError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// An environment matcher pattern is not a valid regular expression.
    #[error("Invalid env matcher pattern '{pattern}': {message}")]
    InvalidMatcher { pattern: String, message: String },

    /// Snapshot could not be rendered or written.
    #[error("Failed to write snapshot to {path}: {message}")]
    Snapshot { path: PathBuf, message: String },

    /// A key or the environment could not be resolved.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EasyEnvError {
    /// Process exit code: 2 for configuration problems, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ConfigNotFound { .. }
            | Self::ConfigParseError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidMatcher { .. } => 2,
            _ => 1,
        }
    }
}

/// Result type alias for easyenv operations.
pub type Result<T> = std::result::Result<T, EasyEnvError>;
