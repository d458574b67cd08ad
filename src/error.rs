//! Error types for provider gate operations.
//!
//! This module defines [`GateError`], the error type returned by every
//! fallible operation in the crate, and a [`Result`] type alias for
//! convenience.
//!
//! # Error Handling Strategy
//!
//! - Nothing is recovered internally; every failure goes back to the caller
//! - Each variant carries the offending string, provider name, or cause
//! - Use `anyhow::Error` (via `GateError::Other`) for unexpected errors

use std::time::Duration;
use thiserror::Error;

/// Core error type for provider gate operations.
#[derive(Debug, Error)]
pub enum GateError {
    /// The provider binary could not be started or exited unsuccessfully.
    #[error("Error getting current provider version for {provider}: {reason}, output: {stderr}")]
    ProcessFailed {
        provider: String,
        reason: String,
        stderr: String,
    },

    /// The provider's version output was not the expected JSON record.
    #[error("Error decoding version output of provider {provider}: {source}, output: {stderr}")]
    Decode {
        provider: String,
        stderr: String,
        #[source]
        source: serde_json::Error,
    },

    /// The caller cancelled the probe before the provider exited.
    #[error("Version probe for provider {provider} was cancelled")]
    Cancelled { provider: String },

    /// The probe deadline passed before the provider exited.
    #[error("Version probe for provider {provider} exceeded its deadline{}", format_timeout(.timeout))]
    DeadlineExceeded {
        provider: String,
        timeout: Option<Duration>,
    },

    /// A version string is not valid semver.
    #[error("{}version {version} is not a valid semver: {source}", format_provider(.provider))]
    InvalidSemver {
        version: String,
        provider: Option<String>,
        #[source]
        source: semver::Error,
    },

    /// A configuration pair is not in `provider=version` form.
    #[error("Min provider version not defined in expected format provider=version, got {entry:?}")]
    MalformedEntry { entry: String },

    /// The same provider was declared more than once.
    #[error("Duplicate versions defined for {provider} provider, versions: [{first}, {second}]")]
    DuplicateProvider {
        provider: String,
        first: String,
        second: String,
    },

    /// A configuration value could not be interpreted.
    #[error("Invalid configuration for {key}: {message}")]
    Config { key: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GateError {
    /// Whether this error means the probe was stopped by cancellation or deadline.
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            GateError::Cancelled { .. } | GateError::DeadlineExceeded { .. }
        )
    }
}

fn format_provider(provider: &Option<String>) -> String {
    match provider {
        Some(name) => format!("Minimum {} provider ", name),
        None => String::new(),
    }
}

fn format_timeout(timeout: &Option<Duration>) -> String {
    match timeout {
        Some(t) => format!(" of {:?}", t),
        None => String::new(),
    }
}

/// Result type alias for provider gate operations.
pub type Result<T> = std::result::Result<T, GateError>;
