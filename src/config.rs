//! Gate configuration from the environment.
//!
//! The hosting driver owns where these values come from. This module reads
//! the conventional environment variables and turns them into a registry
//! and a probe context.
//!
//! # Example
//!
//! ```
//! use provider_gate::config::{GateConfig, MIN_VERSIONS_VAR};
//! use std::env::VarError;
//!
//! let config = GateConfig::from_env_with(|key: &str| match key {
//!     MIN_VERSIONS_VAR => Ok("vault=1.0.0".to_string()),
//!     _ => Err(VarError::NotPresent),
//! })
//! .unwrap();
//! assert_eq!(config.registry().unwrap().get("vault"), Some("1.0.0"));
//! ```

use crate::error::{GateError, Result};
use crate::probe::ProbeContext;
use crate::registry::MinVersionRegistry;
use std::env::VarError;
use std::time::Duration;

/// Environment variable holding `provider=version` pairs.
pub const MIN_VERSIONS_VAR: &str = "PROVIDER_GATE_MIN_VERSIONS";

/// Environment variable holding the probe timeout in whole seconds.
pub const PROBE_TIMEOUT_VAR: &str = "PROVIDER_GATE_PROBE_TIMEOUT_SECS";

/// Probe timeout used when none is configured.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for gating provider binaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    /// Raw `provider=version[,...]` string.
    pub min_provider_versions: String,
    /// How long a single version probe may run.
    pub probe_timeout: Duration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_provider_versions: String::new(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

impl GateConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|key: &str| std::env::var(key))
    }

    /// Read configuration through a custom lookup function.
    ///
    /// This allows testing without modifying actual environment variables.
    pub fn from_env_with<F>(env_fn: F) -> Result<Self>
    where
        F: Fn(&str) -> std::result::Result<String, VarError>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(&env_fn, MIN_VERSIONS_VAR)? {
            config.min_provider_versions = value;
        }

        if let Some(value) = lookup(&env_fn, PROBE_TIMEOUT_VAR)? {
            config.probe_timeout = parse_timeout_secs(&value).map_err(|message| GateError::Config {
                key: PROBE_TIMEOUT_VAR.to_string(),
                message,
            })?;
        }

        Ok(config)
    }

    /// Build the minimum version registry.
    pub fn registry(&self) -> Result<MinVersionRegistry> {
        MinVersionRegistry::parse(&self.min_provider_versions)
    }

    /// A probe context bounded by the configured timeout, starting now.
    pub fn probe_context(&self) -> ProbeContext {
        ProbeContext::new().with_timeout(self.probe_timeout)
    }
}

/// Parse a positive whole number of seconds.
pub fn parse_timeout_secs(value: &str) -> std::result::Result<Duration, String> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err("timeout must be greater than zero".to_string()),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(_) => Err(format!("expected whole seconds, got {:?}", value)),
    }
}

fn lookup<F>(env_fn: &F, key: &str) -> Result<Option<String>>
where
    F: Fn(&str) -> std::result::Result<String, VarError>,
{
    match env_fn(key) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(GateError::Config {
            key: key.to_string(),
            message: "value is not valid unicode".to_string(),
        }),
    }
}
