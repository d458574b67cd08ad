//! Minimum provider version registry.
//!
//! The hosting driver receives minimum provider versions as a single
//! comma-separated string (`vault=1.2.3,azure=0.4.0`). [`MinVersionRegistry`]
//! parses that string once at startup and is read-only afterwards, so it can
//! be shared across threads for concurrent lookups.
//!
//! # Example
//!
//! ```
//! use provider_gate::registry::MinVersionRegistry;
//!
//! let registry = MinVersionRegistry::parse(" vault = 1.0.0 , azure=2.1.3").unwrap();
//! assert_eq!(registry.get("vault"), Some("1.0.0"));
//! assert_eq!(registry.get("gcp"), None);
//! ```

use crate::error::{GateError, Result};
use crate::policy;
use std::collections::hash_map::{Entry, HashMap};
use std::str::FromStr;

/// Read-only mapping from provider name to minimum supported version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MinVersionRegistry {
    versions: HashMap<String, String>,
}

impl MinVersionRegistry {
    /// Parse a `provider=version[,provider=version...]` string.
    ///
    /// Empty or whitespace-only input gives an empty registry. Pairs are
    /// checked in input order and the first violation aborts the build.
    pub fn parse(input: &str) -> Result<Self> {
        let mut versions = HashMap::new();

        if input.trim().is_empty() {
            return Ok(Self { versions });
        }

        for pair in input.split(',') {
            let (provider, version) = split_pair(pair.trim())?;

            match versions.entry(provider.to_string()) {
                Entry::Occupied(existing) => {
                    return Err(GateError::DuplicateProvider {
                        provider: provider.to_string(),
                        first: existing.get().clone(),
                        second: version.to_string(),
                    });
                }
                Entry::Vacant(slot) => {
                    policy::validate(version).map_err(|err| with_provider(err, provider))?;
                    slot.insert(version.to_string());
                }
            }
        }

        tracing::debug!("Minimum supported provider versions: {:?}", versions);
        Ok(Self { versions })
    }

    /// Minimum version declared for a provider.
    pub fn get(&self, provider: &str) -> Option<&str> {
        self.versions.get(provider).map(String::as_str)
    }

    /// Whether a minimum is declared for a provider.
    pub fn contains(&self, provider: &str) -> bool {
        self.versions.contains_key(provider)
    }

    /// Iterate over `(provider, minimum version)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.versions
            .iter()
            .map(|(provider, version)| (provider.as_str(), version.as_str()))
    }

    /// Number of providers with a declared minimum.
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Whether no minimums are declared.
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.versions
    }

    /// Consume the registry, returning the underlying map.
    pub fn into_map(self) -> HashMap<String, String> {
        self.versions
    }
}

impl FromStr for MinVersionRegistry {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Build the provider to minimum version map from a configuration string.
pub fn build_registry(input: &str) -> Result<HashMap<String, String>> {
    MinVersionRegistry::parse(input).map(MinVersionRegistry::into_map)
}

/// Split one trimmed pair into its trimmed provider and version tokens.
fn split_pair(pair: &str) -> Result<(&str, &str)> {
    let malformed = || GateError::MalformedEntry {
        entry: pair.to_string(),
    };

    let mut parts = pair.split('=');
    let (Some(provider), Some(version), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(malformed());
    };

    let provider = provider.trim();
    let version = version.trim();
    if provider.is_empty() || version.is_empty() {
        return Err(malformed());
    }

    Ok((provider, version))
}

fn with_provider(err: GateError, name: &str) -> GateError {
    match err {
        GateError::InvalidSemver {
            version, source, ..
        } => GateError::InvalidSemver {
            version,
            provider: Some(name.to_string()),
            source,
        },
        other => other,
    }
}
