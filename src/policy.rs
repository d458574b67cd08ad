//! Semantic version policy.
//!
//! Pure helpers that validate, normalize, and compare version strings.
//! Parsing itself is delegated to the [`semver`] crate; this module only
//! fixes the rules around it.
//!
//! # Example
//!
//! ```
//! use provider_gate::policy::{compare, normalize};
//! use std::cmp::Ordering;
//!
//! assert_eq!(normalize("v1.2.3"), "1.2.3");
//! assert_eq!(compare("1.2.3", "1.10.0").unwrap(), Ordering::Less);
//! ```

use crate::error::{GateError, Result};
use semver::Version;
use std::cmp::Ordering;

/// Strip a single leading `v` from a version string.
///
/// Providers commonly report `v1.2.3`; nothing else is rewritten.
pub fn normalize(version: &str) -> &str {
    version.strip_prefix('v').unwrap_or(version)
}

/// Parse a version string as semver.
pub fn parse(version: &str) -> Result<Version> {
    Version::parse(version).map_err(|source| GateError::InvalidSemver {
        version: version.to_string(),
        provider: None,
        source,
    })
}

/// Check that a version string is valid semver.
pub fn validate(version: &str) -> Result<()> {
    parse(version).map(|_| ())
}

/// Compare two version strings by semver precedence.
///
/// Build metadata does not take part in precedence, so `1.0.0+a` and
/// `1.0.0+b` compare equal.
pub fn compare(a: &str, b: &str) -> Result<Ordering> {
    let a = parse(a)?;
    let b = parse(b)?;
    Ok(cmp_precedence(&a, &b))
}

fn cmp_precedence(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch, &a.pre).cmp(&(b.major, b.minor, b.patch, &b.pre))
}

/// Whether `current` satisfies `minimum` after normalizing both.
pub fn meets_minimum(current: &str, minimum: &str) -> Result<bool> {
    let ordering = compare(normalize(current), normalize(minimum))?;
    Ok(ordering != Ordering::Less)
}
