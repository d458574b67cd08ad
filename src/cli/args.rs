//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{parse_timeout_secs, MIN_VERSIONS_VAR, PROBE_TIMEOUT_VAR};

/// provider-gate - Check provider binaries against minimum versions.
#[derive(Debug, Parser)]
#[command(name = "provider-gate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Probe providers and compare them to their minimum versions
    Check(CheckArgs),

    /// Parse and show the minimum version registry
    Registry(RegistryArgs),
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Provider executables (name on PATH or path); the registry key is the file name
    #[arg(required = true, value_name = "PROVIDER")]
    pub providers: Vec<PathBuf>,

    /// Minimum versions as provider=version pairs, comma separated
    #[arg(long, env = MIN_VERSIONS_VAR, default_value = "", hide_default_value = true)]
    pub min_versions: String,

    /// Seconds to wait for each provider to report its version
    #[arg(long, env = PROBE_TIMEOUT_VAR, value_name = "SECS", default_value = "10", value_parser = parse_timeout_secs)]
    pub timeout: Duration,
}

/// Arguments for the `registry` command.
#[derive(Debug, Clone, Args)]
pub struct RegistryArgs {
    /// Minimum versions as provider=version pairs, comma separated
    #[arg(long, env = MIN_VERSIONS_VAR, default_value = "", hide_default_value = true)]
    pub min_versions: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_check_command() {
        let cli = Cli::parse_from([
            "provider-gate",
            "check",
            "vault",
            "/opt/providers/azure",
            "--min-versions",
            "vault=1.0.0",
            "--timeout",
            "3",
        ]);

        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.providers.len(), 2);
                assert_eq!(args.min_versions, "vault=1.0.0");
                assert_eq!(args.timeout, Duration::from_secs(3));
            }
            other => panic!("Expected Check command, got {other:?}"),
        }
    }

    #[test]
    fn check_requires_a_provider() {
        assert!(Cli::try_parse_from(["provider-gate", "check"]).is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        assert!(Cli::try_parse_from(["provider-gate", "check", "vault", "--timeout", "0"]).is_err());
    }

    #[test]
    fn parses_registry_command_with_global_debug() {
        let cli = Cli::parse_from(["provider-gate", "registry", "--json", "--debug"]);
        assert!(cli.debug);
        assert!(matches!(cli.command, Commands::Registry(ref args) if args.json));
    }
}
