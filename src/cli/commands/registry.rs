//! Registry command implementation.
//!
//! The `provider-gate registry` command parses the minimum version string
//! and prints the resulting registry, sorted by provider.

use std::collections::BTreeMap;
use std::io::Write;

use crate::cli::args::RegistryArgs;
use crate::error::Result;
use crate::registry::MinVersionRegistry;

use super::dispatcher::{Command, CommandResult};

/// The registry command implementation.
pub struct RegistryCommand {
    args: RegistryArgs,
}

impl RegistryCommand {
    /// Create a new registry command.
    pub fn new(args: RegistryArgs) -> Self {
        Self { args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RegistryArgs {
        &self.args
    }
}

impl Command for RegistryCommand {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let registry = MinVersionRegistry::parse(&self.args.min_versions)?;
        let sorted: BTreeMap<&str, &str> = registry.iter().collect();

        if self.args.json {
            let json = serde_json::to_string_pretty(&sorted).map_err(anyhow::Error::from)?;
            writeln!(out, "{}", json)?;
            return Ok(CommandResult::success());
        }

        if sorted.is_empty() {
            writeln!(out, "No minimum provider versions configured")?;
        }
        for (provider, version) in sorted {
            writeln!(out, "{}={}", provider, version)?;
        }

        Ok(CommandResult::success())
    }
}
