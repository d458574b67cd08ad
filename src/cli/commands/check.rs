//! Check command implementation.
//!
//! The `provider-gate check` command probes each provider binary and
//! compares its reported version against the configured minimum.

use std::io::Write;
use std::path::Path;

use crate::cli::args::CheckArgs;
use crate::compat::CompatibilityChecker;
use crate::config::GateConfig;
use crate::error::Result;

use super::dispatcher::{Command, CommandResult};

/// The check command implementation.
pub struct CheckCommand {
    args: CheckArgs,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(args: CheckArgs) -> Self {
        Self { args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &CheckArgs {
        &self.args
    }

    fn config(&self) -> GateConfig {
        GateConfig {
            min_provider_versions: self.args.min_versions.clone(),
            probe_timeout: self.args.timeout,
        }
    }
}

/// Registry key for a provider executable: its file name.
fn provider_name(executable: &Path) -> String {
    executable
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| executable.display().to_string())
}

impl Command for CheckCommand {
    fn execute(&self, out: &mut dyn Write) -> Result<CommandResult> {
        let config = self.config();
        let registry = config.registry()?;
        let checker = CompatibilityChecker::new(&registry);

        let mut failures = 0;
        for executable in &self.args.providers {
            let name = provider_name(executable);
            match checker.check(&config.probe_context(), &name, executable) {
                Ok(status) => {
                    if !status.is_usable() {
                        failures += 1;
                    }
                    writeln!(out, "{}: {}", name, status)?;
                }
                Err(e) => {
                    failures += 1;
                    tracing::debug!("Check failed for {}: {:?}", name, e);
                    writeln!(out, "{}: error: {}", name, e)?;
                }
            }
        }

        if failures > 0 {
            Ok(CommandResult::failure(1))
        } else {
            Ok(CommandResult::success())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    fn command(providers: &[&str], min_versions: &str) -> CheckCommand {
        CheckCommand::new(CheckArgs {
            providers: providers.iter().map(PathBuf::from).collect(),
            min_versions: min_versions.to_string(),
            timeout: Duration::from_secs(5),
        })
    }

    #[test]
    fn provider_name_uses_file_name() {
        assert_eq!(provider_name(Path::new("/opt/providers/vault")), "vault");
        assert_eq!(provider_name(Path::new("azure")), "azure");
    }

    #[test]
    fn providers_without_minimum_pass_without_probing() {
        let mut out = Vec::new();
        let result = command(&["/nonexistent/gcp"], "vault=1.0.0")
            .execute(&mut out)
            .unwrap();

        assert!(result.success);
        assert_eq!(String::from_utf8(out).unwrap(), "gcp: no minimum version configured\n");
    }

    #[test]
    fn probe_errors_fail_the_command() {
        let mut out = Vec::new();
        let result = command(&["/nonexistent/vault"], "vault=1.0.0")
            .execute(&mut out)
            .unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(String::from_utf8(out).unwrap().starts_with("vault: error:"));
    }

    #[test]
    fn malformed_registry_is_an_error() {
        let mut out = Vec::new();
        assert!(command(&["vault"], "vault").execute(&mut out).is_err());
    }
}
