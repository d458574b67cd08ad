//! Self-reported provider versions.

use super::command;
use super::context::ProbeContext;
use crate::error::{GateError, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::Path;

/// Argument asking a provider to print its version record.
pub const VERSION_FLAG: &str = "--version";

/// Version record a provider prints in response to `--version`.
///
/// Unknown fields are ignored and missing fields default to empty strings,
/// so a record without `version` decodes to an empty version that later
/// fails semver validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderVersionInfo {
    /// Current provider version.
    pub version: String,
    /// Date the provider binary was built.
    pub build_date: String,
    /// Minimum driver version the provider works with.
    pub min_driver_version: String,
}

/// Run `<executable> --version` and decode the full version record.
pub fn get_version_info<S: AsRef<OsStr>>(
    executable: S,
    ctx: &ProbeContext,
) -> Result<ProviderVersionInfo> {
    let executable = executable.as_ref();
    let provider = Path::new(executable).display().to_string();

    let output = command::run(&provider, executable, &[VERSION_FLAG], ctx)?;
    if !output.success() {
        return Err(GateError::ProcessFailed {
            provider,
            reason: output.status.to_string(),
            stderr: output.stderr,
        });
    }

    let info: ProviderVersionInfo =
        serde_json::from_slice(&output.stdout).map_err(|source| GateError::Decode {
            provider: provider.clone(),
            stderr: output.stderr.clone(),
            source,
        })?;

    tracing::debug!(
        "provider: {}, version {}, build date: {}",
        provider,
        info.version,
        info.build_date
    );
    Ok(info)
}

/// Run `<executable> --version` and return the reported version string.
pub fn get_version<S: AsRef<OsStr>>(executable: S, ctx: &ProbeContext) -> Result<String> {
    get_version_info(executable, ctx).map(|info| info.version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_camel_case_record() {
        let info: ProviderVersionInfo = serde_json::from_str(
            r#"{"version":"v0.4.0","buildDate":"2024-01-02-15:04","minDriverVersion":"v1.1.0"}"#,
        )
        .unwrap();
        assert_eq!(info.version, "v0.4.0");
        assert_eq!(info.build_date, "2024-01-02-15:04");
        assert_eq!(info.min_driver_version, "v1.1.0");
    }

    #[test]
    fn ignores_unknown_fields_and_defaults_missing_ones() {
        let info: ProviderVersionInfo =
            serde_json::from_str(r#"{"buildDate":"today","extra":42}"#).unwrap();
        assert_eq!(info.version, "");
        assert_eq!(info.build_date, "today");
    }

    #[test]
    fn rejects_non_object_output() {
        assert!(serde_json::from_str::<ProviderVersionInfo>("v1.0.0").is_err());
        assert!(serde_json::from_str::<ProviderVersionInfo>("").is_err());
    }

    #[cfg(unix)]
    mod process {
        use super::super::*;
        use crate::probe::context::CancelToken;
        use crate::test_support::provider_script;
        use std::time::{Duration, Instant};
        use tempfile::TempDir;

        #[test]
        fn returns_reported_version() {
            let temp = TempDir::new().unwrap();
            let exe = provider_script(
                &temp,
                "vault",
                r#"echo '{"version":"v1.2.3","buildDate":"2024-05-01"}'"#,
            );

            assert_eq!(get_version(&exe, &ProbeContext::new()).unwrap(), "v1.2.3");
        }

        #[test]
        fn passes_version_flag() {
            let temp = TempDir::new().unwrap();
            let exe = provider_script(
                &temp,
                "echoer",
                r#"[ "$1" = "--version" ] || exit 9
echo '{"version":"0.1.0"}'"#,
            );

            assert_eq!(get_version(&exe, &ProbeContext::new()).unwrap(), "0.1.0");
        }

        #[test]
        fn non_zero_exit_carries_stderr() {
            let temp = TempDir::new().unwrap();
            let exe = provider_script(&temp, "broken", "echo 'unknown flag: --version' >&2\nexit 2");

            let err = get_version(&exe, &ProbeContext::new()).unwrap_err();
            match err {
                GateError::ProcessFailed { stderr, .. } => {
                    assert!(stderr.contains("unknown flag: --version"));
                }
                other => panic!("Expected ProcessFailed, got {other:?}"),
            }
        }

        #[test]
        fn non_json_output_is_decode_error_with_stderr() {
            let temp = TempDir::new().unwrap();
            let exe = provider_script(
                &temp,
                "plain",
                "echo 'legacy output mode' >&2\necho 'provider v1.0.0'",
            );

            let err = get_version(&exe, &ProbeContext::new()).unwrap_err();
            match err {
                GateError::Decode { stderr, .. } => assert!(stderr.contains("legacy output mode")),
                other => panic!("Expected Decode, got {other:?}"),
            }
        }

        #[test]
        fn full_record_is_available() {
            let temp = TempDir::new().unwrap();
            let exe = provider_script(
                &temp,
                "azure",
                r#"echo '{"version":"0.4.0","buildDate":"2024-05-01","minDriverVersion":"v1.1.0"}'"#,
            );

            let info = get_version_info(&exe, &ProbeContext::new()).unwrap();
            assert_eq!(info.min_driver_version, "v1.1.0");
        }

        #[test]
        fn deadline_fails_promptly() {
            let temp = TempDir::new().unwrap();
            let exe = provider_script(&temp, "slow", "exec sleep 30");
            let ctx = ProbeContext::new().with_timeout(Duration::from_millis(150));

            let start = Instant::now();
            let err = get_version(&exe, &ctx).unwrap_err();
            assert!(err.is_cancellation());
            assert!(start.elapsed() < Duration::from_secs(5));
        }

        #[test]
        fn cancelled_context_fails() {
            let temp = TempDir::new().unwrap();
            let exe = provider_script(&temp, "slow", "exec sleep 30");
            let token = CancelToken::new();
            token.cancel();

            let err = get_version(&exe, &ProbeContext::new().with_cancel_token(token)).unwrap_err();
            assert!(matches!(err, GateError::Cancelled { .. }));
        }
    }
}
