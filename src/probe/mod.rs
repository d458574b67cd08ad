//! Version probing of provider binaries.
//!
//! A provider reports its own version when run with `--version`, printing a
//! JSON record on stdout. Probing runs the binary under a [`ProbeContext`]
//! so a hung provider is killed once the deadline passes or the caller
//! cancels.
//!
//! # Modules
//!
//! - [`context`] - Deadlines and cancellation tokens
//! - [`command`] - Bounded process execution with separate stream capture
//! - [`version`] - The version record and the `--version` probe

pub mod command;
pub mod context;
pub mod version;

pub use command::CommandOutput;
pub use context::{CancelToken, ProbeContext};
pub use version::{get_version, get_version_info, ProviderVersionInfo, VERSION_FLAG};
