//! Command-line interface for provider-gate.
//!
//! A thin diagnostic surface over the library: probe provider binaries and
//! inspect the minimum version registry from a shell.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{CheckArgs, Cli, Commands, RegistryArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
