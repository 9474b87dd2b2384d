//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations (`importscan scan`,
//! `importscan install`, `importscan run`).

pub mod completions;
pub mod dispatcher;
pub mod display;
pub mod install;
pub mod run;
pub mod scan;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
