//! Subprocess execution and platform detection.

pub mod command;
pub mod platform;

pub use command::{
    display_command, execute, execute_streaming, CommandOptions, CommandResult, OutputLine,
};
pub use platform::{default_python, is_ci};
