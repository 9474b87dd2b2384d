//! Importscan - find missing Python imports and install them.
//!
//! Importscan walks a source tree, pulls module names out of `import` and
//! `from ... import` lines, checks each against a Python interpreter's
//! module search path, and installs the ones that cannot be found with a
//! package manager, one at a time.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Settings from flags and environment variables
//! - [`error`] - Error types and result aliases
//! - [`install`] - Package manager invocation
//! - [`resolver`] - Deciding whether a module can be imported
//! - [`scan`] - Import extraction and directory scanning
//! - [`shell`] - Subprocess execution
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//! - [`validate`] - Module name validation
//!
//! # Example
//!
//! ```
//! use importscan::scan::Scanner;
//! use std::fs;
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join("a.py"), "import os\nimport nonexistent_pkg_xyz\n").unwrap();
//!
//! let scanner = Scanner::new(|name: &str| name == "os");
//! let result = scanner.scan(temp.path(), |_| {}).unwrap();
//! assert_eq!(result.unresolved(), vec!["nonexistent_pkg_xyz"]);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod install;
pub mod resolver;
pub mod scan;
pub mod shell;
pub mod ui;
pub mod validate;

pub use error::{ImportScanError, Result};
