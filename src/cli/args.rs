//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::config::{EnvironmentSettings, InstallSettings, ScanSettings};
use crate::error::Result;
use crate::scan::DEFAULT_SUFFIX;
use crate::shell::default_python;

/// Importscan - find missing Python imports and install them.
#[derive(Debug, Parser)]
#[command(name = "importscan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory for imports that cannot be resolved
    Scan(ScanArgs),

    /// Install modules with the package manager
    Install(InstallArgs),

    /// Scan a directory, then install what is missing
    Run(RunArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Python interpreter selection.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct PythonArgs {
    /// Python interpreter to inspect and install for
    #[arg(long, env = "IMPORTSCAN_PYTHON", value_name = "PYTHON")]
    pub python: Option<String>,
}

impl PythonArgs {
    /// The interpreter to use, falling back to the platform default.
    pub fn interpreter(&self) -> String {
        self.python
            .clone()
            .unwrap_or_else(|| default_python().to_string())
    }
}

/// Options shared by commands that scan.
#[derive(Debug, Clone, clap::Args)]
pub struct ScanOptions {
    /// Directory to scan
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Source file suffix to scan
    #[arg(long, default_value = DEFAULT_SUFFIX)]
    pub suffix: String,

    /// Extra directory to resolve modules from (repeatable)
    #[arg(long = "search-path", value_name = "DIR")]
    pub search_paths: Vec<PathBuf>,
}

impl ScanOptions {
    /// Gather scan settings for the given interpreter.
    pub fn settings(&self, python: &PythonArgs) -> ScanSettings {
        ScanSettings {
            root: self.dir.clone(),
            suffix: self.suffix.clone(),
            environment: EnvironmentSettings {
                python: python.interpreter(),
                extra_search_paths: self.search_paths.clone(),
            },
        }
    }
}

/// Where and how modules are installed.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InstallTargetArgs {
    /// Directory the package manager runs in
    #[arg(long, env = "IMPORTSCAN_INSTALL_DIR", value_name = "DIR")]
    pub install_dir: Option<PathBuf>,

    /// Package manager command line (default: `<python> -m pip`)
    #[arg(long, env = "IMPORTSCAN_PACKAGE_MANAGER", value_name = "COMMAND")]
    pub package_manager: Option<String>,
}

impl InstallTargetArgs {
    /// Validate the install target for the given interpreter.
    pub fn settings(&self, python: &PythonArgs) -> Result<InstallSettings> {
        InstallSettings::resolve(
            self.install_dir.as_deref(),
            self.package_manager.as_deref(),
            &python.interpreter(),
        )
    }
}

/// Arguments for the `scan` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ScanArgs {
    #[command(flatten)]
    pub scan: ScanOptions,

    #[command(flatten)]
    pub python: PythonArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `install` command.
#[derive(Debug, Clone, clap::Args)]
pub struct InstallArgs {
    /// Modules to install
    #[arg(required = true, value_name = "MODULE")]
    pub modules: Vec<String>,

    #[command(flatten)]
    pub target: InstallTargetArgs,

    #[command(flatten)]
    pub python: PythonArgs,

    /// Preview commands without executing
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, clap::Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub scan: ScanOptions,

    #[command(flatten)]
    pub target: InstallTargetArgs,

    #[command(flatten)]
    pub python: PythonArgs,

    /// Install every missing module without prompting
    #[arg(short, long)]
    pub yes: bool,

    /// Preview commands without executing
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
