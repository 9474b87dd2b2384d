//! Resolved runtime settings.
//!
//! Values come from command-line flags, falling back to environment
//! variables (see the `*_ENV` constants). There is no configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ImportScanError, Result};
use crate::install::{Installer, PackageManager};
use crate::resolver::{InterpreterProbe, InterpreterResolver, SearchPathResolver};
use crate::scan::{Scanner, DEFAULT_SUFFIX};
use crate::shell::default_python;

/// Interpreter used for probing and for the default package manager.
pub const PYTHON_ENV: &str = "IMPORTSCAN_PYTHON";

/// Directory package manager commands run in.
pub const INSTALL_DIR_ENV: &str = "IMPORTSCAN_INSTALL_DIR";

/// Package manager command line.
pub const PACKAGE_MANAGER_ENV: &str = "IMPORTSCAN_PACKAGE_MANAGER";

/// Which Python environment imports are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentSettings {
    /// Interpreter to probe.
    pub python: String,

    /// Directories searched after the interpreter's own search path.
    pub extra_search_paths: Vec<PathBuf>,
}

impl Default for EnvironmentSettings {
    fn default() -> Self {
        Self {
            python: default_python().to_string(),
            extra_search_paths: Vec::new(),
        }
    }
}

impl EnvironmentSettings {
    /// Probe the interpreter and build a resolver for it.
    ///
    /// Files on the probed search path are checked directly; the
    /// interpreter's finders answer for the rest.
    pub fn resolver(&self) -> Result<InterpreterResolver> {
        let probe = InterpreterProbe::run(&self.python)?;
        let filesystem = SearchPathResolver::from_probe(&probe)
            .with_extra_paths(self.extra_search_paths.iter().cloned());
        Ok(InterpreterResolver::new(self.python.clone(), filesystem))
    }
}

/// Settings for one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSettings {
    /// Directory tree to scan.
    pub root: PathBuf,

    /// Recognized source file suffix.
    pub suffix: String,

    /// Environment imports are resolved against.
    pub environment: EnvironmentSettings,
}

impl ScanSettings {
    /// Settings scanning `root` for `.py` files against the default interpreter.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            suffix: DEFAULT_SUFFIX.to_string(),
            environment: EnvironmentSettings::default(),
        }
    }

    /// Probe the environment and build the scanner.
    pub fn scanner(&self) -> Result<Scanner<InterpreterResolver>> {
        let resolver = self.environment.resolver()?;
        Ok(Scanner::new(resolver).with_suffix(self.suffix.clone()))
    }
}

/// Settings for installing modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallSettings {
    /// Existing directory the package manager runs in.
    pub install_dir: PathBuf,

    /// Package manager invocation.
    pub package_manager: PackageManager,
}

impl InstallSettings {
    /// Validate install configuration.
    ///
    /// The install directory is required and must exist. Without an
    /// explicit package manager, `<python> -m pip` is used.
    pub fn resolve(
        install_dir: Option<&Path>,
        package_manager: Option<&str>,
        python: &str,
    ) -> Result<Self> {
        let install_dir = install_dir.ok_or(ImportScanError::InstallDirMissing)?;

        let is_dir = fs::metadata(install_dir)
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return Err(ImportScanError::InstallDirInvalid {
                path: install_dir.to_path_buf(),
            });
        }

        let package_manager = match package_manager {
            Some(line) => PackageManager::from_command_line(line)?,
            None => PackageManager::pip(python),
        };

        Ok(Self {
            install_dir: install_dir.to_path_buf(),
            package_manager,
        })
    }

    /// Build the installer.
    pub fn installer(&self) -> Installer {
        Installer::new(self.package_manager.clone(), self.install_dir.clone())
    }
}
