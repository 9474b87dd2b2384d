//! Package manager command lines.

use crate::error::{ImportScanError, Result};
use crate::validate::ModuleName;

/// The program used to install modules, plus any leading arguments.
///
/// The install command for a module is `program base_args... install <module>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManager {
    program: String,
    base_args: Vec<String>,
}

impl PackageManager {
    /// Create a package manager from a program and leading arguments.
    pub fn new(program: impl Into<String>, base_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            base_args,
        }
    }

    /// `pip` run through `python`, so installs land in that interpreter.
    pub fn pip(python: &str) -> Self {
        Self::new(python, vec!["-m".to_string(), "pip".to_string()])
    }

    /// Parse a whitespace-separated command line such as `uv pip`.
    pub fn from_command_line(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(ImportScanError::EmptyPackageManager)?;
        Ok(Self::new(program, parts.collect()))
    }

    /// The executable.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Argument list that installs `module`.
    pub fn install_command(&self, module: &ModuleName) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.base_args.len() + 3);
        argv.push(self.program.clone());
        argv.extend(self.base_args.iter().cloned());
        argv.push("install".to_string());
        argv.push(module.to_string());
        argv
    }
}
