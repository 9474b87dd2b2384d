//! Error types for importscan operations.
//!
//! This module defines [`ImportScanError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Per-file and per-module failures (`FileRead`, `InstallFailed`,
//!   `CommandSpawn`) are contained where they happen: the scanner logs them
//!   and the installer records them as failed outcomes
//! - Environment failures (`RootUnreadable`, `Interpreter`, install
//!   directory problems) are returned before any work starts
//! - Use `anyhow::Error` (via `ImportScanError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for importscan operations.
#[derive(Debug, Error)]
pub enum ImportScanError {
    /// A source file could not be read or was not valid UTF-8.
    #[error("Error reading file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The scan root does not exist or cannot be listed.
    #[error("Cannot scan {path}: {message}")]
    RootUnreadable { path: PathBuf, message: String },

    /// The Python interpreter could not be probed for its search path.
    #[error("Cannot inspect Python interpreter '{python}': {message}")]
    Interpreter { python: String, message: String },

    /// No install directory was configured.
    #[error("No install directory configured. Pass --install-dir or set IMPORTSCAN_INSTALL_DIR")]
    InstallDirMissing,

    /// The configured install directory is not a usable directory.
    #[error("Install directory is not a directory: {path}")]
    InstallDirInvalid { path: PathBuf },

    /// The package manager command line is empty.
    #[error("Package manager command is empty")]
    EmptyPackageManager,

    /// A name rejected by the module name validator.
    #[error("Invalid module name: '{name}'")]
    InvalidModuleName { name: String },

    /// The package manager could not be started.
    #[error("Failed to run '{command}': {message}")]
    CommandSpawn { command: String, message: String },

    /// The package manager exited with a non-zero status.
    #[error("Failed to install {module} (exit code {code:?})")]
    InstallFailed { module: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for importscan operations.
pub type Result<T> = std::result::Result<T, ImportScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_read_displays_path_and_cause() {
        let err = ImportScanError::FileRead {
            path: PathBuf::from("/src/a.py"),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, "stream did not contain valid UTF-8"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/src/a.py"));
        assert!(msg.contains("valid UTF-8"));
    }

    #[test]
    fn root_unreadable_displays_path_and_message() {
        let err = ImportScanError::RootUnreadable {
            path: PathBuf::from("/nope"),
            message: "No such file or directory".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/nope"));
        assert!(msg.contains("No such file"));
    }

    #[test]
    fn interpreter_error_displays_python() {
        let err = ImportScanError::Interpreter {
            python: "python3.99".into(),
            message: "not found".into(),
        };
        assert!(err.to_string().contains("python3.99"));
    }

    #[test]
    fn install_dir_missing_mentions_flag_and_env() {
        let msg = ImportScanError::InstallDirMissing.to_string();
        assert!(msg.contains("--install-dir"));
        assert!(msg.contains("IMPORTSCAN_INSTALL_DIR"));
    }

    #[test]
    fn invalid_module_name_displays_name() {
        let err = ImportScanError::InvalidModuleName {
            name: "_private".into(),
        };
        assert!(err.to_string().contains("_private"));
    }

    #[test]
    fn install_failed_displays_module_and_code() {
        let err = ImportScanError::InstallFailed {
            module: "bad_pkg".into(),
            code: Some(1),
        };
        let msg = err.to_string();
        assert!(msg.contains("bad_pkg"));
        assert!(msg.contains("1"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: ImportScanError = io_err.into();
        assert!(matches!(err, ImportScanError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(ImportScanError::InstallDirMissing)
        }
        assert!(returns_error().is_err());
    }
}
