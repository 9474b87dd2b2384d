//! Runtime configuration.
//!
//! Settings are assembled from command-line flags with environment
//! variable fallbacks and validated before any work starts.
//!
//! # Example
//!
//! ```
//! use importscan::config::InstallSettings;
//! use tempfile::TempDir;
//!
//! let temp = TempDir::new().unwrap();
//! let settings = InstallSettings::resolve(Some(temp.path()), Some("uv pip"), "python3").unwrap();
//! assert_eq!(settings.package_manager.program(), "uv");
//! ```

pub mod settings;

pub use settings::{
    EnvironmentSettings, InstallSettings, ScanSettings, INSTALL_DIR_ENV, PACKAGE_MANAGER_ENV,
    PYTHON_ENV,
};
