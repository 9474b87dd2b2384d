//! Module installation through an external package manager.
//!
//! # Modules
//!
//! - [`package_manager`] - Builds install command lines
//! - [`installer`] - Runs installs one at a time and records outcomes

pub mod installer;
pub mod package_manager;

pub use installer::{InstallOutcome, InstallProgress, Installer};
pub use package_manager::PackageManager;
