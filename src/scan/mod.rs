//! Source tree scanning.
//!
//! # Modules
//!
//! - [`extractor`] - Heuristic import extraction from a single file
//! - [`result`] - Per-file and whole-tree result types
//! - [`scanner`] - Directory walking, resolution and progress reporting

pub mod extractor;
pub mod result;
pub mod scanner;

pub use extractor::{extract_imports, find_imports, read_imports};
pub use result::{FileScan, ScanResult};
pub use scanner::{spawn_scan, ScanEvent, ScanHandle, ScanIter, Scanner, DEFAULT_SUFFIX};
