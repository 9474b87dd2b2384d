//! Scan result types.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::validate::ModuleName;

/// Unresolved imports found in a single source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileScan {
    /// Full path of the scanned file.
    pub path: PathBuf,

    /// File name without directories, as shown in progress output.
    pub file_name: String,

    /// Imported module identifiers that could not be resolved.
    pub unresolved: BTreeSet<String>,
}

impl FileScan {
    /// Create a result for `path`.
    pub fn new(path: &Path, unresolved: BTreeSet<String>) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            path: path.to_path_buf(),
            file_name,
            unresolved,
        }
    }

    /// Whether this file references anything missing.
    pub fn has_unresolved(&self) -> bool {
        !self.unresolved.is_empty()
    }
}

/// The outcome of scanning a directory tree, one entry per matching file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    files: Vec<FileScan>,
}

impl ScanResult {
    /// Build a result from per-file scans in walk order.
    pub fn new(files: Vec<FileScan>) -> Self {
        Self { files }
    }

    /// Per-file results in walk order.
    pub fn files(&self) -> &[FileScan] {
        &self.files
    }

    /// Number of files scanned.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// All unresolved identifiers in file order.
    ///
    /// The same identifier appears once per file that imports it.
    pub fn unresolved(&self) -> Vec<&str> {
        self.files
            .iter()
            .flat_map(|f| f.unresolved.iter().map(String::as_str))
            .collect()
    }

    /// Deduplicated unresolved identifiers that are valid to install.
    pub fn missing_modules(&self) -> BTreeSet<ModuleName> {
        self.unresolved()
            .into_iter()
            .filter_map(ModuleName::parse)
            .collect()
    }

    /// Unresolved identifiers that the validator rejected.
    pub fn skipped_names(&self) -> BTreeSet<&str> {
        self.unresolved()
            .into_iter()
            .filter(|name| ModuleName::parse(name).is_none())
            .collect()
    }

    /// Whether nothing unresolved was found.
    pub fn is_clean(&self) -> bool {
        self.files.iter().all(|f| !f.has_unresolved())
    }
}

impl From<Vec<FileScan>> for ScanResult {
    fn from(files: Vec<FileScan>) -> Self {
        Self::new(files)
    }
}
