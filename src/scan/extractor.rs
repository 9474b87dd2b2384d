//! Import statement extraction.
//!
//! Lines are matched by prefix only: a line must start with `import ` or
//! `from ` at column zero. Indented imports, multi-line parenthesised
//! imports and imports inside conditionals are not seen.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::error::{ImportScanError, Result};

/// Extract the top-level module identifiers imported by `source`.
///
/// For `import a.b.c` and `from a.b import c` this yields `a`.
pub fn extract_imports(source: &str) -> BTreeSet<String> {
    let mut found = BTreeSet::new();

    for line in source.lines() {
        if !(line.starts_with("import ") || line.starts_with("from ")) {
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if !tokens.contains(&"import") {
            continue;
        }

        let Some(target) = tokens.get(1) else {
            continue;
        };

        // Relative imports (`from . import x`) have nothing before the dot.
        let top_level = target.split('.').next().unwrap_or_default();
        if !top_level.is_empty() {
            found.insert(top_level.to_string());
        }
    }

    found
}

/// Read `path` and extract its imports.
pub fn read_imports(path: &Path) -> Result<BTreeSet<String>> {
    let source = fs::read_to_string(path).map_err(|source| ImportScanError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(extract_imports(&source))
}

/// Read `path` and extract its imports, logging read failures.
///
/// An unreadable or non-UTF-8 file yields an empty set.
pub fn find_imports(path: &Path) -> BTreeSet<String> {
    match read_imports(path) {
        Ok(found) => found,
        Err(e) => {
            tracing::error!("{}", e);
            BTreeSet::new()
        }
    }
}
