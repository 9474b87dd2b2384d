//! Filesystem module lookup.
//!
//! Mirrors the path-based finder of the interpreter for top-level names:
//! source modules, bytecode-only modules, regular packages, namespace
//! packages and compiled extension modules. Nothing is executed.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::probe::InterpreterProbe;
use super::ModuleResolver;

/// Resolves module names against built-ins and a list of search paths.
#[derive(Debug, Clone, Default)]
pub struct SearchPathResolver {
    builtins: HashSet<String>,
    search_paths: Vec<PathBuf>,
}

impl SearchPathResolver {
    /// Create a resolver from built-in names and search paths.
    pub fn new(builtins: impl IntoIterator<Item = String>, search_paths: Vec<PathBuf>) -> Self {
        Self {
            builtins: builtins.into_iter().collect(),
            search_paths,
        }
    }

    /// Create a resolver from an interpreter probe.
    pub fn from_probe(probe: &InterpreterProbe) -> Self {
        Self::new(probe.builtins.iter().cloned(), probe.path.clone())
    }

    /// Append extra directories searched after the existing ones.
    pub fn with_extra_paths(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.search_paths.extend(paths);
        self
    }

    /// The directories consulted, in order.
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Return the location that satisfies `name`, if any.
    ///
    /// Built-in modules have no location and return the empty path.
    pub fn locate(&self, name: &str) -> Option<PathBuf> {
        if !is_lookup_name(name) {
            return None;
        }

        if self.builtins.contains(name) {
            return Some(PathBuf::new());
        }

        self.search_paths
            .iter()
            .filter(|root| root.is_dir())
            .find_map(|root| locate_in(root, name))
    }
}

impl ModuleResolver for SearchPathResolver {
    fn is_resolvable(&self, name: &str) -> bool {
        let found = self.locate(name);
        tracing::trace!("resolve {} -> {:?}", name, found);
        found.is_some()
    }
}

/// Whether `name` can name a top-level module at all.
///
/// Empty names and anything that would address another directory are
/// never resolvable.
pub(crate) fn is_lookup_name(name: &str) -> bool {
    !(name.is_empty() || name.contains(['/', '\\']) || name == "." || name == "..")
}

fn locate_in(root: &Path, name: &str) -> Option<PathBuf> {
    let package_init = root.join(name).join("__init__.py");
    if package_init.is_file() {
        return Some(package_init);
    }

    for candidate in [format!("{name}.py"), format!("{name}.pyc")] {
        let path = root.join(candidate);
        if path.is_file() {
            return Some(path);
        }
    }

    let extension = find_extension_module(root, name);
    if extension.is_some() {
        return extension;
    }

    // Any directory on the path is a namespace package portion.
    let namespace = root.join(name);
    namespace.is_dir().then_some(namespace)
}

/// Find `name.so`, `name.pyd` or a tagged variant like
/// `name.cpython-312-x86_64-linux-gnu.so`.
fn find_extension_module(root: &Path, name: &str) -> Option<PathBuf> {
    let entries = fs::read_dir(root).ok()?;
    let prefix = format!("{name}.");

    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .find(|path| {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                return false;
            };
            file_name.starts_with(&prefix)
                && (file_name.ends_with(".so") || file_name.ends_with(".pyd"))
                && path.is_file()
        })
}
