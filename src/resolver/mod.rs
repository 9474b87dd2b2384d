//! Module resolution.
//!
//! Answers "is this module importable here?" without importing it.
//! [`SearchPathResolver`] checks plain files against the search path that
//! [`InterpreterProbe`] reported. Whatever it cannot place (zip archives,
//! custom finders) goes to [`InterpreterResolver`], which asks the
//! interpreter's own finders in one batch per file.
//!
//! # Modules
//!
//! - [`interpreter`] - `importlib.util.find_spec` lookups, batched and cached
//! - [`probe`] - Asks the Python interpreter for `sys.path` and built-ins
//! - [`search_path`] - Filesystem lookup of modules and packages

use std::collections::BTreeSet;

pub mod interpreter;
pub mod probe;
pub mod search_path;

pub use interpreter::InterpreterResolver;
pub use probe::InterpreterProbe;
pub use search_path::SearchPathResolver;

/// Decides whether a module identifier is resolvable in the environment.
pub trait ModuleResolver {
    /// Whether `name` can be located by the module search mechanism.
    fn is_resolvable(&self, name: &str) -> bool;

    /// The subset of `names` that is not resolvable.
    ///
    /// Resolvers with a fixed cost per lookup override this to check all
    /// of a file's imports at once.
    fn unresolved(&self, names: BTreeSet<String>) -> BTreeSet<String> {
        names
            .into_iter()
            .filter(|name| !self.is_resolvable(name))
            .collect()
    }
}

impl<F> ModuleResolver for F
where
    F: Fn(&str) -> bool,
{
    fn is_resolvable(&self, name: &str) -> bool {
        self(name)
    }
}
