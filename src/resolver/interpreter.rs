//! Interpreter-backed module lookup.
//!
//! Some importable modules have no file of their own: members of zip
//! archives on `sys.path`, modules served by `.pth`-installed meta-path
//! hooks, frozen modules. Only the interpreter's finders know about them.
//! [`InterpreterResolver`] checks the filesystem first and sends whatever
//! is left to `importlib.util.find_spec`, one batch per call, caching
//! every answer. `find_spec` locates a top-level module without running
//! its code.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Mutex;

use crate::error::{ImportScanError, Result};
use crate::shell::{execute, CommandOptions};

use super::search_path::{is_lookup_name, SearchPathResolver};
use super::ModuleResolver;

/// `argv[1]` is a JSON list of directories appended to `sys.path`; the
/// remaining arguments are the names to look up. Prints the found names.
const FIND_SPEC_SCRIPT: &str = r#"import importlib.util, json, sys
sys.path[:] = [p for p in sys.path if p]
for p in json.loads(sys.argv[1]):
    if p not in sys.path:
        sys.path.append(p)
found = []
for name in sys.argv[2:]:
    try:
        if importlib.util.find_spec(name) is not None:
            found.append(name)
    except Exception:
        pass
print(json.dumps(found))
"#;

/// Resolves names on disk first, then through the interpreter's finders.
#[derive(Debug)]
pub struct InterpreterResolver {
    python: String,
    filesystem: SearchPathResolver,
    cache: Mutex<HashMap<String, bool>>,
}

impl InterpreterResolver {
    /// Create a resolver asking `python` about names `filesystem` cannot place.
    pub fn new(python: impl Into<String>, filesystem: SearchPathResolver) -> Self {
        Self {
            python: python.into(),
            filesystem,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// The interpreter consulted.
    pub fn python(&self) -> &str {
        &self.python
    }

    /// The filesystem resolver tried first.
    pub fn filesystem(&self) -> &SearchPathResolver {
        &self.filesystem
    }

    /// Ask the interpreter which of `names` its finders can locate.
    pub fn find_specs(&self, names: &[String]) -> Result<HashSet<String>> {
        let interpreter_error = |message: String| ImportScanError::Interpreter {
            python: self.python.clone(),
            message,
        };

        let extra_paths: Vec<String> = self
            .filesystem
            .search_paths()
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();

        let mut argv = vec![
            self.python.clone(),
            "-c".to_string(),
            FIND_SPEC_SCRIPT.to_string(),
            serde_json::to_string(&extra_paths)?,
        ];
        argv.extend(names.iter().cloned());

        let result = execute(&argv, &CommandOptions::default())
            .map_err(|e| interpreter_error(e.to_string()))?;

        if !result.success {
            return Err(interpreter_error(format!(
                "exited with code {:?}: {}",
                result.exit_code,
                result.stderr.trim()
            )));
        }

        let found: Vec<String> = serde_json::from_str(result.stdout.trim())
            .map_err(|e| interpreter_error(format!("unexpected find_spec output: {}", e)))?;

        Ok(found.into_iter().collect())
    }
}

impl ModuleResolver for InterpreterResolver {
    fn is_resolvable(&self, name: &str) -> bool {
        self.unresolved(BTreeSet::from([name.to_string()])).is_empty()
    }

    fn unresolved(&self, names: BTreeSet<String>) -> BTreeSet<String> {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        let mut missing = BTreeSet::new();
        let mut ask = Vec::new();

        for name in names {
            if !is_lookup_name(&name) {
                missing.insert(name);
            } else if self.filesystem.is_resolvable(&name) {
                continue;
            } else {
                match cache.get(&name) {
                    Some(true) => {}
                    Some(false) => {
                        missing.insert(name);
                    }
                    None => ask.push(name),
                }
            }
        }

        if ask.is_empty() {
            return missing;
        }

        match self.find_specs(&ask) {
            Ok(found) => {
                tracing::debug!(
                    "find_spec located {} of {} name(s) via {}",
                    found.len(),
                    ask.len(),
                    self.python
                );
                for name in ask {
                    let resolvable = found.contains(&name);
                    cache.insert(name.clone(), resolvable);
                    if !resolvable {
                        missing.insert(name);
                    }
                }
            }
            Err(e) => {
                tracing::warn!("{}; treating {} name(s) as unresolved", e, ask.len());
                missing.extend(ask);
            }
        }

        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::InterpreterProbe;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::process::Command;
    use tempfile::TempDir;

    fn names(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn python3_available() -> bool {
        Command::new("python3")
            .args(["-c", "pass"])
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn system_resolver() -> InterpreterResolver {
        let probe = InterpreterProbe::run("python3").unwrap();
        InterpreterResolver::new("python3", SearchPathResolver::from_probe(&probe))
    }

    /// Writes `<dir>/lib.zip` holding a single `zipmod.py`.
    fn build_zip(dir: &Path) -> PathBuf {
        let archive = dir.join("lib.zip");
        let status = Command::new("python3")
            .args([
                "-c",
                "import sys, zipfile\nwith zipfile.ZipFile(sys.argv[1], 'w') as z:\n    z.writestr('zipmod.py', 'X = 1\\n')",
            ])
            .arg(&archive)
            .status()
            .unwrap();
        assert!(status.success());
        archive
    }

    #[test]
    fn find_spec_script_only_locates() {
        assert!(FIND_SPEC_SCRIPT.starts_with("import importlib.util, json, sys\n"));
        assert!(FIND_SPEC_SCRIPT.contains("importlib.util.find_spec(name)"));
        assert!(!FIND_SPEC_SCRIPT.contains("import_module"));
    }

    #[test]
    fn filesystem_hits_skip_the_interpreter() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("local.py"), "").unwrap();
        let filesystem = SearchPathResolver::new(["sys".to_string()], vec![temp.path().into()]);
        let resolver = InterpreterResolver::new("importscan-no-such-python-xyz", filesystem);

        assert!(resolver.unresolved(names(&["local", "sys"])).is_empty());
    }

    #[test]
    fn invalid_names_never_reach_the_interpreter() {
        let resolver =
            InterpreterResolver::new("importscan-no-such-python-xyz", SearchPathResolver::default());

        assert_eq!(
            resolver.unresolved(names(&["a/b", ".."])),
            names(&["..", "a/b"])
        );
        assert!(resolver.cache.lock().unwrap().is_empty());
    }

    #[test]
    fn interpreter_failure_leaves_names_unresolved() {
        let resolver =
            InterpreterResolver::new("importscan-no-such-python-xyz", SearchPathResolver::default());

        assert!(!resolver.is_resolvable("zipmod"));
        assert!(resolver.cache.lock().unwrap().is_empty());
        assert!(matches!(
            resolver.find_specs(&["zipmod".to_string()]),
            Err(ImportScanError::Interpreter { .. })
        ));
    }

    #[cfg(unix)]
    mod fake_interpreter {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        /// Fake interpreter logging each call's names to `calls` and
        /// reporting every name starting with `found_`.
        fn fake_python(dir: &Path) -> PathBuf {
            let script = dir.join("fake-python");
            fs::write(
                &script,
                format!(
                    r#"#!/bin/sh
shift 3
echo "$*" >> "{}"
out=""
for name in "$@"; do
  case "$name" in
    found_*) out="$out${{out:+,}}\"$name\"" ;;
  esac
done
echo "[$out]"
"#,
                    dir.join("calls").display()
                ),
            )
            .unwrap();
            fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
            script
        }

        fn calls(dir: &Path) -> Vec<String> {
            fs::read_to_string(dir.join("calls"))
                .unwrap_or_default()
                .lines()
                .map(String::from)
                .collect()
        }

        #[test]
        fn remaining_names_go_in_one_batch() {
            let temp = TempDir::new().unwrap();
            let python = fake_python(temp.path());
            let resolver = InterpreterResolver::new(
                python.to_string_lossy(),
                SearchPathResolver::new(["os".to_string()], vec![]),
            );

            let missing = resolver.unresolved(names(&["os", "found_a", "found_b", "absent"]));

            assert_eq!(missing, names(&["absent"]));
            assert_eq!(calls(temp.path()), vec!["absent found_a found_b"]);
        }

        #[test]
        fn answers_are_cached() {
            let temp = TempDir::new().unwrap();
            let python = fake_python(temp.path());
            let resolver =
                InterpreterResolver::new(python.to_string_lossy(), SearchPathResolver::default());

            assert!(resolver.is_resolvable("found_a"));
            assert!(!resolver.is_resolvable("absent"));
            let missing = resolver.unresolved(names(&["found_a", "absent", "found_c"]));

            assert_eq!(missing, names(&["absent"]));
            assert_eq!(calls(temp.path()), vec!["found_a", "absent", "found_c"]);
        }
    }

    #[test]
    fn real_interpreter_resolves_stdlib() {
        if !python3_available() {
            return;
        }
        let resolver = system_resolver();

        assert!(resolver.is_resolvable("os"));
        assert!(resolver.is_resolvable("json"));
        assert!(!resolver.is_resolvable("nonexistent_pkg_xyz"));
    }

    #[test]
    fn real_interpreter_finds_modules_inside_zip_archives() {
        if !python3_available() {
            return;
        }
        let temp = TempDir::new().unwrap();
        let archive = build_zip(temp.path());

        let probe = InterpreterProbe::run("python3").unwrap();
        let filesystem = SearchPathResolver::from_probe(&probe).with_extra_paths([archive]);
        assert!(!filesystem.is_resolvable("zipmod"));

        let resolver = InterpreterResolver::new("python3", filesystem);
        assert!(resolver.is_resolvable("zipmod"));
        assert!(!resolver.is_resolvable("nonexistent_pkg_xyz"));
    }
}
