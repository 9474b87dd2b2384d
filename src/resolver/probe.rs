//! Interpreter probe.
//!
//! Runs the configured Python interpreter once to learn where it looks
//! for modules. The snippet imports only `sys` and `json`, so no
//! third-party or project code is executed.
//!
//! # Example
//!
//! ```no_run
//! use importscan::resolver::{InterpreterProbe, ModuleResolver, SearchPathResolver};
//!
//! let probe = InterpreterProbe::run("python3").unwrap();
//! let resolver = SearchPathResolver::from_probe(&probe);
//! assert!(resolver.is_resolvable("os"));
//! ```

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{ImportScanError, Result};
use crate::shell::{execute, CommandOptions};

const PROBE_SCRIPT: &str = "import json, sys; print(json.dumps({\
'executable': sys.executable, \
'version': '%d.%d.%d' % sys.version_info[:3], \
'path': sys.path, \
'builtins': list(sys.builtin_module_names)}))";

/// What the interpreter reported about its module search mechanism.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InterpreterProbe {
    /// Absolute path of the interpreter binary.
    #[serde(default)]
    pub executable: String,

    /// Interpreter version, e.g. `3.12.1`.
    #[serde(default)]
    pub version: String,

    /// `sys.path` without empty entries.
    pub path: Vec<PathBuf>,

    /// Modules compiled into the interpreter.
    #[serde(default)]
    pub builtins: Vec<String>,
}

impl InterpreterProbe {
    /// Probe `python` for its search path and built-in modules.
    pub fn run(python: &str) -> Result<Self> {
        let argv = vec![
            python.to_string(),
            "-c".to_string(),
            PROBE_SCRIPT.to_string(),
        ];

        let result = execute(&argv, &CommandOptions::default()).map_err(|e| {
            ImportScanError::Interpreter {
                python: python.to_string(),
                message: e.to_string(),
            }
        })?;

        if !result.success {
            return Err(ImportScanError::Interpreter {
                python: python.to_string(),
                message: format!(
                    "exited with code {:?}: {}",
                    result.exit_code,
                    result.stderr.trim()
                ),
            });
        }

        let probe = Self::parse(&result.stdout).map_err(|e| ImportScanError::Interpreter {
            python: python.to_string(),
            message: format!("unexpected probe output: {}", e),
        })?;

        tracing::debug!(
            "Probed {} ({}): {} search paths, {} built-ins",
            probe.executable,
            probe.version,
            probe.path.len(),
            probe.builtins.len()
        );

        Ok(probe)
    }

    /// Parse the JSON printed by the probe snippet.
    ///
    /// The empty `sys.path` entry stands for the probe's own working
    /// directory and is dropped.
    pub fn parse(output: &str) -> std::result::Result<Self, serde_json::Error> {
        let mut probe: Self = serde_json::from_str(output.trim())?;
        probe.path.retain(|p| !p.as_os_str().is_empty());
        Ok(probe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_probe_output() {
        let output = r#"{"executable": "/usr/bin/python3", "version": "3.12.1",
            "path": ["", "/usr/lib/python312.zip", "/usr/lib/python3.12", "/usr/lib/python3/dist-packages"],
            "builtins": ["sys", "builtins", "_thread"]}
"#;
        let probe = InterpreterProbe::parse(output).unwrap();

        assert_eq!(probe.executable, "/usr/bin/python3");
        assert_eq!(probe.version, "3.12.1");
        assert_eq!(probe.path.len(), 3);
        assert_eq!(probe.path[0], PathBuf::from("/usr/lib/python312.zip"));
        assert!(probe.builtins.contains(&"sys".to_string()));
    }

    #[test]
    fn parse_tolerates_missing_optional_fields() {
        let probe = InterpreterProbe::parse(r#"{"path": ["/opt/lib"]}"#).unwrap();
        assert!(probe.builtins.is_empty());
        assert_eq!(probe.path, vec![PathBuf::from("/opt/lib")]);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(InterpreterProbe::parse("Python 3.12.1").is_err());
    }

    #[test]
    fn missing_interpreter_is_reported() {
        let err = InterpreterProbe::run("importscan-no-such-python-xyz").unwrap_err();
        match err {
            ImportScanError::Interpreter { python, .. } => {
                assert_eq!(python, "importscan-no-such-python-xyz");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn real_interpreter_reports_search_path() {
        let available = std::process::Command::new("python3")
            .args(["-c", "pass"])
            .status()
            .map(|s| s.success())
            .unwrap_or(false);
        if !available {
            return;
        }

        let probe = InterpreterProbe::run("python3").unwrap();

        assert!(probe.version.starts_with('3'));
        assert!(!probe.path.is_empty());
        assert!(probe.path.iter().all(|p| !p.as_os_str().is_empty()));
        assert!(probe.builtins.iter().any(|b| b == "sys"));
    }

    #[test]
    fn probe_script_imports_only_stdlib() {
        assert!(PROBE_SCRIPT.starts_with("import json, sys;"));
        assert_eq!(PROBE_SCRIPT.matches("import").count(), 1);
    }
}
