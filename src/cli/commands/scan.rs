//! The `importscan scan` command.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;

use crate::cli::args::ScanArgs;
use crate::config::ScanSettings;
use crate::error::Result;
use crate::scan::{spawn_scan, FileScan, ScanResult};
use crate::ui::UserInterface;
use crate::validate::ModuleName;

use super::dispatcher::{Command, CommandResult};
use super::display;

/// Machine-readable scan output for `--json`.
#[derive(Debug, Serialize)]
pub struct ScanReport<'a> {
    /// Directory that was scanned.
    pub root: &'a Path,

    /// Per-file results in walk order.
    pub files: &'a [FileScan],

    /// Deduplicated names that can be installed.
    pub missing_modules: BTreeSet<ModuleName>,

    /// Unresolved names rejected by the validator.
    pub skipped: BTreeSet<&'a str>,
}

impl<'a> ScanReport<'a> {
    /// Build the report for `result`.
    pub fn new(root: &'a Path, result: &'a ScanResult) -> Self {
        Self {
            root,
            files: result.files(),
            missing_modules: result.missing_modules(),
            skipped: result.skipped_names(),
        }
    }
}

/// Probe the interpreter, then scan on a background worker while
/// reporting files as they arrive.
pub fn scan_directory(
    ui: &mut dyn UserInterface,
    settings: &ScanSettings,
    show_progress: bool,
) -> Result<ScanResult> {
    let scanner = settings.scanner()?;
    let handle = spawn_scan(scanner, settings.root.clone());
    handle.wait_with(|file| {
        if show_progress {
            display::show_file_scan(ui, file);
        }
    })
}

/// The scan command implementation.
pub struct ScanCommand {
    args: ScanArgs,
}

impl ScanCommand {
    /// Create a new scan command.
    pub fn new(args: ScanArgs) -> Self {
        Self { args }
    }
}

impl Command for ScanCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let settings = self.args.scan.settings(&self.args.python);

        if self.args.json {
            let result = scan_directory(ui, &settings, false)?;
            let report = ScanReport::new(&settings.root, &result);
            ui.message(&serde_json::to_string_pretty(&report)?);
            return Ok(CommandResult::success());
        }

        ui.show_header(&format!("Scanning {}", settings.root.display()));
        let result = scan_directory(ui, &settings, true)?;
        display::show_scan_summary(ui, &result);

        if !result.missing_modules().is_empty() {
            ui.show_hint("Install them with `importscan run --install-dir <DIR>`");
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::{PythonArgs, ScanOptions};
    use crate::error::ImportScanError;
    use crate::ui::MockUI;
    use std::path::PathBuf;

    fn args(dir: PathBuf, python: &str, json: bool) -> ScanArgs {
        ScanArgs {
            scan: ScanOptions {
                dir,
                suffix: ".py".to_string(),
                search_paths: Vec::new(),
            },
            python: PythonArgs {
                python: Some(python.to_string()),
            },
            json,
        }
    }

    #[test]
    fn missing_interpreter_is_fatal() {
        let temp = tempfile::TempDir::new().unwrap();
        let cmd = ScanCommand::new(args(
            temp.path().to_path_buf(),
            "importscan-no-such-python-xyz",
            false,
        ));
        let mut ui = MockUI::new();

        let err = cmd.execute(&mut ui).unwrap_err();

        assert!(matches!(err, ImportScanError::Interpreter { .. }));
        assert!(!ui.has_message("Scanned:"));
    }

    #[test]
    fn report_serializes_summary() {
        let result = ScanResult::new(vec![FileScan::new(
            Path::new("/src/a.py"),
            ["flask", "os,"].iter().map(|s| s.to_string()).collect(),
        )]);
        let report = ScanReport::new(Path::new("/src"), &result);

        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["root"], "/src");
        assert_eq!(value["missing_modules"], serde_json::json!(["flask"]));
        assert_eq!(value["skipped"], serde_json::json!(["os,"]));
        assert_eq!(value["files"][0]["file_name"], "a.py");
    }

    #[cfg(unix)]
    mod with_fake_python {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        /// Write an executable that prints a probe result with only `sys`
        /// built in and `lib` on the search path.
        fn fake_python(dir: &Path) -> PathBuf {
            let lib = dir.join("lib");
            fs::create_dir_all(&lib).unwrap();
            fs::write(lib.join("os.py"), "").unwrap();

            let script = dir.join("fake-python");
            fs::write(
                &script,
                format!(
                    "#!/bin/sh\necho '{{\"executable\":\"fake\",\"version\":\"3.12.0\",\"path\":[\"{}\"],\"builtins\":[\"sys\"]}}'\n",
                    lib.display()
                ),
            )
            .unwrap();
            fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
            script
        }

        #[test]
        fn scan_reports_missing_modules() {
            let tools = TempDir::new().unwrap();
            let python = fake_python(tools.path());
            let project = TempDir::new().unwrap();
            fs::write(
                project.path().join("a.py"),
                "import os\nimport sys\nimport nonexistent_pkg_xyz\n",
            )
            .unwrap();

            let cmd = ScanCommand::new(args(
                project.path().to_path_buf(),
                python.to_str().unwrap(),
                false,
            ));
            let mut ui = MockUI::new();

            let result = cmd.execute(&mut ui).unwrap();

            assert!(result.success);
            assert!(ui.has_message("Scanned: a.py"));
            assert!(ui.has_message("Missing: nonexistent_pkg_xyz"));
            assert!(ui.has_message("Scan completed."));
            assert!(!ui.has_message("Missing: os"));
        }

        #[test]
        fn json_output_has_no_progress_lines() {
            let tools = TempDir::new().unwrap();
            let python = fake_python(tools.path());
            let project = TempDir::new().unwrap();
            fs::write(project.path().join("a.py"), "import flask\n").unwrap();

            let cmd = ScanCommand::new(args(
                project.path().to_path_buf(),
                python.to_str().unwrap(),
                true,
            ));
            let mut ui = MockUI::new();

            cmd.execute(&mut ui).unwrap();

            assert_eq!(ui.messages().len(), 1);
            let value: serde_json::Value = serde_json::from_str(&ui.messages()[0]).unwrap();
            assert_eq!(value["missing_modules"], serde_json::json!(["flask"]));
        }

        #[test]
        fn empty_directory_reports_nothing_missing() {
            let tools = TempDir::new().unwrap();
            let python = fake_python(tools.path());
            let project = TempDir::new().unwrap();

            let cmd = ScanCommand::new(args(
                project.path().to_path_buf(),
                python.to_str().unwrap(),
                false,
            ));
            let mut ui = MockUI::new();

            cmd.execute(&mut ui).unwrap();

            assert!(!ui.has_message("Scanned:"));
            assert!(ui.has_success("No missing modules found."));
        }
    }
}
