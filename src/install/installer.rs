//! Sequential module installation.
//!
//! Each module gets its own package manager invocation. Invocations run
//! one after another in input order; a failed install is recorded and the
//! batch moves on to the next module.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ImportScanError;
use crate::shell::{display_command, execute_streaming, CommandOptions, OutputLine};
use crate::validate::ModuleName;

use super::package_manager::PackageManager;

/// Result of one install attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    /// The module that was installed.
    pub module: ModuleName,

    /// Whether the package manager exited with status zero.
    pub success: bool,

    /// Combined stdout and stderr, or the reason the command never ran.
    pub output: String,

    /// Exit code, if the process ran and was not killed by a signal.
    pub exit_code: Option<i32>,

    /// How long the attempt took.
    pub duration: Duration,
}

impl InstallOutcome {
    /// The failure as an error value, if this attempt failed.
    pub fn error(&self) -> Option<ImportScanError> {
        (!self.success).then(|| ImportScanError::InstallFailed {
            module: self.module.to_string(),
            code: self.exit_code,
        })
    }

    /// One-line summary, e.g. `Installed requests`.
    pub fn summary(&self) -> String {
        if self.success {
            format!("Installed {}", self.module)
        } else {
            format!("Failed to install {}", self.module)
        }
    }
}

/// Runs package manager installs in a fixed working directory.
#[derive(Debug, Clone)]
pub struct Installer {
    package_manager: PackageManager,
    working_dir: PathBuf,
}

impl Installer {
    /// Create an installer that runs `package_manager` inside `working_dir`.
    pub fn new(package_manager: PackageManager, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            package_manager,
            working_dir: working_dir.into(),
        }
    }

    /// The directory installs run in.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// The package manager in use.
    pub fn package_manager(&self) -> &PackageManager {
        &self.package_manager
    }

    /// Display form of the command for each module, without running anything.
    pub fn plan(&self, modules: &[ModuleName]) -> Vec<String> {
        modules
            .iter()
            .map(|module| {
                format!(
                    "{} || echo Failed to install {}",
                    display_command(&self.package_manager.install_command(module)),
                    module
                )
            })
            .collect()
    }

    /// Install a single module.
    pub fn install(&self, module: &ModuleName) -> InstallOutcome {
        self.install_streaming(module, &|_| {})
    }

    /// Install a single module, passing each output line to `on_line`.
    pub fn install_streaming(
        &self,
        module: &ModuleName,
        on_line: &dyn Fn(&OutputLine),
    ) -> InstallOutcome {
        let argv = self.package_manager.install_command(module);
        let options = CommandOptions {
            cwd: Some(self.working_dir.clone()),
        };

        tracing::info!(
            "Installing {} in {}",
            module,
            self.working_dir.display()
        );

        match execute_streaming(&argv, &options, on_line) {
            Ok(result) => {
                if result.success {
                    tracing::info!("Installed {}", module);
                } else {
                    tracing::warn!(
                        "Install of {} exited with code {:?}",
                        module,
                        result.exit_code
                    );
                }
                InstallOutcome {
                    module: module.clone(),
                    success: result.success,
                    output: result.combined,
                    exit_code: result.exit_code,
                    duration: result.duration,
                }
            }
            Err(e) => {
                tracing::error!("{}", e);
                InstallOutcome {
                    module: module.clone(),
                    success: false,
                    output: e.to_string(),
                    exit_code: None,
                    duration: Duration::ZERO,
                }
            }
        }
    }

    /// Install every module in order, reporting progress to `progress`.
    ///
    /// Returns exactly one outcome per input module, in input order.
    pub fn install_all<P>(&self, modules: &[ModuleName], mut progress: P) -> Vec<InstallOutcome>
    where
        P: InstallProgress,
    {
        let mut outcomes = Vec::with_capacity(modules.len());
        for module in modules {
            let on_line = progress.started(module);
            let outcome = self.install_streaming(module, &*on_line);
            drop(on_line);
            progress.finished(&outcome);
            outcomes.push(outcome);
        }
        outcomes
    }
}

/// Observer for [`Installer::install_all`].
pub trait InstallProgress {
    /// An install is about to run. The returned callback receives its
    /// output lines.
    fn started(&mut self, module: &ModuleName) -> Box<dyn Fn(&OutputLine)>;

    /// An install has finished.
    fn finished(&mut self, outcome: &InstallOutcome);
}

/// Closures observe finished installs only.
impl<F: FnMut(&InstallOutcome)> InstallProgress for F {
    fn started(&mut self, _module: &ModuleName) -> Box<dyn Fn(&OutputLine)> {
        Box::new(|_: &OutputLine| {})
    }

    fn finished(&mut self, outcome: &InstallOutcome) {
        self(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn modules(names: &[&str]) -> Vec<ModuleName> {
        names.iter().map(|n| ModuleName::parse(n).unwrap()).collect()
    }

    /// A package manager that fails for `bad_pkg` and succeeds otherwise.
    #[cfg(unix)]
    fn fake_pip() -> PackageManager {
        let script = r#"
if [ "$2" = "bad_pkg" ]; then
  echo "ERROR: No matching distribution found for $2" >&2
  exit 1
fi
echo "Successfully installed $2"
"#;
        PackageManager::new(
            "sh",
            vec!["-c".to_string(), script.to_string(), "fake-pip".to_string()],
        )
    }

    #[cfg(unix)]
    #[test]
    fn failed_install_does_not_stop_batch() {
        let temp = TempDir::new().unwrap();
        let installer = Installer::new(fake_pip(), temp.path());

        let outcomes = installer.install_all(&modules(&["good_pkg", "bad_pkg"]), |_: &InstallOutcome| {});

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].module.as_str(), "good_pkg");
        assert!(outcomes[0].success);
        assert!(outcomes[0].output.contains("Successfully installed good_pkg"));
        assert_eq!(outcomes[1].module.as_str(), "bad_pkg");
        assert!(!outcomes[1].success);
        assert_eq!(outcomes[1].exit_code, Some(1));
        assert!(outcomes[1].output.contains("No matching distribution"));
    }

    #[cfg(unix)]
    #[test]
    fn outcomes_follow_input_order() {
        let temp = TempDir::new().unwrap();
        let installer = Installer::new(fake_pip(), temp.path());
        let input = modules(&["zeta", "bad_pkg", "alpha", "mid"]);

        let mut reported = Vec::new();
        let outcomes = installer.install_all(&input, |o: &InstallOutcome| {
            reported.push(o.module.to_string())
        });

        let names: Vec<&str> = outcomes.iter().map(|o| o.module.as_str()).collect();
        assert_eq!(names, vec!["zeta", "bad_pkg", "alpha", "mid"]);
        assert_eq!(reported, vec!["zeta", "bad_pkg", "alpha", "mid"]);
    }

    /// Records the start, output and end of each install.
    #[derive(Default)]
    struct Recorder {
        events: std::rc::Rc<std::cell::RefCell<Vec<String>>>,
    }

    impl InstallProgress for Recorder {
        fn started(&mut self, module: &ModuleName) -> Box<dyn Fn(&OutputLine)> {
            self.events.borrow_mut().push(format!("start {}", module));
            let events = std::rc::Rc::clone(&self.events);
            Box::new(move |line: &OutputLine| {
                events.borrow_mut().push(format!("line {}", line.text()))
            })
        }

        fn finished(&mut self, outcome: &InstallOutcome) {
            self.events.borrow_mut().push(outcome.summary());
        }
    }

    #[cfg(unix)]
    #[test]
    fn progress_sees_each_install_and_its_output() {
        let temp = TempDir::new().unwrap();
        let installer = Installer::new(fake_pip(), temp.path());
        let recorder = Recorder::default();
        let events = std::rc::Rc::clone(&recorder.events);

        installer.install_all(&modules(&["good_pkg", "bad_pkg"]), recorder);

        assert_eq!(
            *events.borrow(),
            vec![
                "start good_pkg",
                "line Successfully installed good_pkg",
                "Installed good_pkg",
                "start bad_pkg",
                "line ERROR: No matching distribution found for bad_pkg",
                "Failed to install bad_pkg",
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn runs_in_working_directory() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("requirements.txt"), "").unwrap();
        let pm = PackageManager::new("sh", vec!["-c".to_string(), "ls".to_string()]);
        let installer = Installer::new(pm, temp.path());

        let outcome = installer.install(&modules(&["anything"])[0]);

        assert!(outcome.success);
        assert!(outcome.output.contains("requirements.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn streaming_install_forwards_lines() {
        use std::cell::RefCell;

        let temp = TempDir::new().unwrap();
        let installer = Installer::new(fake_pip(), temp.path());
        let lines = RefCell::new(Vec::new());

        let outcome = installer.install_streaming(&modules(&["requests"])[0], &|line| {
            lines.borrow_mut().push(line.text().to_string())
        });

        assert!(outcome.success);
        assert_eq!(lines.into_inner(), vec!["Successfully installed requests"]);
    }

    #[test]
    fn missing_package_manager_is_a_failed_outcome() {
        let temp = TempDir::new().unwrap();
        let pm = PackageManager::new("importscan-no-such-pip-xyz", Vec::new());
        let installer = Installer::new(pm, temp.path());

        let outcomes = installer.install_all(&modules(&["one", "two"]), |_: &InstallOutcome| {});

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| !o.success));
        assert!(outcomes[0].output.contains("importscan-no-such-pip-xyz"));
        assert!(outcomes[0].error().is_some());
    }

    #[test]
    fn empty_batch_runs_nothing() {
        let temp = TempDir::new().unwrap();
        let installer = Installer::new(PackageManager::pip("python3"), temp.path());
        let mut calls = 0;

        let outcomes = installer.install_all(&[], |_: &InstallOutcome| calls += 1);

        assert!(outcomes.is_empty());
        assert_eq!(calls, 0);
    }

    #[test]
    fn plan_lists_one_command_per_module() {
        let installer = Installer::new(PackageManager::pip("python3"), "/srv/app");

        let plan = installer.plan(&modules(&["requests", "flask"]));

        assert_eq!(
            plan,
            vec![
                "python3 -m pip install requests || echo Failed to install requests",
                "python3 -m pip install flask || echo Failed to install flask",
            ]
        );
        assert_eq!(installer.working_dir(), Path::new("/srv/app"));
    }

    #[test]
    fn outcome_summary_and_error() {
        let ok = InstallOutcome {
            module: ModuleName::parse("requests").unwrap(),
            success: true,
            output: String::new(),
            exit_code: Some(0),
            duration: Duration::ZERO,
        };
        assert_eq!(ok.summary(), "Installed requests");
        assert!(ok.error().is_none());

        let failed = InstallOutcome {
            success: false,
            exit_code: Some(2),
            ..ok
        };
        assert_eq!(failed.summary(), "Failed to install requests");
        assert!(matches!(
            failed.error(),
            Some(ImportScanError::InstallFailed { code: Some(2), .. })
        ));
    }
}
