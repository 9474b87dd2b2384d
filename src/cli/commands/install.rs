//! The `importscan install` command.

use crate::cli::args::InstallArgs;
use crate::error::Result;
use crate::install::{InstallOutcome, InstallProgress, Installer};
use crate::shell::OutputLine;
use crate::ui::{live_output_callback, SpinnerHandle, UserInterface};
use crate::validate::ModuleName;

use super::dispatcher::{Command, CommandResult};
use super::display;

/// Lines of package manager output shown under the spinner.
const LIVE_OUTPUT_LINES: usize = 3;

/// Validate user-supplied names, warning about and dropping rejected ones.
///
/// Duplicates are dropped; the first occurrence keeps its position.
pub fn validate_names(ui: &mut dyn UserInterface, names: &[String]) -> Vec<ModuleName> {
    let mut modules: Vec<ModuleName> = Vec::with_capacity(names.len());
    for name in names {
        match ModuleName::try_from(name.as_str()) {
            Ok(module) if !modules.contains(&module) => modules.push(module),
            Ok(_) => {}
            Err(e) => ui.warning(&format!("Skipping: {}", e)),
        }
    }
    modules
}

/// Shows a spinner per install with the latest output lines under it.
struct SpinnerProgress<'a> {
    ui: &'a mut dyn UserInterface,
    installer: &'a Installer,
    spinner: Option<Box<dyn SpinnerHandle>>,
}

impl InstallProgress for SpinnerProgress<'_> {
    fn started(&mut self, module: &ModuleName) -> Box<dyn Fn(&OutputLine)> {
        let message = format!("Installing {}", module);
        let spinner = self.ui.start_spinner(&message);
        let on_line: Box<dyn Fn(&OutputLine)> = match spinner.progress_bar() {
            Some(bar) => Box::new(live_output_callback(bar, message, LIVE_OUTPUT_LINES)),
            None => Box::new(|_: &OutputLine| {}),
        };
        self.spinner = Some(spinner);
        on_line
    }

    fn finished(&mut self, outcome: &InstallOutcome) {
        if let Some(mut spinner) = self.spinner.take() {
            if outcome.success {
                spinner.finish_success(&outcome.summary());
            } else {
                spinner.finish_error(&outcome.summary());
            }
        }

        let argv = self
            .installer
            .package_manager()
            .install_command(&outcome.module);
        display::show_install_details(self.ui, outcome, &argv);
    }
}

/// Install `modules` one at a time, with a spinner per module.
///
/// Returns one outcome per module, in order. A failure is shown and the
/// next module is attempted.
pub fn install_modules(
    ui: &mut dyn UserInterface,
    installer: &Installer,
    modules: &[ModuleName],
) -> Vec<InstallOutcome> {
    let progress = SpinnerProgress {
        ui,
        installer,
        spinner: None,
    };
    installer.install_all(modules, progress)
}

/// Exit status for a finished batch.
pub fn batch_result(outcomes: &[InstallOutcome]) -> CommandResult {
    if outcomes.iter().all(|o| o.success) {
        CommandResult::success()
    } else {
        CommandResult::failure(1)
    }
}

/// The install command implementation.
pub struct InstallCommand {
    args: InstallArgs,
}

impl InstallCommand {
    /// Create a new install command.
    pub fn new(args: InstallArgs) -> Self {
        Self { args }
    }
}

impl Command for InstallCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let settings = self.args.target.settings(&self.args.python)?;
        let modules = validate_names(ui, &self.args.modules);

        if modules.is_empty() {
            ui.warning("No modules to install.");
            return Ok(CommandResult::failure(1));
        }

        let installer = settings.installer();

        if self.args.dry_run {
            display::show_plan(ui, &installer.plan(&modules));
            return Ok(CommandResult::success());
        }

        ui.show_header(&format!(
            "Installing {} module(s) in {}",
            modules.len(),
            installer.working_dir().display()
        ));
        let outcomes = install_modules(ui, &installer, &modules);
        display::show_install_summary(ui, &outcomes);

        Ok(batch_result(&outcomes))
    }
}
