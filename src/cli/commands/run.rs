//! The `importscan run` command.
//!
//! Scans a directory, then installs the missing modules the user picks.
//! The install target is checked before scanning so a bad configuration
//! fails fast.

use crate::cli::args::RunArgs;
use crate::error::Result;
use crate::ui::{Prompt, PromptOption, UserInterface};
use crate::validate::ModuleName;

use super::dispatcher::{Command, CommandResult};
use super::display;
use super::install::{batch_result, install_modules};
use super::scan::scan_directory;

/// Prompt key for the module selection.
pub const SELECT_PROMPT_KEY: &str = "install_modules";

/// The run command implementation.
pub struct RunCommand {
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(args: RunArgs) -> Self {
        Self { args }
    }

    /// Decide which of `missing` to install, or `None` to install nothing.
    fn select(
        &self,
        ui: &mut dyn UserInterface,
        missing: &[ModuleName],
    ) -> Result<Option<Vec<ModuleName>>> {
        if self.args.yes {
            return Ok(Some(missing.to_vec()));
        }

        if !ui.is_interactive() {
            ui.show_hint("Re-run with --yes to install them.");
            return Ok(None);
        }

        let prompt = Prompt {
            key: SELECT_PROMPT_KEY.to_string(),
            question: "Select modules to install".to_string(),
            options: missing.iter().map(|m| PromptOption::plain(m.as_str())).collect(),
            default: Some(display::join_names(missing)),
        };

        let chosen = ui.prompt(&prompt)?;

        // Keep scan order and ignore anything that was not offered.
        Ok(Some(
            missing
                .iter()
                .filter(|m| chosen.iter().any(|c| c == m.as_str()))
                .cloned()
                .collect(),
        ))
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let install = self.args.target.settings(&self.args.python)?;
        let scan = self.args.scan.settings(&self.args.python);

        ui.show_header(&format!("Scanning {}", scan.root.display()));
        let result = scan_directory(ui, &scan, true)?;
        display::show_scan_summary(ui, &result);

        let missing: Vec<ModuleName> = result.missing_modules().into_iter().collect();
        if missing.is_empty() {
            return Ok(CommandResult::success());
        }

        let Some(selected) = self.select(ui, &missing)? else {
            return Ok(CommandResult::success());
        };
        if selected.is_empty() {
            ui.message("No modules to install.");
            return Ok(CommandResult::success());
        }

        let installer = install.installer();

        if self.args.dry_run {
            display::show_plan(ui, &installer.plan(&selected));
            return Ok(CommandResult::success());
        }

        ui.show_header(&format!(
            "Installing {} module(s) in {}",
            selected.len(),
            installer.working_dir().display()
        ));
        let outcomes = install_modules(ui, &installer, &selected);
        display::show_install_summary(ui, &outcomes);

        Ok(batch_result(&outcomes))
    }
}
