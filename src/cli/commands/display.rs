//! Shared display helpers for scan and install output.
//!
//! Used by `scan`, `install` and `run` so progress lines and summaries
//! read the same everywhere.

use crate::install::InstallOutcome;
use crate::scan::{FileScan, ScanResult};
use crate::shell::display_command;
use crate::ui::UserInterface;

/// Join names with `", "`.
pub fn join_names<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|n| n.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Print the progress lines for one scanned file.
pub fn show_file_scan(ui: &mut dyn UserInterface, file: &FileScan) {
    if !ui.output_mode().shows_file_progress() {
        return;
    }
    ui.message(&format!("Scanned: {}", file.file_name));
    if file.has_unresolved() {
        ui.message(&format!("Missing: {}", join_names(&file.unresolved)));
    }
}

/// Print the end-of-scan summary.
///
/// Only validated names are listed; rejected ones show up in verbose mode.
pub fn show_scan_summary(ui: &mut dyn UserInterface, result: &ScanResult) {
    ui.message("");
    ui.message("Scan completed.");

    let missing = result.missing_modules();
    if missing.is_empty() {
        ui.success("No missing modules found.");
    } else {
        ui.message(&format!("Missing modules ({}):", missing.len()));
        for module in &missing {
            ui.message(&format!("  {}", module));
        }
    }

    if ui.output_mode().shows_command_output() {
        let skipped = result.skipped_names();
        if !skipped.is_empty() {
            ui.warning(&format!("Not installable: {}", join_names(&skipped)));
        }
    }
}

/// Print the dry-run plan.
pub fn show_plan(ui: &mut dyn UserInterface, plan: &[String]) {
    ui.show_header("Planned commands");
    for line in plan {
        ui.message(line);
    }
}

/// Print the details of one install attempt.
///
/// The one-line summary comes from the install spinner. Failures add the
/// command and its output; successes only show output in verbose mode.
pub fn show_install_details(
    ui: &mut dyn UserInterface,
    outcome: &InstallOutcome,
    argv: &[String],
) {
    if !outcome.success {
        ui.show_error_block(&display_command(argv), &outcome.output);
    } else if ui.output_mode().shows_command_output() {
        for line in outcome.output.lines() {
            ui.message(&format!("    {}", line));
        }
    }
}

/// Print the totals after a batch of installs.
///
/// Every attempt counts once; failures are listed in attempt order.
pub fn show_install_summary(ui: &mut dyn UserInterface, outcomes: &[InstallOutcome]) {
    let (succeeded, failed): (Vec<&InstallOutcome>, Vec<&InstallOutcome>) =
        outcomes.iter().partition(|o| o.success);
    let installed = succeeded.len();

    ui.message("");
    if failed.is_empty() {
        ui.success(&format!("Installation completed: {} installed", installed));
    } else {
        ui.error(&format!(
            "Installation completed: {} installed, {} failed ({})",
            installed,
            failed.len(),
            join_names(failed.iter().map(|o| o.module.as_str()))
        ));
    }
}
