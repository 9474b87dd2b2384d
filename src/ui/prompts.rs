//! Interactive prompts.

use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::MultiSelect;

use crate::error::{ImportScanError, Result};

use super::Prompt;

/// Convert dialoguer errors to ImportScanError.
fn map_dialoguer_err(e: dialoguer::Error) -> ImportScanError {
    ImportScanError::Io(e.into())
}

/// Dialoguer theme without the default yellow `?` prefix.
fn prompt_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("".to_string()),
        ..ColorfulTheme::default()
    }
}

/// Split a comma-separated default into values.
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Show a multi-select prompt with the default values preselected.
pub fn prompt_user(prompt: &Prompt, term: &Term) -> Result<Vec<String>> {
    let labels: Vec<_> = prompt.options.iter().map(|o| o.label.as_str()).collect();

    let default_values = prompt.default.as_deref().map(parse_list).unwrap_or_default();
    let defaults: Vec<bool> = prompt
        .options
        .iter()
        .map(|o| default_values.contains(&o.value))
        .collect();

    let selections = MultiSelect::with_theme(&prompt_theme())
        .with_prompt(&prompt.question)
        .items(&labels)
        .defaults(&defaults)
        .interact_on(term)
        .map_err(map_dialoguer_err)?;

    Ok(selections
        .iter()
        .map(|&i| prompt.options[i].value.clone())
        .collect())
}
