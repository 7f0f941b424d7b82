use crate::error::{Result, UpdateError};
use crate::host::{LogLevel, PluginHost};
use crate::npm::UpdateCandidate;
use colored::Colorize;
use std::collections::BTreeSet;

/// Indices into the candidate list chosen by the operator, in candidate order
pub type Selection = BTreeSet<usize>;

pub const UP_TO_DATE_MESSAGE: &str = "All plugins are latest.";
const LIST_HEADER: &str = "Following plugins have latest versions:";
const PROMPT_MESSAGE: &str = "Choose which packages to update.";

/// A checkbox list the operator can tick any number of items in
pub trait CheckboxPrompt {
    /// Returns the indices of checked items. Cancelling counts as checking none.
    fn select(&self, message: &str, items: &[String]) -> Result<Vec<usize>>;
}

/// Checkbox prompt rendered with `dialoguer`
pub struct DialoguerPrompt;

impl CheckboxPrompt for DialoguerPrompt {
    fn select(&self, message: &str, items: &[String]) -> Result<Vec<usize>> {
        let chosen = dialoguer::MultiSelect::new()
            .with_prompt(message)
            .items(items)
            .interact_opt()
            .map_err(|e| UpdateError::PromptFailed(e.to_string()))?;

        Ok(chosen.unwrap_or_default())
    }
}

/// UpdateSelector lets the operator pick which candidates to install
pub struct UpdateSelector<'a> {
    host: &'a dyn PluginHost,
    prompt: &'a dyn CheckboxPrompt,
}

impl<'a> UpdateSelector<'a> {
    pub fn new(host: &'a dyn PluginHost, prompt: &'a dyn CheckboxPrompt) -> Self {
        Self { host, prompt }
    }

    /// Ask which candidates to update. No prompt is shown when there are none.
    pub fn prompt_selection(&self, candidates: &[UpdateCandidate]) -> Result<Selection> {
        if candidates.is_empty() {
            self.host.emit_log(LogLevel::Info, UP_TO_DATE_MESSAGE);
            return Ok(Selection::new());
        }

        self.host.emit_log(LogLevel::Info, LIST_HEADER);

        let items: Vec<String> = candidates.iter().map(describe_candidate).collect();
        let chosen = self.prompt.select(PROMPT_MESSAGE, &items)?;

        let selection: Selection = chosen
            .into_iter()
            .filter(|&idx| idx < candidates.len())
            .collect();
        tracing::debug!("Selected candidate indices: {selection:?}");

        Ok(selection)
    }
}

/// One checkbox line: name, installed and latest version, homepage
pub fn describe_candidate(candidate: &UpdateCandidate) -> String {
    let mut line = format!(
        "{}  {} > {}",
        candidate.name().yellow(),
        candidate.installed_version().white(),
        candidate.latest_version().white().bold()
    );
    if let Some(homepage) = candidate.homepage() {
        line.push_str(&format!(" {}", homepage.blue()));
    }
    line
}
