use crate::agents::selector::Selection;
use crate::error::Result;
use crate::host::{LogLevel, PluginHost};
use crate::npm::UpdateCandidate;
use std::process::ExitStatus;

/// What happened when applying a selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Nothing was selected, so no command ran
    Skipped,
    /// The install command ran to completion with this status
    Ran { argument: String, status: ExitStatus },
}

/// InstallerAgent runs the global install for the chosen candidates
pub struct InstallerAgent<'a> {
    host: &'a dyn PluginHost,
    npm: String,
}

impl<'a> InstallerAgent<'a> {
    pub fn new(host: &'a dyn PluginHost, npm: impl Into<String>) -> Self {
        Self {
            host,
            npm: npm.into(),
        }
    }

    /// Install every selected candidate at its latest version in one command
    ///
    /// The exit status of the install command is reported back but not
    /// treated as an error; only a failure to start it is.
    pub fn apply_updates(
        &self,
        candidates: &[UpdateCandidate],
        selection: &Selection,
    ) -> Result<InstallOutcome> {
        let argument = build_install_argument(candidates, selection);
        if argument.is_empty() {
            tracing::debug!("Nothing selected, skipping install");
            return Ok(InstallOutcome::Skipped);
        }

        let args = ["install", "-g", argument.as_str()];
        let status = match self.host.run_child_process_sync(&self.npm, &args) {
            Ok(status) => status,
            Err(e) => {
                self.host.emit_log(LogLevel::Error, &e.to_string());
                return Err(e);
            }
        };

        tracing::debug!("{} install exited with {status}", self.npm);

        Ok(InstallOutcome::Ran { argument, status })
    }
}

/// `name@latest ` for every selected candidate, concatenated in candidate order.
///
/// The result is passed to the package manager as a single argument,
/// trailing space included.
pub fn build_install_argument(candidates: &[UpdateCandidate], selection: &Selection) -> String {
    selection
        .iter()
        .filter_map(|&idx| candidates.get(idx))
        .map(|candidate| format!("{} ", candidate.install_spec()))
        .collect()
}
