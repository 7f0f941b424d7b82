use crate::agents::{
    CheckboxPrompt, InstallOutcome, InstallerAgent, PackageInspector, PackageInspectorAgent,
    UpdateSelector, select_updatable,
};
use crate::config::UpdateConfig;
use crate::error::Result;
use crate::host::{LogLevel, PluginHost};
use crate::npm::{NpmRegistry, UpdateCandidate};
use crate::utils::pattern::PatternMatcher;
use std::process::ExitStatus;
use std::sync::Arc;

/// How an update run ended
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
pub enum UpdateOutcome {
    /// No installed package had a newer release
    UpToDate,
    /// Updates were offered but none were chosen
    NothingSelected { candidates: Vec<UpdateCandidate> },
    /// The install command ran; its status is informational only
    Installed { argument: String, status: ExitStatus },
}

/// Execute the interactive update workflow
pub fn execute_update(host: &dyn PluginHost, prompt: &dyn CheckboxPrompt) -> Result<UpdateOutcome> {
    let config = load_config(host)?;
    let inspector = build_inspector(host, &config)?;
    run_update(host, &inspector, prompt, &config)
}

/// Execute the check workflow (no prompt, no install)
pub fn execute_check(host: &dyn PluginHost) -> Result<Vec<UpdateCandidate>> {
    let config = load_config(host)?;
    let inspector = build_inspector(host, &config)?;
    run_check(host, &inspector, &config)
}

/// Inspect, filter, prompt, install.
pub fn run_update(
    host: &dyn PluginHost,
    inspector: &dyn PackageInspector,
    prompt: &dyn CheckboxPrompt,
    config: &UpdateConfig,
) -> Result<UpdateOutcome> {
    let candidates = find_candidates(host, inspector, config)?;

    let selector = UpdateSelector::new(host, prompt);
    let selection = selector
        .prompt_selection(&candidates)
        .inspect_err(|e| host.emit_log(LogLevel::Error, &e.to_string()))?;

    if candidates.is_empty() {
        return Ok(UpdateOutcome::UpToDate);
    }

    let installer = InstallerAgent::new(host, config.npm.as_str());
    match installer.apply_updates(&candidates, &selection)? {
        InstallOutcome::Skipped => {
            host.emit_log(LogLevel::Warn, "No packages selected, nothing to update.");
            Ok(UpdateOutcome::NothingSelected { candidates })
        }
        InstallOutcome::Ran { argument, status } => {
            Ok(UpdateOutcome::Installed { argument, status })
        }
    }
}

/// Inspect and filter, then list what could be updated.
pub fn run_check(
    host: &dyn PluginHost,
    inspector: &dyn PackageInspector,
    config: &UpdateConfig,
) -> Result<Vec<UpdateCandidate>> {
    let candidates = find_candidates(host, inspector, config)?;
    print_available_updates(host, &candidates);
    Ok(candidates)
}

fn load_config(host: &dyn PluginHost) -> Result<UpdateConfig> {
    host.read_configuration()
        .inspect_err(|e| host.emit_log(LogLevel::Error, &e.to_string()))
}

fn build_inspector(host: &dyn PluginHost, config: &UpdateConfig) -> Result<PackageInspectorAgent> {
    let registry = NpmRegistry::new(&config.registry)
        .inspect_err(|e| host.emit_log(LogLevel::Error, &e.to_string()))?;
    Ok(PackageInspectorAgent::new(
        config.npm.as_str(),
        Arc::new(registry),
        config.spinner,
    ))
}

fn find_candidates(
    host: &dyn PluginHost,
    inspector: &dyn PackageInspector,
    config: &UpdateConfig,
) -> Result<Vec<UpdateCandidate>> {
    let filter = PatternMatcher::new(&config.filter)
        .inspect_err(|e| host.emit_log(LogLevel::Error, &e.to_string()))?;

    host.emit_log(
        LogLevel::Info,
        &format!(
            "Checking global packages matching '{}' with {}...",
            filter.as_str(),
            config.npm
        ),
    );

    let records = inspector
        .list_global_packages(&filter)
        .inspect_err(|e| host.emit_log(LogLevel::Error, &e.to_string()))?;

    host.emit_log(
        LogLevel::Debug,
        &format!("Inspected {} package(s): {records:?}", records.len()),
    );

    Ok(select_updatable(&records))
}

fn print_available_updates(host: &dyn PluginHost, candidates: &[UpdateCandidate]) {
    if candidates.is_empty() {
        host.emit_log(LogLevel::Success, "✨ All plugins are up to date!");
        return;
    }

    host.emit_log(
        LogLevel::Info,
        &format!("Found {} update(s):", candidates.len()),
    );
    for candidate in candidates {
        host.emit_log(
            LogLevel::Info,
            &format!(
                "  • {} {} → {}",
                candidate.name(),
                candidate.installed_version(),
                candidate.latest_version()
            ),
        );
    }
    host.emit_log(LogLevel::Info, "To apply these updates, run: steamer-update");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::selector::UP_TO_DATE_MESSAGE;
    use crate::agents::test_support::RecordingHost;
    use crate::error::UpdateError;
    use crate::npm::PackageRecord;
    use std::cell::Cell;

    struct StaticInspector {
        records: Vec<PackageRecord>,
    }

    impl PackageInspector for StaticInspector {
        fn list_global_packages(&self, filter: &PatternMatcher) -> Result<Vec<PackageRecord>> {
            Ok(self
                .records
                .iter()
                .filter(|r| filter.matches(&r.name))
                .cloned()
                .collect())
        }
    }

    struct FailingInspector;

    impl PackageInspector for FailingInspector {
        fn list_global_packages(&self, _filter: &PatternMatcher) -> Result<Vec<PackageRecord>> {
            Err(UpdateError::InspectionFailed("registry unreachable".into()))
        }
    }

    struct SelectAll {
        calls: Cell<usize>,
    }

    impl SelectAll {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
            }
        }
    }

    impl CheckboxPrompt for SelectAll {
        fn select(&self, _message: &str, items: &[String]) -> Result<Vec<usize>> {
            self.calls.set(self.calls.get() + 1);
            Ok((0..items.len()).collect())
        }
    }

    struct SelectNone;

    impl CheckboxPrompt for SelectNone {
        fn select(&self, _message: &str, _items: &[String]) -> Result<Vec<usize>> {
            Ok(Vec::new())
        }
    }

    struct BrokenTerminal;

    impl CheckboxPrompt for BrokenTerminal {
        fn select(&self, _message: &str, _items: &[String]) -> Result<Vec<usize>> {
            Err(UpdateError::PromptFailed("not a terminal".into()))
        }
    }

    #[test]
    fn scenario_up_to_date() {
        let host = RecordingHost::default();
        let inspector = StaticInspector {
            records: vec![PackageRecord::new(
                "steamer-plugin-init",
                Some("1.0.0"),
                Some("1.0.0"),
            )],
        };
        let prompt = SelectAll::new();

        let outcome = run_update(&host, &inspector, &prompt, &host.config).unwrap();

        assert_eq!(outcome, UpdateOutcome::UpToDate);
        assert_eq!(prompt.calls.get(), 0);
        assert!(host.commands().is_empty());
        assert!(host.logged(LogLevel::Info, UP_TO_DATE_MESSAGE));
    }

    #[test]
    fn scenario_single_update_selected() {
        let host = RecordingHost::default();
        let inspector = StaticInspector {
            records: vec![
                PackageRecord::new("steamer-plugin-init", Some("1.0.0"), Some("1.2.0"))
                    .with_homepage("https://x"),
            ],
        };
        let prompt = SelectAll::new();

        let outcome = run_update(&host, &inspector, &prompt, &host.config).unwrap();

        assert_eq!(prompt.calls.get(), 1);
        assert_eq!(
            host.commands(),
            vec![(
                "npm".to_string(),
                vec![
                    "install".to_string(),
                    "-g".to_string(),
                    "steamer-plugin-init@1.2.0 ".to_string(),
                ]
            )]
        );
        match outcome {
            UpdateOutcome::Installed { argument, status } => {
                assert_eq!(argument, "steamer-plugin-init@1.2.0 ");
                assert!(status.success());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn packages_outside_family_are_ignored() {
        let host = RecordingHost::default();
        let inspector = StaticInspector {
            records: vec![
                PackageRecord::new("typescript", Some("4.0.0"), Some("5.0.0")),
                PackageRecord::new("steamer-plugin-kit", Some("2.0.0"), Some("2.0.1")),
            ],
        };

        run_update(&host, &inspector, &SelectAll::new(), &host.config).unwrap();

        assert_eq!(host.commands()[0].1[2], "steamer-plugin-kit@2.0.1 ");
    }

    #[test]
    fn declining_all_runs_nothing() {
        let host = RecordingHost::default();
        let inspector = StaticInspector {
            records: vec![PackageRecord::new(
                "steamer-plugin-init",
                Some("1.0.0"),
                Some("1.2.0"),
            )],
        };

        let outcome = run_update(&host, &inspector, &SelectNone, &host.config).unwrap();

        assert!(matches!(outcome, UpdateOutcome::NothingSelected { ref candidates } if candidates.len() == 1));
        assert!(host.commands().is_empty());
    }

    #[test]
    fn failed_install_exit_is_not_an_error() {
        let host = RecordingHost::exiting_with(1);
        let inspector = StaticInspector {
            records: vec![PackageRecord::new(
                "steamer-plugin-init",
                Some("1.0.0"),
                Some("1.2.0"),
            )],
        };

        let outcome = run_update(&host, &inspector, &SelectAll::new(), &host.config).unwrap();

        match outcome {
            UpdateOutcome::Installed { status, .. } => assert!(!status.success()),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn inspection_failure_aborts_before_prompt() {
        let host = RecordingHost::default();
        let prompt = SelectAll::new();

        let err = run_update(&host, &FailingInspector, &prompt, &host.config).unwrap_err();

        assert!(matches!(err, UpdateError::InspectionFailed(_)));
        assert_eq!(prompt.calls.get(), 0);
        assert!(host.has_level(LogLevel::Error));
    }

    #[test]
    fn prompt_failure_aborts_before_install() {
        let host = RecordingHost::default();
        let inspector = StaticInspector {
            records: vec![PackageRecord::new(
                "steamer-plugin-init",
                Some("1.0.0"),
                Some("1.2.0"),
            )],
        };

        let err = run_update(&host, &inspector, &BrokenTerminal, &host.config).unwrap_err();

        assert!(matches!(err, UpdateError::PromptFailed(_)));
        assert!(host.commands().is_empty());
        assert!(host.has_level(LogLevel::Error));
    }

    #[test]
    fn spawn_failure_aborts_run() {
        let host = RecordingHost::failing_spawn();
        let inspector = StaticInspector {
            records: vec![PackageRecord::new(
                "steamer-plugin-init",
                Some("1.0.0"),
                Some("1.2.0"),
            )],
        };

        let err = run_update(&host, &inspector, &SelectAll::new(), &host.config).unwrap_err();
        assert!(matches!(err, UpdateError::SpawnFailed { .. }));
    }

    #[test]
    fn invalid_filter_is_logged() {
        let mut host = RecordingHost::default();
        host.config.filter = "  ".to_string();
        let inspector = StaticInspector { records: Vec::new() };

        let err = run_update(&host, &inspector, &SelectAll::new(), &host.config).unwrap_err();

        assert!(matches!(err, UpdateError::Config(_)));
        assert!(host.has_level(LogLevel::Error));
    }

    #[test]
    fn check_lists_without_prompting_or_installing() {
        let host = RecordingHost::default();
        let inspector = StaticInspector {
            records: vec![
                PackageRecord::new("steamer-plugin-init", Some("1.0.0"), Some("1.2.0")),
                PackageRecord::new("steamer-plugin-kit", Some("2.0.0"), Some("2.0.0")),
            ],
        };

        let candidates = run_check(&host, &inspector, &host.config).unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name(), "steamer-plugin-init");
        assert!(host.commands().is_empty());
        assert!(host.logged(LogLevel::Info, "  • steamer-plugin-init 1.0.0 → 1.2.0"));
    }
}
