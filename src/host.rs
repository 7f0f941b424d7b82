use crate::config::{ConfigFile, ConfigOverrides, NPM_ENV_VAR, UpdateConfig};
use crate::error::{Result, UpdateError};
use colored::Colorize;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

/// Severity of a message sent through [`PluginHost::emit_log`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Success,
    Warn,
    Error,
}

/// Capabilities the update pipeline needs from whoever hosts it
///
/// The pipeline never reads configuration, prints, or spawns processes on
/// its own; everything goes through this trait so a CLI framework (or a
/// test) can supply its own implementation.
pub trait PluginHost {
    fn read_configuration(&self) -> Result<UpdateConfig>;

    fn emit_log(&self, level: LogLevel, message: &str);

    /// Run a command to completion with the terminal's standard streams attached.
    fn run_child_process_sync(&self, program: &str, args: &[&str]) -> Result<ExitStatus>;
}

/// Host backed by the real terminal, environment and config file
pub struct TerminalHost {
    config_path: Option<PathBuf>,
    overrides: ConfigOverrides,
}

impl TerminalHost {
    pub fn new(config_path: Option<PathBuf>, overrides: ConfigOverrides) -> Self {
        Self {
            config_path,
            overrides,
        }
    }
}

impl PluginHost for TerminalHost {
    fn read_configuration(&self) -> Result<UpdateConfig> {
        let file = match self.config_path.clone().or_else(ConfigFile::default_path) {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };
        let env_npm = std::env::var(NPM_ENV_VAR).ok();

        UpdateConfig::resolve(file, env_npm, &self.overrides)
    }

    fn emit_log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => tracing::debug!("{message}"),
            LogLevel::Info => println!("{}", message.cyan()),
            LogLevel::Success => println!("{}", message.green()),
            LogLevel::Warn => println!("{}", message.yellow()),
            LogLevel::Error => eprintln!("{} {}", "Error:".red().bold(), message),
        }
    }

    fn run_child_process_sync(&self, program: &str, args: &[&str]) -> Result<ExitStatus> {
        tracing::debug!("Executing: {program} {args:?}");

        Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| UpdateError::SpawnFailed {
                command: program.to_string(),
                source,
            })
    }
}
