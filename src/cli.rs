use crate::config::ConfigOverrides;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "steamer-update",
    about = "Check globally installed steamer packages and update them interactively",
    version,
    author
)]
pub struct Cli {
    /// Package manager binary to use (npm, cnpm, tnpm, pnpm, ...)
    #[arg(long, value_name = "BIN", global = true)]
    pub npm: Option<String>,

    /// Registry used to look up latest versions
    #[arg(long, value_name = "URL", global = true)]
    pub registry: Option<String>,

    /// Only check packages whose name matches this glob (default: "steamer*")
    #[arg(long, value_name = "GLOB", global = true)]
    pub filter: Option<String>,

    /// Path to the config file (defaults to ~/.steamer/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Do not show a spinner while querying the registry
    #[arg(long, global = true)]
    pub no_spinner: bool,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Check for newer versions and choose which ones to install (default)
    Update,

    /// List available updates without installing anything
    Check,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            npm: self.npm.clone(),
            registry: self.registry.clone(),
            filter: self.filter.clone(),
            no_spinner: self.no_spinner,
        }
    }
}
