mod agents;
mod cli;
mod config;
mod error;
mod host;
mod npm;
mod utils;
mod workflow;

use agents::DialoguerPrompt;
use clap::Parser;
use cli::{Cli, Commands};
use host::TerminalHost;
use std::process;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("steamer_update=debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let host = TerminalHost::new(cli.config.clone(), cli.overrides());

    // Stage failures have already been reported through the host.
    let result = match cli.command.unwrap_or(Commands::Update) {
        Commands::Update => workflow::execute_update(&host, &DialoguerPrompt).map(|_| ()),
        Commands::Check => workflow::execute_check(&host).map(|_| ()),
    };

    if let Err(e) = result {
        tracing::debug!("Run aborted: {e:?}");
        process::exit(1);
    }
}
