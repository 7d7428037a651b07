// Main entry point for hottest

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use hottest::cli::{self, Cli};
use hottest::commands;
use hottest::config::{Config, ENV_NO_COLOR};
use hottest::logging;
use hottest::state::RunOutcome;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from file (if exists)
    let config = Config::load().unwrap_or_default().with_env();

    logging::init();
    debug!("Starting hottest v{}", env!("CARGO_PKG_VERSION"));

    let no_color = std::env::var(ENV_NO_COLOR).ok();
    if config.colors_disabled(no_color.as_deref()) {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    } else if config.colors_forced(std::env::var("CI").ok().as_deref()) {
        console::set_colors_enabled(true);
        console::set_colors_enabled_stderr(true);
    }

    if !cli.has_go_test_args() {
        print!("{}", cli::usage());
        return Ok(());
    }

    match commands::run_tests(&cli, &config).await {
        Ok(RunOutcome::Success) => Ok(()),
        Ok(RunOutcome::TestsFailed | RunOutcome::ExecutionFault) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
