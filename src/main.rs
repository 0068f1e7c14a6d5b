//! bower-update - bower.json dependency version updater CLI tool
//!
//! Looks up newer versions of the dependencies declared in bower.json,
//! lets the operator pick new targets and rewrites the manifest.

use bower_update::cli::CliArgs;
use bower_update::console::Console;
use bower_update::manifest::BowerrcSettings;
use bower_update::orchestrator::Orchestrator;
use bower_update::prompt::TerminalPrompter;
use clap::Parser;
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Diagnostics go to stderr, filtered by RUST_LOG
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<()> {
    let verbose = args.verbose;
    if verbose {
        eprintln!("bower-update v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Target: {}", args.path.display());
    }

    let settings = BowerrcSettings::from_dir(&args.path)?;
    let options = args.into_options(&settings);

    let console = Arc::new(Console::stdio(verbose));
    let orchestrator =
        Orchestrator::new(options, console)?.with_progress(io::stderr().is_terminal());

    let mut prompter = TerminalPrompter::stdio();
    orchestrator.run(&mut prompter).await?;

    Ok(())
}
