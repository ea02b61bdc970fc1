//! bqdoc CLI - BigQuery dataset schema documentation tool.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Extract {
            dataset,
            output,
            project,
        } => commands::extract::run(dataset, output, project, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Install the global tracing subscriber.
///
/// Defaults to `info` (`debug` with `--verbose`); `RUST_LOG` overrides both.
/// Diagnostics go to stderr so stdout stays clean for shell redirection.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
