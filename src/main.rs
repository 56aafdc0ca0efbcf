use anyhow::Context;
use clap::Parser;
use culture_plotter::app::{CultureApp, print_summary};
use culture_plotter::cli::Args;
use culture_plotter::config::{Config, find_config_path};
use culture_plotter::logging::setup_logging;
use std::process;
use tracing::info;

fn main() {
    let args = Args::parse();

    match run(&args) {
        Ok(failed) if failed && args.strict => process::exit(1),
        Ok(_) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Returns whether any workflow failed
fn run(args: &Args) -> anyhow::Result<bool> {
    let config_path = find_config_path(args.config.as_deref(), &args.root)?;
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load configuration {}", config_path.display()))?;

    setup_logging(&config.logging, args.level_override(), &args.root)?;
    info!("Using configuration {}", config_path.display());

    let app = CultureApp::new(config, &args.root, args.run_options());
    let summary = app.run();
    print_summary(&summary);

    Ok(summary.has_failures())
}
