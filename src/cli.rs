//! Command-line interface.

use crate::app::{RunOptions, WorkflowSelection};
use crate::config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "culture-plotter")]
#[command(about = "Load bioreactor lab exports and render culture and kLa charts")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Configuration file (defaults to <root>/config/config.toml, then the user config directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Project root that relative paths in the configuration resolve against
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Workflows to run
    #[arg(short, long, value_enum, default_value_t = WorkflowSelection::All)]
    pub workflow: WorkflowSelection,

    /// Load and process the data without rendering charts
    #[arg(long)]
    pub dry_run: bool,

    /// Exit with status 1 when any workflow failed
    #[arg(long)]
    pub strict: bool,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Level forced by `-v`/`-q`, if any
    pub fn level_override(&self) -> Option<LogLevel> {
        if self.verbose {
            Some(LogLevel::Debug)
        } else if self.quiet {
            Some(LogLevel::Warn)
        } else {
            None
        }
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            dry_run: self.dry_run,
            workflow: self.workflow,
        }
    }
}
