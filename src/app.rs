//! Main and kLa workflows.
//!
//! Each workflow is independent: an error in one is logged and recorded in
//! the run summary, and the remaining workflows still run.

use crate::config::Config;
use crate::error::{CultureError, Result};
use crate::loader::DataLoader;
use crate::models::{
    DatasetKind, KlaFrame, ProcessedCulture, RunSummary, WorkflowOutcome, WorkflowStatus,
};
use crate::plotter::Plotter;
use crate::processor::DataProcessor;
use clap::ValueEnum;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};

pub const MAIN_WORKFLOW: &str = "main";
pub const KLA_WORKFLOW: &str = "kla";

/// Which workflows a run executes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum WorkflowSelection {
    #[default]
    All,
    Main,
    Kla,
}

impl WorkflowSelection {
    pub fn includes_main(&self) -> bool {
        matches!(self, WorkflowSelection::All | WorkflowSelection::Main)
    }

    pub fn includes_kla(&self) -> bool {
        matches!(self, WorkflowSelection::All | WorkflowSelection::Kla)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Load and process without rendering
    pub dry_run: bool,
    pub workflow: WorkflowSelection,
}

/// Result of the main workflow
#[derive(Debug, Clone)]
pub struct MainOutput {
    pub culture: ProcessedCulture,
    pub plot: Option<PathBuf>,
}

/// Result of one kLa workflow
#[derive(Debug, Clone)]
pub struct KlaOutput {
    pub kla: KlaFrame,
    pub plot: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct CultureApp {
    config: Config,
    root: PathBuf,
    options: RunOptions,
    loader: DataLoader,
}

impl CultureApp {
    pub fn new(config: Config, root: &Path, options: RunOptions) -> Self {
        let loader = DataLoader::new(&config.data_loader, root);
        Self {
            config,
            root: root.to_path_buf(),
            options,
            loader,
        }
    }

    pub fn loader(&self) -> &DataLoader {
        &self.loader
    }

    /// Load, process and render the offline and online data
    pub fn run_main_workflow(&self) -> Result<MainOutput> {
        info!("Starting main workflow");

        for path in [self.loader.offline_path(), self.loader.online_path()] {
            if !path.exists() {
                error!("Data file not found: {}", path.display());
                return Err(CultureError::FileNotFound { path });
            }
        }

        let (offline_data, mut online_data) = self.loader.load_data()?;
        self.loader.process_online_time_column(&mut online_data)?;
        self.loader.convert_columns_to_numeric(
            &mut online_data,
            &self.config.data_processor.online_numeric_columns,
            DatasetKind::Online,
        )?;

        let culture = DataProcessor::new(Some(offline_data), Some(online_data)).process()?;

        let plot = if self.options.dry_run {
            info!("Dry run: skipping main culture plot");
            None
        } else {
            Some(self.plotter()?.plot_culture(&culture)?)
        };

        info!("Main workflow finished");
        Ok(MainOutput { culture, plot })
    }

    /// Load, preprocess and render one kLa export
    pub fn run_kla_workflow(&self, file_path: &Path) -> Result<KlaOutput> {
        let file_name = file_name(file_path);
        info!("Processing kLa file: {}", file_name);

        let kla = self.loader.load_kla_data(file_path)?;
        debug!("kLa units for {}: {:?}", file_name, kla.units);

        let plot = if self.options.dry_run {
            info!("Dry run: skipping kLa plot for {}", file_name);
            None
        } else {
            Some(self.plotter()?.plot_kla(&kla, &file_name)?)
        };

        Ok(KlaOutput { kla, plot })
    }

    pub fn discover_kla_files(&self) -> Result<Vec<PathBuf>> {
        self.loader.discover_kla_files()
    }

    /// Run the selected workflows, recording how each one ended
    pub fn run(&self) -> RunSummary {
        let start_time = Instant::now();
        let mut outcomes = Vec::new();

        if self.options.workflow.includes_main() {
            let status = workflow_status(MAIN_WORKFLOW, self.run_main_workflow().map(|o| o.plot));
            outcomes.push(WorkflowOutcome {
                name: MAIN_WORKFLOW.to_string(),
                status,
            });
        }

        if self.options.workflow.includes_kla() {
            outcomes.extend(self.run_kla_workflows());
        }

        RunSummary {
            outcomes,
            processing_time_ms: start_time.elapsed().as_millis(),
        }
    }

    fn run_kla_workflows(&self) -> Vec<WorkflowOutcome> {
        let kla_dir = self.loader.kla_dir();
        if !kla_dir.is_dir() {
            error!("kLa directory not found: {}", kla_dir.display());
            return vec![WorkflowOutcome {
                name: KLA_WORKFLOW.to_string(),
                status: WorkflowStatus::Skipped {
                    reason: format!("directory not found: {}", kla_dir.display()),
                },
            }];
        }

        let files = match self.discover_kla_files() {
            Ok(files) => files,
            Err(e) => {
                error!("kLa file discovery failed: {}", e);
                return vec![WorkflowOutcome {
                    name: KLA_WORKFLOW.to_string(),
                    status: WorkflowStatus::Failed {
                        error: e.to_string(),
                    },
                }];
            }
        };

        if files.is_empty() {
            warn!("No kLa files found in {}", kla_dir.display());
            return vec![WorkflowOutcome {
                name: KLA_WORKFLOW.to_string(),
                status: WorkflowStatus::Skipped {
                    reason: format!("no files match '{}'", self.config.data_loader.kla_pattern),
                },
            }];
        }

        let pb = create_progress_bar(files.len() as u64, "kLa files");
        let mut outcomes = Vec::with_capacity(files.len());
        for file_path in &files {
            let name = format!("{}:{}", KLA_WORKFLOW, file_name(file_path));
            pb.set_message(name.clone());
            let status = workflow_status(&name, self.run_kla_workflow(file_path).map(|o| o.plot));
            outcomes.push(WorkflowOutcome { name, status });
            pb.inc(1);
        }
        pb.finish_with_message(format!("Processed {} kLa files", files.len()));

        outcomes
    }

    fn plotter(&self) -> Result<Plotter> {
        Plotter::new(&self.config.plotter, &self.root)
    }
}

/// Map a workflow result onto its outcome, logging failures
fn workflow_status(name: &str, result: Result<Option<PathBuf>>) -> WorkflowStatus {
    match result {
        Ok(plot) => WorkflowStatus::Completed { plot },
        Err(CultureError::FileNotFound { path }) => {
            error!("Workflow '{}' skipped, file not found: {}", name, path.display());
            WorkflowStatus::Skipped {
                reason: format!("file not found: {}", path.display()),
            }
        }
        Err(e) => {
            error!("Workflow '{}' failed: {}", name, e);
            WorkflowStatus::Failed {
                error: e.to_string(),
            }
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .expect("progress bar template is valid")
        .progress_chars("#>-");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// Print the colored end-of-run summary
pub fn print_summary(summary: &RunSummary) {
    println!("\n{}", "Run Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        summary.processing_time_ms.to_string().bright_white()
    );

    for outcome in &summary.outcomes {
        match &outcome.status {
            WorkflowStatus::Completed { plot: Some(path) } => println!(
                "  {} {} -> {}",
                "Completed".bright_green(),
                outcome.name.bright_white(),
                path.display()
            ),
            WorkflowStatus::Completed { plot: None } => println!(
                "  {} {} (no plot)",
                "Completed".bright_green(),
                outcome.name.bright_white()
            ),
            WorkflowStatus::Skipped { reason } => println!(
                "  {} {}: {}",
                "Skipped".bright_yellow(),
                outcome.name.bright_white(),
                reason
            ),
            WorkflowStatus::Failed { error } => println!(
                "  {} {}: {}",
                "Failed".bright_red().bold(),
                outcome.name.bright_white(),
                error.bright_red()
            ),
        }
    }

    println!(
        "  {} {} completed, {} skipped, {} failed",
        "Workflows:".bright_cyan(),
        summary.completed().to_string().bright_white().bold(),
        summary.skipped().to_string().bright_white(),
        if summary.has_failures() {
            summary.failed().to_string().bright_red().bold()
        } else {
            summary.failed().to_string().bright_white()
        }
    );
}
