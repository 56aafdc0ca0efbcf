//! Culture Plotter Library
//!
//! Loads bioreactor lab exports (offline samples, online sensor logs and
//! kLa aeration tests), normalizes their locale-specific number and time
//! formats, derives feed time and validity masks, and renders charts.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod encoding;
pub mod error;
pub mod header;
pub mod loader;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod plotter;
pub mod processor;
pub mod table;

pub use app::{CultureApp, RunOptions, WorkflowSelection};
pub use config::Config;
pub use error::{CultureError, Result};
pub use models::{KlaFrame, ProcessedCulture, RunSummary, WorkflowStatus};
