//! Core data structures passed between pipeline stages.
//!
//! Tables are polars `DataFrame`s owned by the stage that produced them.
//! Masks are boolean chunked arrays aligned by row position to the online
//! table they were computed from.

use polars::prelude::{BooleanChunked, DataFrame, Series};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// The two sheet-style datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    Offline,
    Online,
}

impl DatasetKind {
    pub fn name(&self) -> &'static str {
        match self {
            DatasetKind::Offline => "offline",
            DatasetKind::Online => "online",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where tabular data starts inside a preamble-laden file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLocation {
    /// Number of lines to skip to reach the first data row
    pub data_start: usize,
    pub header: Option<String>,
    pub units: Option<String>,
}

impl HeaderLocation {
    pub fn not_found() -> Self {
        Self {
            data_start: 0,
            header: None,
            units: None,
        }
    }
}

/// Result of a numeric conversion pass over a table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumericConversion {
    pub converted: Vec<String>,
    pub skipped: Vec<String>,
}

/// Offline analyte series paired with their own raw timestamps
///
/// The three pairs are independently indexed by source row; no join is
/// performed between them.
#[derive(Debug, Clone)]
pub struct OfflineSeries {
    pub time_biomass: Series,
    pub time_glucose: Series,
    pub time_ethanol: Series,
    pub biomass: Series,
    pub ethanol: Series,
    pub glucose: Series,
}

/// Glucose feed series on a relative time axis
#[derive(Debug, Clone)]
pub struct FeedSeries {
    /// Hours since the earliest feed timestamp
    pub time_hours: Series,
    pub glucose_feed: Series,
}

/// Row masks marking usable entries of the online table
#[derive(Debug, Clone)]
pub struct ValidityMasks {
    pub aeration: BooleanChunked,
    pub stirrer: BooleanChunked,
    pub feed_glucose: BooleanChunked,
}

/// Everything the culture chart consumes
#[derive(Debug, Clone)]
pub struct ProcessedCulture {
    pub offline: OfflineSeries,
    pub feed: FeedSeries,
    pub masks: ValidityMasks,
    pub online: DataFrame,
}

/// A preprocessed kLa table
#[derive(Debug, Clone)]
pub struct KlaFrame {
    pub frame: DataFrame,
    /// Rows removed because their timestamp did not parse
    pub dropped_rows: usize,
    /// Column name to unit, taken from the units line
    pub units: BTreeMap<String, String>,
}

/// How a single workflow ended
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowStatus {
    Completed { plot: Option<PathBuf> },
    Skipped { reason: String },
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowOutcome {
    pub name: String,
    pub status: WorkflowStatus,
}

/// Outcomes of one invocation
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<WorkflowOutcome>,
    pub processing_time_ms: u128,
}

impl RunSummary {
    pub fn completed(&self) -> usize {
        self.count(|s| matches!(s, WorkflowStatus::Completed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, WorkflowStatus::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, WorkflowStatus::Failed { .. }))
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// Plot files written during the run
    pub fn plots(&self) -> Vec<&PathBuf> {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.status {
                WorkflowStatus::Completed { plot: Some(path) } => Some(path),
                _ => None,
            })
            .collect()
    }

    fn count(&self, predicate: impl Fn(&WorkflowStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| predicate(&o.status)).count()
    }
}
