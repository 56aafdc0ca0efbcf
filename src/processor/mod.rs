//! Alignment and derivation of plotting series.
//!
//! Turns the loaded offline and online tables into the series the culture
//! chart consumes: offline analytes with their own timestamps, the glucose
//! feed on a relative hour axis, and validity masks over the online table.

pub mod feed;
pub mod masks;
pub mod offline;

#[cfg(test)]
pub mod tests;

pub use self::feed::calculate_feed_time;
pub use self::masks::valid_masks;
pub use self::offline::extract_offline_columns;

use crate::error::{CultureError, Result};
use crate::models::{DatasetKind, ProcessedCulture};
use polars::prelude::{BooleanChunked, DataFrame};
use tracing::{debug, info};

/// Holds the loaded tables until they are processed
#[derive(Debug, Clone, Default)]
pub struct DataProcessor {
    offline: Option<DataFrame>,
    online: Option<DataFrame>,
}

impl DataProcessor {
    pub fn new(offline: Option<DataFrame>, online: Option<DataFrame>) -> Self {
        Self { offline, online }
    }

    /// Run offline extraction, feed-time derivation and mask computation
    pub fn process(&self) -> Result<ProcessedCulture> {
        let offline = self
            .offline
            .as_ref()
            .ok_or_else(|| not_loaded(DatasetKind::Offline))?;
        let mut online = self
            .online
            .clone()
            .ok_or_else(|| not_loaded(DatasetKind::Online))?;

        info!("Processing culture data");
        let offline_series = extract_offline_columns(offline)?;
        let feed = calculate_feed_time(&mut online)?;
        let masks = valid_masks(&online)?;
        debug!(
            "Masks: aeration {} valid, stirrer {} valid, feed {} valid",
            count_true(&masks.aeration),
            count_true(&masks.stirrer),
            count_true(&masks.feed_glucose)
        );

        Ok(ProcessedCulture {
            offline: offline_series,
            feed,
            masks,
            online,
        })
    }
}

fn count_true(mask: &BooleanChunked) -> usize {
    mask.into_iter().filter(|v| *v == Some(true)).count()
}

fn not_loaded(dataset: DatasetKind) -> CultureError {
    CultureError::DataNotLoaded {
        dataset: dataset.name().to_string(),
    }
}

/// Fail with the subset of `required` missing from `frame`, in declaration order
pub(crate) fn require_columns(
    frame: &DataFrame,
    required: &[&str],
    dataset: DatasetKind,
) -> Result<()> {
    let missing: Vec<String> = required
        .iter()
        .filter(|name| frame.get_column_index(name).is_none())
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CultureError::missing_columns(dataset.name(), missing))
    }
}
