use super::require_columns;
use crate::constants::offline;
use crate::error::Result;
use crate::models::{DatasetKind, OfflineSeries};
use crate::normalize::coerce_numeric;
use polars::prelude::*;
use tracing::info;

/// Extract the analyte series and their paired raw timestamps
///
/// Analytes are coerced to numbers; timestamps are passed through as read.
pub fn extract_offline_columns(offline_data: &DataFrame) -> Result<OfflineSeries> {
    info!("Extracting offline data columns");
    require_columns(offline_data, offline::REQUIRED, DatasetKind::Offline)?;

    let raw = |name: &str| -> Result<Series> {
        Ok(offline_data
            .column(name)?
            .as_materialized_series()
            .clone())
    };
    let numeric = |name: &str| -> Result<Series> {
        coerce_numeric(offline_data.column(name)?.as_materialized_series())
    };

    Ok(OfflineSeries {
        time_biomass: raw(offline::TIME_BIOMASS)?,
        time_glucose: raw(offline::TIME_GLUCOSE)?,
        time_ethanol: raw(offline::TIME_ETHANOL)?,
        biomass: numeric(offline::BIOMASS)?,
        ethanol: numeric(offline::ETHANOL)?,
        glucose: numeric(offline::GLUCOSE)?,
    })
}
