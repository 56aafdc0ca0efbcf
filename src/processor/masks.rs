use super::require_columns;
use crate::constants::online;
use crate::error::Result;
use crate::models::{DatasetKind, ValidityMasks};
use polars::prelude::*;
use tracing::info;

/// Row masks marking present values of airflow, stirrer speed and glucose feed
///
/// The feed mask requires both the derived feed time and the feed value.
pub fn valid_masks(online_data: &DataFrame) -> Result<ValidityMasks> {
    info!("Creating valid masks");
    require_columns(online_data, online::MASK_REQUIRED, DatasetKind::Online)?;

    let present = |name: &str| -> Result<BooleanChunked> {
        Ok(online_data.column(name)?.is_not_null())
    };

    let aeration = present(online::AIRFLOW)?;
    let stirrer = present(online::STIRRER)?;
    let feed_glucose = &present(online::FEED_TIME_HOURS)? & &present(online::FEED_GLUCOSE)?;

    Ok(ValidityMasks {
        aeration,
        stirrer,
        feed_glucose,
    })
}
