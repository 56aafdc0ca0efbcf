use super::require_columns;
use crate::constants::online;
use crate::error::Result;
use crate::models::{DatasetKind, FeedSeries};
use crate::normalize::{coerce_numeric, nanos_since_midnight, time_of_day_values};
use polars::prelude::*;
use tracing::{info, warn};

const NANOS_PER_HOUR: f64 = 3_600_000_000_000.0;

/// Derive `time_feed_glucose`, the feed time in hours since the first feed reading
///
/// The column is written into `online_data` together with the numerically
/// coerced feed values. Timestamps that are not `HH:MM:SS` give null hours.
pub fn calculate_feed_time(online_data: &mut DataFrame) -> Result<FeedSeries> {
    info!("Calculating feed time");
    require_columns(online_data, online::FEED_REQUIRED, DatasetKind::Online)?;

    let times = time_of_day_values(
        online_data.column(online::FEED_TIME)?.as_materialized_series(),
        false,
    )?;
    let nanos: Vec<Option<i64>> = times.iter().map(|t| t.map(nanos_since_midnight)).collect();

    let hours: Vec<Option<f64>> = match nanos.iter().flatten().min().copied() {
        Some(start) => nanos
            .iter()
            .map(|n| n.map(|n| (n - start) as f64 / NANOS_PER_HOUR))
            .collect(),
        None => {
            warn!("No valid feed timestamps in '{}'", online::FEED_TIME);
            vec![None; nanos.len()]
        }
    };

    let time_hours = Series::new(online::FEED_TIME_HOURS.into(), hours);
    let glucose_feed = coerce_numeric(
        online_data
            .column(online::FEED_GLUCOSE)?
            .as_materialized_series(),
    )?;

    online_data.with_column(time_hours.clone())?;
    online_data.with_column(glucose_feed.clone())?;

    Ok(FeedSeries {
        time_hours,
        glucose_feed,
    })
}
