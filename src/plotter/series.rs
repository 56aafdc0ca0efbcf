//! Conversion of table columns into plottable points.

use crate::constants::{kla, online};
use crate::error::{CultureError, Result};
use crate::normalize::{coerce_numeric, nanos_since_midnight, parse_numeric, time_of_day_values};
use polars::prelude::*;
use std::ops::Range;
use tracing::warn;

const NANOS_PER_HOUR: f64 = 3_600_000_000_000.0;
const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// Column values as optional floats, coercing non-numbers to `None`
pub fn f64_values(series: &Series) -> Result<Vec<Option<f64>>> {
    let coerced = coerce_numeric(series)?;
    Ok(coerced.f64()?.into_iter().collect())
}

/// Offsets from the smallest present value, divided by `per_unit`
pub fn elapsed_since_start(raw: &[Option<i64>], per_unit: f64) -> Vec<Option<f64>> {
    match raw.iter().flatten().min().copied() {
        Some(start) => raw
            .iter()
            .map(|v| v.map(|v| (v - start) as f64 / per_unit))
            .collect(),
        None => vec![None; raw.len()],
    }
}

/// Offline sample times as elapsed hours
///
/// Columns whose values are all numbers are taken as hours already.
/// Otherwise values are read as times of day and measured from the
/// earliest sample.
pub fn offline_hours(series: &Series) -> Result<Vec<Option<f64>>> {
    if series.dtype().is_primitive_numeric() {
        return f64_values(series);
    }

    let strings = series.cast(&DataType::String)?;
    let strings = strings.str()?;
    let all_numeric = strings
        .into_iter()
        .flatten()
        .all(|value| parse_numeric(value).is_some());

    if all_numeric {
        return Ok(strings
            .into_iter()
            .map(|value| value.and_then(parse_numeric))
            .collect());
    }

    let nanos: Vec<Option<i64>> = time_of_day_values(series, true)?
        .into_iter()
        .map(|t| t.map(nanos_since_midnight))
        .collect();
    Ok(elapsed_since_start(&nanos, NANOS_PER_HOUR))
}

/// Online readings as hours since the earliest reading
pub fn online_hours(online_data: &DataFrame) -> Result<Vec<Option<f64>>> {
    let Some(index) = online_data.get_column_index(online::TIME) else {
        return Err(CultureError::missing_columns(
            "online",
            vec![online::TIME.to_string()],
        ));
    };
    let nanos = online_data.get_columns()[index]
        .as_materialized_series()
        .cast(&DataType::Int64)?;
    let nanos: Vec<Option<i64>> = nanos.i64()?.into_iter().collect();
    Ok(elapsed_since_start(&nanos, NANOS_PER_HOUR))
}

/// kLa readings as minutes since the first reading
pub fn kla_minutes(frame: &DataFrame) -> Result<Vec<Option<f64>>> {
    let millis = frame
        .column(kla::TIME)?
        .as_materialized_series()
        .cast(&DataType::Int64)?;
    let millis: Vec<Option<i64>> = millis.i64()?.into_iter().collect();
    Ok(elapsed_since_start(&millis, MILLIS_PER_MINUTE))
}

/// Values of an optional channel; a missing column is warned about and yields `None`
pub fn channel_values(frame: &DataFrame, name: &str) -> Result<Option<Vec<Option<f64>>>> {
    match frame.get_column_index(name) {
        Some(index) => Ok(Some(f64_values(
            frame.get_columns()[index].as_materialized_series(),
        )?)),
        None => {
            warn!("Column '{}' not found and will be skipped.", name);
            Ok(None)
        }
    }
}

/// Pair x and y by row, keeping rows where both are present and the mask allows
pub fn paired_points(
    x: &[Option<f64>],
    y: &[Option<f64>],
    mask: Option<&BooleanChunked>,
) -> Vec<(f64, f64)> {
    let allowed = |row: usize| match mask {
        Some(mask) => mask.get(row).unwrap_or(false),
        None => true,
    };

    x.iter()
        .zip(y.iter())
        .enumerate()
        .filter(|(row, _)| allowed(*row))
        .filter_map(|(_, pair)| match pair {
            (Some(x), Some(y)) => Some((*x, *y)),
            _ => None,
        })
        .collect()
}

/// Axis range covering `values` with a small margin
///
/// Empty input gives `0..1`; a single distinct value is widened by one unit
/// on each side.
pub fn axis_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if !min.is_finite() {
        return 0.0..1.0;
    }
    if (max - min).abs() < f64::EPSILON {
        return (min - 1.0)..(max + 1.0);
    }

    let margin = (max - min) * 0.05;
    (min - margin)..(max + margin)
}
