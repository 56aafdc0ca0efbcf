//! Column type coercion.
//!
//! Three coercion policies are implemented here:
//! - numeric: unparseable values and placeholders become null
//! - time-of-day: sub-second precision is dropped, unparseable values become null
//! - kLa timestamps: rows whose timestamp does not parse are dropped entirely

use crate::constants::{KLA_TIMESTAMP_FORMAT, NULL_PLACEHOLDERS, TIME_OF_DAY_FORMAT, kla};
use crate::error::{CultureError, Result};
use crate::models::{DatasetKind, KlaFrame, NumericConversion};
use chrono::{NaiveDateTime, NaiveTime, Timelike};
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Parse a number, mapping placeholders and non-finite results to `None`
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || NULL_PLACEHOLDERS.contains(&trimmed) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Coerce a column to `Float64`, nulling anything that is not a number
pub fn coerce_numeric(series: &Series) -> Result<Series> {
    let coerced = match series.dtype() {
        DataType::String => {
            let values: Vec<Option<f64>> = series
                .str()?
                .into_iter()
                .map(|value| value.and_then(parse_numeric))
                .collect();
            Series::new(series.name().clone(), values)
        }
        DataType::Float64 => series.clone(),
        _ => series.cast(&DataType::Float64)?,
    };
    Ok(coerced)
}

/// Coerce the listed columns in place; missing columns are skipped with a warning
pub fn convert_columns_to_numeric(
    frame: &mut DataFrame,
    columns: &[String],
    dataset: DatasetKind,
) -> Result<NumericConversion> {
    info!("Converting columns {:?} to numeric in {} data", columns, dataset);
    let mut conversion = NumericConversion::default();

    for name in columns {
        if frame.get_column_index(name).is_none() {
            warn!("Column '{}' not found in {} data. Skipping.", name, dataset);
            conversion.skipped.push(name.clone());
            continue;
        }

        let coerced = coerce_numeric(frame.column(name)?.as_materialized_series())?;
        frame.with_column(coerced)?;
        debug!("Column '{}' converted to numeric", name);
        conversion.converted.push(name.clone());
    }

    Ok(conversion)
}

/// Drop sub-second precision, e.g. `12:00:00.000` -> `12:00:00`
pub fn clean_time_of_day(raw: &str) -> &str {
    raw.split('.').next().unwrap_or(raw)
}

/// Parse an `HH:MM:SS` time of day
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), TIME_OF_DAY_FORMAT).ok()
}

/// Parse every value of a column as a time of day
///
/// With `truncate_subseconds` the raw value is cut at the first `.` before
/// parsing.
pub fn time_of_day_values(series: &Series, truncate_subseconds: bool) -> Result<Vec<Option<NaiveTime>>> {
    let strings = series.cast(&DataType::String)?;
    let values = strings
        .str()?
        .into_iter()
        .map(|value| {
            value.and_then(|raw| {
                if truncate_subseconds {
                    parse_time_of_day(clean_time_of_day(raw))
                } else {
                    parse_time_of_day(raw)
                }
            })
        })
        .collect();
    Ok(values)
}

/// Nanoseconds since midnight, the physical representation of polars `Time`
pub fn nanos_since_midnight(time: NaiveTime) -> i64 {
    time.num_seconds_from_midnight() as i64 * NANOS_PER_SECOND + time.nanosecond() as i64
}

/// Build a polars `Time` column
pub fn time_of_day_series(name: &str, values: &[Option<NaiveTime>]) -> Result<Series> {
    let nanos: Vec<Option<i64>> = values.iter().map(|t| t.map(nanos_since_midnight)).collect();
    Ok(Series::new(name.into(), nanos).cast(&DataType::Time)?)
}

/// Derive a time-of-day column from a raw timestamp column
///
/// Returns the number of values that failed to parse (stored as null).
pub fn derive_time_of_day_column(
    frame: &mut DataFrame,
    source: &str,
    target: &str,
    dataset: DatasetKind,
) -> Result<usize> {
    if frame.get_column_index(source).is_none() {
        return Err(CultureError::missing_columns(
            dataset.name(),
            vec![source.to_string()],
        ));
    }

    let values = time_of_day_values(frame.column(source)?.as_materialized_series(), true)?;
    let unparsed = values.iter().filter(|v| v.is_none()).count();
    frame.with_column(time_of_day_series(target, &values)?)?;

    if unparsed > 0 {
        debug!(
            "{} values in '{}' could not be parsed as time of day",
            unparsed, source
        );
    }
    Ok(unparsed)
}

/// Parse a day-first `DD.MM.YYYY HH:MM:SS` timestamp
pub fn parse_kla_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), KLA_TIMESTAMP_FORMAT).ok()
}

/// Clean a freshly parsed kLa table
///
/// Rows whose `Time` does not parse are counted, reported, and removed.
/// The remaining text columns are parsed as comma-decimal numbers.
pub fn preprocess_kla(mut frame: DataFrame, units: BTreeMap<String, String>) -> Result<KlaFrame> {
    info!("Preprocessing kLa data");

    let trimmed: Vec<String> = frame
        .get_column_names_str()
        .iter()
        .map(|name| name.trim().to_string())
        .collect();
    frame.set_column_names(trimmed)?;

    if frame.get_column_index(kla::TIME).is_none() {
        return Err(CultureError::missing_columns(
            "kLa",
            vec![kla::TIME.to_string()],
        ));
    }

    let raw_times = frame
        .column(kla::TIME)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    let timestamps: Vec<Option<i64>> = raw_times
        .str()?
        .into_iter()
        .map(|value| {
            value
                .and_then(parse_kla_timestamp)
                .map(|ts| ts.and_utc().timestamp_millis())
        })
        .collect();

    let invalid = timestamps.iter().filter(|ts| ts.is_none()).count();
    if invalid > 0 {
        warn!("{} rows have invalid timestamps.", invalid);
    }

    let time_column = Series::new(kla::TIME.into(), timestamps)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
    frame.with_column(time_column)?;

    let mut frame = frame
        .lazy()
        .filter(col(kla::TIME).is_not_null())
        .collect()?;

    let text_columns: Vec<String> = frame
        .get_columns()
        .iter()
        .filter(|column| column.name().as_str() != kla::TIME && column.dtype() == &DataType::String)
        .map(|column| column.name().to_string())
        .collect();

    for name in &text_columns {
        let values: Vec<Option<f64>> = frame
            .column(name)?
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|value| value.and_then(|raw| parse_numeric(&raw.replace(',', "."))))
            .collect();
        frame.with_column(Series::new(name.as_str().into(), values))?;
    }

    info!(
        "kLa data preprocessed: {} rows kept, {} dropped",
        frame.height(),
        invalid
    );

    Ok(KlaFrame {
        frame,
        dropped_rows: invalid,
        units,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_series(name: &str, values: &[Option<&str>]) -> Series {
        Series::new(name.into(), values)
    }

    #[test]
    fn test_placeholders_coerce_to_null() {
        for token in ["#NAN", "NaN", "nan", "#DIV/0!", "inf", "-inf"] {
            assert_eq!(parse_numeric(token), None, "token {}", token);
        }
        assert_eq!(parse_numeric("Infinity"), None);
        assert_eq!(parse_numeric(" 7.25 "), Some(7.25));
        assert_eq!(parse_numeric("abc"), None);
    }

    #[test]
    fn test_coerce_numeric_string_column() {
        let series = text_series("spH", &[Some("7.0"), Some("#NAN"), None, Some("x")]);
        let coerced = coerce_numeric(&series).unwrap();

        assert_eq!(coerced.name().as_str(), "spH");
        assert_eq!(coerced.dtype(), &DataType::Float64);
        let values: Vec<Option<f64>> = coerced.f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(7.0), None, None, None]);
    }

    #[test]
    fn test_coerce_numeric_integer_column_casts() {
        let series = Series::new("NStirrer".into(), &[100i64, 101]);
        let coerced = coerce_numeric(&series).unwrap();
        let values: Vec<Option<f64>> = coerced.f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(100.0), Some(101.0)]);
    }

    #[test]
    fn test_convert_columns_skips_missing() {
        let mut frame = DataFrame::new(vec![
            Column::new("spH".into(), &[Some("7.0"), Some("7.1")]),
            Column::new("sO2".into(), &[Some("20"), Some("oops")]),
        ])
        .unwrap();

        let conversion = convert_columns_to_numeric(
            &mut frame,
            &["spH".to_string(), "FGlucose".to_string(), "sO2".to_string()],
            DatasetKind::Online,
        )
        .unwrap();

        assert_eq!(conversion.converted, vec!["spH", "sO2"]);
        assert_eq!(conversion.skipped, vec!["FGlucose"]);
        assert_eq!(frame.column("sO2").unwrap().dtype(), &DataType::Float64);
        assert_eq!(frame.column("sO2").unwrap().null_count(), 1);
    }

    #[test]
    fn test_clean_and_parse_time_of_day() {
        assert_eq!(clean_time_of_day("12:00:00.000"), "12:00:00");
        assert_eq!(clean_time_of_day("12:00:00"), "12:00:00");
        assert_eq!(
            parse_time_of_day("13:30:05"),
            NaiveTime::from_hms_opt(13, 30, 5)
        );
        assert_eq!(parse_time_of_day("12:00:00.000"), None);
        assert_eq!(parse_time_of_day("noon"), None);
    }

    #[test]
    fn test_derive_time_column_coerces_bad_values() {
        let mut frame = DataFrame::new(vec![Column::new(
            "Zeit".into(),
            &[Some("12:00:00.000"), Some("bad"), Some("13:00:00.250")],
        )])
        .unwrap();

        let unparsed =
            derive_time_of_day_column(&mut frame, "Zeit", "time", DatasetKind::Online).unwrap();

        assert_eq!(unparsed, 1);
        let time = frame.column("time").unwrap();
        assert_eq!(time.dtype(), &DataType::Time);
        let nanos: Vec<Option<i64>> = time
            .as_materialized_series()
            .cast(&DataType::Int64)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(
            nanos,
            vec![Some(12 * 3600 * NANOS_PER_SECOND), None, Some(13 * 3600 * NANOS_PER_SECOND)]
        );
    }

    #[test]
    fn test_derive_time_column_requires_source() {
        let mut frame = DataFrame::new(vec![Column::new("spH".into(), &[Some("7.0")])]).unwrap();
        let result = derive_time_of_day_column(&mut frame, "Zeit", "time", DatasetKind::Online);
        match result {
            Err(CultureError::MissingColumns { columns, .. }) => assert_eq!(columns, vec!["Zeit"]),
            other => panic!("Expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_kla_invalid_timestamp_row_is_dropped() {
        let frame = DataFrame::new(vec![
            Column::new(
                "Time".into(),
                &[Some("01.01.2024 12:00:00"), Some("invalid_time")],
            ),
            Column::new("spO2".into(), &[Some("1,0"), Some("1,1")]),
        ])
        .unwrap();

        let kla_frame = preprocess_kla(frame, BTreeMap::new()).unwrap();

        assert_eq!(kla_frame.dropped_rows, 1);
        assert_eq!(kla_frame.frame.height(), 1);
        let spo2: Vec<Option<f64>> = kla_frame
            .frame
            .column("spO2")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(spo2, vec![Some(1.0)]);
        assert!(matches!(
            kla_frame.frame.column("Time").unwrap().dtype(),
            DataType::Datetime(TimeUnit::Milliseconds, None)
        ));
    }

    #[test]
    fn test_kla_timestamp_is_day_first() {
        let parsed = parse_kla_timestamp("02.03.2024 08:15:00").unwrap();
        assert_eq!(parsed.to_string(), "2024-03-02 08:15:00");
        assert_eq!(parse_kla_timestamp("2024-01-01 12:00:00"), None);
    }

    #[test]
    fn test_kla_requires_time_column() {
        let frame = DataFrame::new(vec![Column::new("spO2".into(), &[Some("1,0")])]).unwrap();
        assert!(matches!(
            preprocess_kla(frame, BTreeMap::new()),
            Err(CultureError::MissingColumns { .. })
        ));
    }
}
