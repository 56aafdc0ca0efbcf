//! Scenario tests for the processor module
//!
//! Builds small offline and online tables shaped like the instrument
//! exports and checks the derived series and masks.

pub mod mask_tests;
pub mod offline_tests;
pub mod pipeline_tests;

use polars::prelude::*;

/// Offline table with every required column
pub fn offline_frame() -> DataFrame {
    DataFrame::new(vec![
        Column::new("Zeit_BTM".into(), &[Some("0"), Some("2.5")]),
        Column::new("Zeit_G".into(), &[Some("0"), Some("2.5")]),
        Column::new("Zeit_E".into(), &[Some("0"), None]),
        Column::new("BTM".into(), &[Some("1.5"), Some("#NAN")]),
        Column::new("EtOH".into(), &[Some("0.1"), Some("0.4")]),
        Column::new("Glu".into(), &[Some("20.0"), Some("18.2")]),
    ])
    .unwrap()
}

/// Online table with airflow, stirrer and feed columns
pub fn online_frame() -> DataFrame {
    DataFrame::new(vec![
        Column::new(
            "Zeit_FG".into(),
            &[Some("12:00:00"), Some("12:30:00"), Some("13:00:00")],
        ),
        Column::new("FGlucose".into(), &[None, Some(10.0), Some(15.0)]),
        Column::new("FAirIn".into(), &[Some(1.0), None, Some(2.0)]),
        Column::new("NStirrer".into(), &[Some(400.0), Some(400.0), None]),
    ])
    .unwrap()
}

pub fn f64_values(series: &Series) -> Vec<Option<f64>> {
    series.f64().unwrap().into_iter().collect()
}

pub fn bool_values(mask: &BooleanChunked) -> Vec<Option<bool>> {
    mask.into_iter().collect()
}
