//! Validity mask tests

use super::{bool_values, online_frame};
use crate::error::CultureError;
use crate::processor::valid_masks;
use polars::prelude::*;

fn masked_frame() -> DataFrame {
    DataFrame::new(vec![
        Column::new("FAirIn".into(), &[Some(1.0), None, Some(2.0)]),
        Column::new("NStirrer".into(), &[Some(400.0), Some(400.0), None]),
        Column::new("time_feed_glucose".into(), &[Some(1.0), None, Some(2.0)]),
        Column::new("FGlucose".into(), &[None, Some(10.0), Some(15.0)]),
    ])
    .unwrap()
}

#[test]
fn test_aeration_and_feed_masks() {
    let masks = valid_masks(&masked_frame()).unwrap();

    assert_eq!(
        bool_values(&masks.aeration),
        vec![Some(true), Some(false), Some(true)]
    );
    assert_eq!(
        bool_values(&masks.stirrer),
        vec![Some(true), Some(true), Some(false)]
    );
    assert_eq!(
        bool_values(&masks.feed_glucose),
        vec![Some(false), Some(false), Some(true)]
    );
}

#[test]
fn test_masks_match_table_length() {
    let frame = masked_frame();
    let masks = valid_masks(&frame).unwrap();
    assert_eq!(masks.aeration.len(), frame.height());
    assert_eq!(masks.feed_glucose.len(), frame.height());
}

#[test]
fn test_masks_require_derived_feed_time() {
    match valid_masks(&online_frame()) {
        Err(CultureError::MissingColumns { columns, .. }) => {
            assert_eq!(columns, vec!["time_feed_glucose"]);
        }
        other => panic!("Expected MissingColumns error, got {:?}", other),
    }
}
