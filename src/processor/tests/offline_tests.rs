//! Offline extraction tests

use super::{f64_values, offline_frame};
use crate::error::CultureError;
use crate::processor::extract_offline_columns;

#[test]
fn test_extract_offline_columns_coerces_analytes() {
    let series = extract_offline_columns(&offline_frame()).unwrap();

    assert_eq!(f64_values(&series.biomass), vec![Some(1.5), None]);
    assert_eq!(f64_values(&series.glucose), vec![Some(20.0), Some(18.2)]);
    assert_eq!(series.time_ethanol.null_count(), 1);
    assert_eq!(series.time_biomass.str().unwrap().get(1), Some("2.5"));
}

#[test]
fn test_missing_biomass_column_is_named() {
    let offline = offline_frame().drop("BTM").unwrap();

    match extract_offline_columns(&offline) {
        Err(CultureError::MissingColumns { dataset, columns }) => {
            assert_eq!(dataset, "offline");
            assert_eq!(columns, vec!["BTM"]);
        }
        other => panic!("Expected MissingColumns error, got {:?}", other),
    }
}

#[test]
fn test_missing_columns_reported_in_declaration_order() {
    let offline = offline_frame().drop("Glu").unwrap().drop("Zeit_G").unwrap();

    match extract_offline_columns(&offline) {
        Err(CultureError::MissingColumns { columns, .. }) => {
            assert_eq!(columns, vec!["Zeit_G", "Glu"]);
        }
        other => panic!("Expected MissingColumns error, got {:?}", other),
    }
}
