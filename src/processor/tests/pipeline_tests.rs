//! End-to-end processor tests

use super::{bool_values, f64_values, offline_frame, online_frame};
use crate::error::CultureError;
use crate::processor::DataProcessor;

#[test]
fn test_process_combines_all_stages() {
    let processor = DataProcessor::new(Some(offline_frame()), Some(online_frame()));
    let culture = processor.process().unwrap();

    assert_eq!(
        f64_values(&culture.feed.time_hours),
        vec![Some(0.0), Some(0.5), Some(1.0)]
    );
    assert_eq!(
        bool_values(&culture.masks.feed_glucose),
        vec![Some(false), Some(true), Some(true)]
    );
    assert!(culture.online.column("time_feed_glucose").is_ok());
    assert_eq!(culture.offline.biomass.len(), 2);
}

#[test]
fn test_process_is_repeatable() {
    let processor = DataProcessor::new(Some(offline_frame()), Some(online_frame()));
    let first = processor.process().unwrap();
    let second = processor.process().unwrap();

    assert!(first.online.equals_missing(&second.online));
    assert!(first.feed.time_hours.equals_missing(&second.feed.time_hours));
}

#[test]
fn test_process_without_online_data() {
    let processor = DataProcessor::new(Some(offline_frame()), None);
    match processor.process() {
        Err(CultureError::DataNotLoaded { dataset }) => assert_eq!(dataset, "online"),
        other => panic!("Expected DataNotLoaded error, got {:?}", other),
    }
}
