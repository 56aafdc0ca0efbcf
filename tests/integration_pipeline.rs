//! End-to-end tests of the main and kLa workflows
//!
//! Each test writes a small project (configuration, offline/online sheets and
//! UTF-16LE kLa exports) into a temporary directory and runs the workflows
//! against it in dry-run mode, so no fonts are needed.

use culture_plotter::app::{CultureApp, RunOptions, WorkflowSelection};
use culture_plotter::config::Config;
use culture_plotter::encoding::encode_utf16le;
use culture_plotter::models::WorkflowStatus;
use polars::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CONFIG: &str = r#"
[data_loader]
offline_file = "data/offline.txt"
online_file = "data/online.txt"
kla_dir = "data/kla"
column_separator = "\t"
decimal_separator = ","
encoding = "latin-1"

[data_processor]
online_numeric_columns = ["spH", "spO2", "NStirrer", "sTR", "sCO2", "sO2", "FAirIn", "sVR", "FGlucose"]

[plotter]
figsize_main = [17.0, 12.0]
figsize_kla = [14.0, 8.0]
style = "whitegrid"
plot_dir = "plots"
dpi = 50

[logging]
level = "debug"
format = "compact"
handlers = [{ type = "stream" }]
"#;

const OFFLINE: &str = "Zeit_BTM\tZeit_G\tZeit_E\tBTM\tEtOH\tGlu\n\
                       0\t0\t0\t0,5\t0\t20,0\n\
                       4\t4\t4\t1,5\t0,8\t16,4\n\
                       8\t8\t8\t#NAN\t2,1\t#DIV/0!\n";

const ONLINE: &str = "Zeit\tspH\tspO2\tNStirrer\tsTR\tsCO2\tsO2\tFAirIn\tsVR\tFGlucose\tZeit_FG\n\
                      12:00:00.000\t5,0\t100\t400\t30\t0,1\t20,9\t1,0\t1,5\t\t12:00:00\n\
                      12:30:00.000\t5,0\t95\t\t30\t0,4\t20,6\t\t1,5\t0,2\t12:30:00\n\
                      13:00:00.000\t4,9\t#NAN\t450\t30\t0,9\t20,1\t1,2\t1,6\t0,3\t13:00:00\n";

const KLA: &str = "Bioreactor export\r\nOperator;Group 1\r\n\
                   Time;spO2;sO2;NStirrer;FAirIn\r\n\
                   ;%;%;rpm;L/min\r\n\
                   01.01.2024 12:00:00;0,0;20,9;400;1,0\r\n\
                   invalid_time;5,0;20,9;400;1,0\r\n\
                   01.01.2024 12:00:30;12,5;20,8;400;1,0\r\n\
                   01.01.2024 12:01:00;20,0;20,8;400;1,0\r\n";

fn write_project(root: &Path) -> Config {
    let data = root.join("data");
    fs::create_dir_all(data.join("kla")).unwrap();
    fs::write(data.join("offline.txt"), OFFLINE).unwrap();
    fs::write(data.join("online.txt"), ONLINE).unwrap();
    fs::write(
        data.join("kla").join("Daten(kLa)400rpm 3L.txt"),
        encode_utf16le(KLA),
    )
    .unwrap();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), CONFIG).unwrap();
    Config::load(&config_dir.join("config.toml")).unwrap()
}

fn dry_run(workflow: WorkflowSelection) -> RunOptions {
    RunOptions {
        dry_run: true,
        workflow,
    }
}

#[test]
fn test_main_workflow_dry_run() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_project(temp_dir.path());
    let app = CultureApp::new(config, temp_dir.path(), dry_run(WorkflowSelection::Main));

    let output = app.run_main_workflow().unwrap();
    assert!(output.plot.is_none());
    assert!(!temp_dir.path().join("plots").exists());

    let culture = output.culture;
    let hours: Vec<Option<f64>> = culture.feed.time_hours.f64().unwrap().into_iter().collect();
    assert_eq!(hours, vec![Some(0.0), Some(0.5), Some(1.0)]);

    let feed_mask: Vec<Option<bool>> = culture.masks.feed_glucose.into_iter().collect();
    assert_eq!(feed_mask, vec![Some(false), Some(true), Some(true)]);

    let aeration: Vec<Option<bool>> = culture.masks.aeration.into_iter().collect();
    assert_eq!(aeration, vec![Some(true), Some(false), Some(true)]);

    assert_eq!(culture.offline.biomass.null_count(), 1);
    assert_eq!(culture.offline.glucose.null_count(), 1);
    assert_eq!(
        culture.online.column("spO2").unwrap().dtype(),
        &DataType::Float64
    );
    assert_eq!(culture.online.column("time").unwrap().dtype(), &DataType::Time);
}

#[test]
fn test_rerun_yields_identical_tables() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_project(temp_dir.path());
    let app = CultureApp::new(config, temp_dir.path(), dry_run(WorkflowSelection::All));

    let first = app.run_main_workflow().unwrap().culture;
    let second = app.run_main_workflow().unwrap().culture;
    assert!(first.online.equals_missing(&second.online));
    assert!(first.offline.biomass.equals_missing(&second.offline.biomass));

    let kla_file = app.discover_kla_files().unwrap().remove(0);
    let first_kla = app.run_kla_workflow(&kla_file).unwrap().kla;
    let second_kla = app.run_kla_workflow(&kla_file).unwrap().kla;
    assert!(first_kla.frame.equals_missing(&second_kla.frame));
}

#[test]
fn test_kla_workflow_drops_invalid_rows() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_project(temp_dir.path());
    let app = CultureApp::new(config, temp_dir.path(), dry_run(WorkflowSelection::Kla));

    let files = app.discover_kla_files().unwrap();
    assert_eq!(files.len(), 1);

    let output = app.run_kla_workflow(&files[0]).unwrap();
    assert_eq!(output.kla.dropped_rows, 1);
    assert_eq!(output.kla.frame.height(), 3);
    assert_eq!(
        output.kla.units.get("FAirIn").map(String::as_str),
        Some("L/min")
    );

    let spo2: Vec<Option<f64>> = output
        .kla
        .frame
        .column("spO2")
        .unwrap()
        .as_materialized_series()
        .f64()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(spo2, vec![Some(0.0), Some(12.5), Some(20.0)]);
}

#[test]
fn test_run_summary_records_every_workflow() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_project(temp_dir.path());
    let app = CultureApp::new(config, temp_dir.path(), dry_run(WorkflowSelection::All));

    let summary = app.run();

    assert_eq!(summary.outcomes.len(), 2);
    assert_eq!(summary.completed(), 2);
    assert!(!summary.has_failures());
    assert_eq!(summary.outcomes[0].name, "main");
    assert_eq!(summary.outcomes[1].name, "kla:Daten(kLa)400rpm 3L.txt");
}

#[test]
fn test_missing_online_file_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_project(temp_dir.path());
    fs::remove_file(temp_dir.path().join("data").join("online.txt")).unwrap();
    let app = CultureApp::new(config, temp_dir.path(), dry_run(WorkflowSelection::All));

    let summary = app.run();

    match &summary.outcomes[0].status {
        WorkflowStatus::Skipped { reason } => assert!(reason.contains("online.txt")),
        other => panic!("Expected Skipped, got {:?}", other),
    }
    assert_eq!(summary.completed(), 1);
}

#[test]
fn test_kla_without_header_fails_and_others_continue() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_project(temp_dir.path());
    fs::write(
        temp_dir.path().join("data").join("kla").join("A_broken.txt"),
        encode_utf16le("no header here\r\n1;2\r\n"),
    )
    .unwrap();
    let app = CultureApp::new(config, temp_dir.path(), dry_run(WorkflowSelection::Kla));

    let summary = app.run();

    assert_eq!(summary.outcomes.len(), 2);
    match &summary.outcomes[0].status {
        WorkflowStatus::Failed { error } => assert!(error.contains("Time")),
        other => panic!("Expected Failed, got {:?}", other),
    }
    assert!(matches!(
        summary.outcomes[1].status,
        WorkflowStatus::Completed { plot: None }
    ));
    assert!(summary.has_failures());
}
