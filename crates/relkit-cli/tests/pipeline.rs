//! Integration tests for the build pipeline stages.

use std::fs;
use std::io;
use std::path::Path;

use relkit_cli::pipeline::{
    build_into_file, build_into_store, build_stage, open_store, select_stage,
};
use relkit_core::SurvivalSink;
use relkit_ingest::{CsvIncidentSource, read_incident_csv};
use relkit_model::{AggregationMode, BuildOptions, IncidentRecord, SurvivalRecord};

const INCIDENTS: &str = "\
Unit,Incident ID,Part Num,Age,Failure,Request Date,Hardware ID
SN-1,1,P-1,10,1,2024-01-05,7
SN-1,2,P-1,40,1,2024-02-05,7
SN-1,3,P-1,20,1,2024-03-05,7
SN-1,4,P-1,50,1,2024-04-05,7
SN-2,5,P-2,0,0,2024-01-10,7
SN-2,6,P-2,15,1,2024-02-10,7
";

fn write_incidents(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("incidents.csv");
    fs::write(&path, INCIDENTS).unwrap();
    path
}

struct BrokenSink;

impl SurvivalSink for BrokenSink {
    type Error = io::Error;

    fn write_record(&mut self, _record: &SurvivalRecord) -> Result<(), Self::Error> {
        Err(io::Error::other("disk full"))
    }
}

#[test]
fn csv_to_file_with_skipped_report() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_incidents(dir.path());
    let output = dir.path().join("out").join("dataset.txt");
    let report = dir.path().join("skipped.json");
    let options = BuildOptions::new(AggregationMode::AllFailureTimes)
        .with_description("Pump fleet")
        .with_zero_hour(false);

    let incidents = select_stage(&CsvIncidentSource::new(&csv), &options).unwrap();
    assert_eq!(incidents.len(), 5);
    let outcome = build_into_file(&output, incidents, &options, Some(&report)).unwrap();
    assert_eq!(outcome.emitted, 4);
    assert_eq!(outcome.skipped_count(), 1);

    let contents = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "Data Set Description: Pump fleet");
    assert_eq!(lines.len(), 3 + 4);
    let rights: Vec<&str> = lines[3..]
        .iter()
        .map(|line| line.split('\t').nth(2).unwrap())
        .collect();
    assert_eq!(rights, vec!["10.0", "40.0", "50.0", "15.0"]);

    let skipped: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(skipped[0]["incident_id"], 3);
    assert_eq!(skipped[0]["reason"], "time_regression");
    assert_eq!(skipped[0]["compared_with"]["incident_id"], 2);
}

#[test]
fn imported_store_builds_numbered_datasets() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_incidents(dir.path());
    let store = dir.path().join("program.db");

    let mut db = open_store(&store).unwrap();
    db.import_incidents(&read_incident_csv(&csv).unwrap())
        .unwrap();
    let options = BuildOptions::new(AggregationMode::FirstFailureOnly)
        .with_assembly(7)
        .with_description("first failures");

    for expected_id in [1, 2] {
        let incidents = select_stage(&db, &options).unwrap();
        let (dataset_id, outcome) = build_into_store(&db, incidents, &options, None).unwrap();
        assert_eq!(dataset_id, expected_id);
        assert_eq!(outcome.emitted, 2);
    }

    let summaries = db.list_datasets().unwrap();
    assert_eq!(summaries.len(), 2);
    assert!(summaries.iter().all(|summary| summary.records == 2));
    assert_eq!(db.load_records(1).unwrap(), {
        let mut second = db.load_records(2).unwrap();
        for record in &mut second {
            record.dataset_id = 1;
        }
        second
    });
}

#[test]
fn sink_failure_aborts_the_run() {
    let incidents = vec![
        IncidentRecord::new("SN-1", 1, 10.0, 738_000),
        IncidentRecord::new("SN-1", 2, 20.0, 738_001),
    ];
    let error = build_stage(incidents, &mut BrokenSink).unwrap_err();
    assert_eq!(error.to_string(), "write survival records");
    assert_eq!(error.root_cause().to_string(), "disk full");
}

#[test]
fn missing_incident_file_fails_selection() {
    let dir = tempfile::tempdir().unwrap();
    let source = CsvIncidentSource::new(dir.path().join("absent.csv"));
    let error = select_stage(&source, &BuildOptions::default()).unwrap_err();
    assert_eq!(error.to_string(), "select incidents");
}
