use relkit_core::{SurvivalSink, build_intervals};
use relkit_ingest::select;
use relkit_model::{AggregationMode, BuildOptions, CensoringStatus, IncidentRecord, SurvivalRecord};
use relkit_store::{ProgramDb, StoreError};

fn fleet() -> Vec<IncidentRecord> {
    vec![
        IncidentRecord::new("SN-1", 1, 10.0, 738_000).with_assembly(4),
        IncidentRecord::new("SN-1", 2, 25.0, 738_010).with_assembly(4),
        IncidentRecord::new("SN-1", 3, 25.0, 738_011).with_assembly(4),
        IncidentRecord::new("SN-1", 4, 40.0, 738_020).with_assembly(4),
        IncidentRecord::new("SN-2", 5, 5.0, 738_005).with_assembly(4),
        IncidentRecord::new("SN-2", 6, 3.0, 738_015).with_assembly(4),
        IncidentRecord::new("SN-2", 7, 9.0, 738_025).with_assembly(4),
    ]
}

fn build_into_store(db: &ProgramDb, options: &BuildOptions) -> (i64, usize) {
    let incidents = select(db, options.mode, options.include_zero_hour).unwrap();
    let dataset = db.create_dataset(options).unwrap();
    let mut sink = db.table_sink(dataset.dataset_id);
    let outcome = build_intervals(incidents, &mut sink).unwrap();
    sink.flush().unwrap();
    assert_eq!(sink.written(), outcome.emitted);
    (dataset.dataset_id, outcome.skipped_count())
}

#[test]
fn builds_dataset_from_stored_incidents() {
    let mut db = ProgramDb::open_in_memory().unwrap();
    db.import_incidents(&fleet()).unwrap();
    let options = BuildOptions::new(AggregationMode::AllFailureTimes)
        .with_assembly(4)
        .with_description("fleet")
        .with_confidence(90.0);

    // SN-2 opens at 5.0 but its next incident reads 3.0: the opener is dropped.
    let (dataset_id, skipped) = build_into_store(&db, &options);
    assert_eq!(dataset_id, 1);
    assert_eq!(skipped, 1);

    let records = db.load_records(dataset_id).unwrap();
    let intervals: Vec<(&str, f64, f64)> = records
        .iter()
        .map(|record| (record.unit.as_str(), record.left_interval, record.right_interval))
        .collect();
    assert_eq!(
        intervals,
        vec![
            ("SN-1", 0.0, 10.0),
            ("SN-1", 10.0, 25.0),
            ("SN-1", 25.0, 25.0),
            ("SN-1", 25.0, 40.0),
            ("SN-2", 0.0, 3.0),
            ("SN-2", 3.0, 9.0),
        ]
    );
    assert!(records.iter().all(|record| record.dataset_id == dataset_id));
    assert!(
        records
            .iter()
            .all(|record| record.status == CensoringStatus::IntervalCensored)
    );
    assert!(records.iter().all(|record| record.record_id != 4));

    let stored = db.load_dataset(dataset_id).unwrap();
    assert_eq!(stored.description, "fleet");
    assert_eq!(stored.confidence, 90.0);
    assert_eq!(stored.assembly_id, 4);
}

#[test]
fn repeated_runs_differ_only_in_dataset_id() {
    let mut db = ProgramDb::open_in_memory().unwrap();
    db.import_incidents(&fleet()).unwrap();
    let options = BuildOptions::new(AggregationMode::DistinctFailureTimes);

    let (first_id, _) = build_into_store(&db, &options);
    let (second_id, _) = build_into_store(&db, &options);
    assert_eq!(second_id, first_id + 1);

    let strip = |records: Vec<SurvivalRecord>| -> Vec<SurvivalRecord> {
        records
            .into_iter()
            .map(|record| record.in_dataset(0))
            .collect()
    };
    let first = strip(db.load_records(first_id).unwrap());
    let second = strip(db.load_records(second_id).unwrap());
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn listing_counts_records_per_dataset() {
    let mut db = ProgramDb::open_in_memory().unwrap();
    db.import_incidents(&fleet()).unwrap();
    build_into_store(&db, &BuildOptions::new(AggregationMode::FirstFailureOnly));
    db.create_dataset(&BuildOptions::default().with_description("empty"))
        .unwrap();

    let summaries = db.list_datasets().unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].dataset.dataset_id, 1);
    assert_eq!(summaries[0].records, 2);
    assert_eq!(summaries[1].dataset.description, "empty");
    assert_eq!(summaries[1].records, 0);
}

#[test]
fn records_are_written_as_they_are_produced() {
    let db = ProgramDb::open_in_memory().unwrap();
    let dataset = db.create_dataset(&BuildOptions::default()).unwrap();
    let mut sink = db.table_sink(dataset.dataset_id);
    let incident = IncidentRecord::new("A", 1, 10.0, 738_000);
    sink.write_record(&SurvivalRecord::interval_censored(0, &incident, 0.0, 10.0))
        .unwrap();

    assert_eq!(db.load_records(dataset.dataset_id).unwrap().len(), 1);
    assert_eq!(sink.dataset_id(), dataset.dataset_id);
}

#[test]
fn duplicate_record_id_fails_the_write() {
    let db = ProgramDb::open_in_memory().unwrap();
    let dataset = db.create_dataset(&BuildOptions::default()).unwrap();
    let mut sink = db.table_sink(dataset.dataset_id);
    let incident = IncidentRecord::new("A", 1, 10.0, 738_000);
    let record = SurvivalRecord::interval_censored(0, &incident, 0.0, 10.0);
    sink.write_record(&record).unwrap();

    let error = sink.write_record(&record).unwrap_err();
    assert!(matches!(error, StoreError::Sqlite(_)));
}

#[test]
fn zero_hour_exclusion_reaches_the_store_query() {
    let mut db = ProgramDb::open_in_memory().unwrap();
    db.import_incidents(&[
        IncidentRecord::new("A", 1, 0.0, 738_000),
        IncidentRecord::new("A", 2, 30.0, 738_001),
    ])
    .unwrap();
    let options = BuildOptions::new(AggregationMode::AllFailureTimes).with_zero_hour(false);
    let (dataset_id, _) = build_into_store(&db, &options);
    let records = db.load_records(dataset_id).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].left_interval, 0.0);
    assert_eq!(records[0].right_interval, 30.0);
}
