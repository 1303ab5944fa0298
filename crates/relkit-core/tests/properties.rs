//! Property tests for the interval builder.

use proptest::prelude::*;
use relkit_core::{BuildOutcome, IntervalBuilder, build_intervals};
use relkit_model::{IncidentRecord, SurvivalRecord};

fn strictly_increasing(raw: Vec<u32>) -> Vec<f64> {
    let mut ages: Vec<u32> = raw;
    ages.sort_unstable();
    ages.dedup();
    ages.into_iter().map(f64::from).collect()
}

fn unit_history(unit: &str, ages: &[f64], first_id: i64) -> Vec<IncidentRecord> {
    ages.iter()
        .enumerate()
        .map(|(offset, age)| {
            let offset = i64::try_from(offset).unwrap();
            IncidentRecord::new(unit, first_id + offset, *age, 738_000 + offset)
        })
        .collect()
}

fn run(incidents: Vec<IncidentRecord>) -> (Vec<SurvivalRecord>, BuildOutcome) {
    let mut sink: Vec<SurvivalRecord> = Vec::new();
    let outcome = build_intervals(incidents, &mut sink).unwrap();
    (sink, outcome)
}

fn arbitrary_incidents() -> impl Strategy<Value = Vec<IncidentRecord>> {
    prop::collection::vec((0u8..4, 0u32..500), 0..40).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(index, (unit, age))| {
                let index = i64::try_from(index).unwrap();
                IncidentRecord::new(format!("SN-{unit}"), index, f64::from(age), 738_000)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn increasing_single_unit_is_contiguous(raw in prop::collection::vec(1u32..10_000, 1..30)) {
        let ages = strictly_increasing(raw);
        let (records, outcome) = run(unit_history("SN-1", &ages, 1));

        prop_assert_eq!(records.len(), ages.len());
        prop_assert_eq!(outcome.skipped_count(), 0);
        prop_assert_eq!(records[0].left_interval, 0.0);
        for pair in records.windows(2) {
            prop_assert_eq!(pair[1].left_interval, pair[0].right_interval);
        }
        for (record, age) in records.iter().zip(&ages) {
            prop_assert_eq!(record.right_interval, *age);
        }
    }

    #[test]
    fn tbf_matches_interval_width(incidents in arbitrary_incidents()) {
        let (records, outcome) = run(incidents);
        prop_assert_eq!(outcome.emitted, records.len());
        for record in &records {
            prop_assert_eq!(record.time_between_failure, record.right_interval - record.left_interval);
            prop_assert!(record.right_interval >= record.left_interval);
        }
    }

    #[test]
    fn every_input_is_emitted_or_skipped(incidents in arbitrary_incidents()) {
        let input = incidents.len();
        let (records, outcome) = run(incidents);
        prop_assert_eq!(outcome.input, input);
        prop_assert_eq!(records.len() + outcome.skipped_count(), input);
        let ids: Vec<usize> = records.iter().map(|record| record.record_id).collect();
        prop_assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        for skipped in &outcome.skipped {
            prop_assert!(!ids.contains(&skipped.position));
        }
    }

    #[test]
    fn single_regression_skips_exactly_one(
        raw in prop::collection::vec(10u32..10_000, 2..30),
        at in any::<prop::sample::Index>(),
        step_back in 1u32..10,
    ) {
        let ages = strictly_increasing(raw);
        prop_assume!(ages.len() >= 2);
        let insert_at = 1 + at.index(ages.len() - 1);
        let regressed = ages[insert_at - 1] - f64::from(step_back);

        let mut incidents = unit_history("SN-1", &ages, 1);
        let mut bad = IncidentRecord::new("SN-1", 999, regressed, 738_000);
        bad.report_date = incidents[insert_at - 1].report_date;
        incidents.insert(insert_at, bad);

        let (records, outcome) = run(incidents);
        prop_assert_eq!(outcome.skipped_count(), 1);
        prop_assert_eq!(outcome.skipped[0].position, insert_at);
        prop_assert_eq!(records.len(), ages.len());
        prop_assert!(records.iter().all(|record| record.record_id != insert_at));
        for pair in records.windows(2) {
            prop_assert_eq!(pair[1].left_interval, pair[0].right_interval);
        }
    }

    #[test]
    fn unit_switch_resets_left_edge(
        histories in prop::collection::vec(prop::collection::vec(1u32..5_000, 2..8), 1..6),
    ) {
        let mut incidents = Vec::new();
        let mut expected_units = Vec::new();
        for (index, raw) in histories.into_iter().enumerate() {
            let ages = strictly_increasing(raw);
            prop_assume!(ages.len() >= 2);
            let unit = format!("SN-{index:02}");
            let first_id = i64::try_from(incidents.len()).unwrap();
            incidents.extend(unit_history(&unit, &ages, first_id));
            expected_units.push(unit);
        }
        let (records, outcome) = run(incidents);

        prop_assert_eq!(outcome.skipped_count(), 0);
        for unit in &expected_units {
            let first = records.iter().find(|record| &record.unit == unit).unwrap();
            prop_assert_eq!(first.left_interval, 0.0);
        }
        for pair in records.windows(2) {
            if pair[0].unit == pair[1].unit {
                prop_assert_eq!(pair[1].left_interval, pair[0].right_interval);
            } else {
                prop_assert_eq!(pair[1].left_interval, 0.0);
            }
        }
    }

    #[test]
    fn builder_is_deterministic(incidents in arbitrary_incidents()) {
        let (first, first_outcome) = run(incidents.clone());
        let (second, second_outcome) = run(incidents);
        prop_assert_eq!(first, second);
        prop_assert_eq!(first_outcome, second_outcome);
    }
}

#[test]
fn streaming_and_batch_agree() {
    let incidents = vec![
        IncidentRecord::new("A", 1, 10.0, 738_000),
        IncidentRecord::new("A", 2, 40.0, 738_001),
        IncidentRecord::new("A", 3, 20.0, 738_002),
        IncidentRecord::new("B", 4, 5.0, 738_000),
        IncidentRecord::new("B", 5, 5.0, 738_003),
    ];
    let (batch, _) = run(incidents.clone());

    let mut streamed: Vec<SurvivalRecord> = Vec::new();
    let mut builder = IntervalBuilder::new();
    for incident in incidents {
        builder.push(incident, &mut streamed).unwrap();
    }
    let outcome = builder.finish(&mut streamed).unwrap();

    assert_eq!(batch, streamed);
    assert_eq!(outcome.skipped_count(), 1);
}
