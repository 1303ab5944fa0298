//! Incident selection under the three aggregation policies.
//!
//! Every policy returns records ordered by unit, then report date, then
//! age at incident. The interval builder depends on that order.

use std::cmp::Ordering;
use std::collections::HashSet;

use relkit_model::{AggregationMode, IncidentRecord, ZERO_HOUR_THRESHOLD};
use tracing::debug;

use crate::source::IncidentSource;

/// Retrieve the incidents participating in a dataset.
///
/// Incidents younger than the zero-hour threshold are dropped unless
/// `include_zero_hour` is set. Ties on the sort key are broken by incident
/// id so repeated selections are identical.
pub fn select<S>(
    source: &S,
    mode: AggregationMode,
    include_zero_hour: bool,
) -> Result<Vec<IncidentRecord>, S::Error>
where
    S: IncidentSource + ?Sized,
{
    let threshold = if include_zero_hour {
        0.0
    } else {
        ZERO_HOUR_THRESHOLD
    };
    let mut records = source.fetch_incidents(threshold)?;
    let fetched = records.len();
    records.retain(|record| record.age_at_incident >= threshold);
    records.sort_by(selection_order);
    let selected = apply_mode(records, mode);
    debug!(
        mode = %mode,
        include_zero_hour,
        fetched,
        selected = selected.len(),
        "incident selection complete"
    );
    Ok(selected)
}

/// Total order used for selected incidents.
pub fn selection_order(a: &IncidentRecord, b: &IncidentRecord) -> Ordering {
    a.unit
        .cmp(&b.unit)
        .then(a.report_date.cmp(&b.report_date))
        .then(a.age_at_incident.total_cmp(&b.age_at_incident))
        .then(a.incident_id.cmp(&b.incident_id))
}

fn apply_mode(mut records: Vec<IncidentRecord>, mode: AggregationMode) -> Vec<IncidentRecord> {
    match mode {
        AggregationMode::AllFailureTimes => records,
        AggregationMode::FirstFailureOnly => {
            records.dedup_by(|later, earlier| later.unit == earlier.unit);
            records
        }
        AggregationMode::DistinctFailureTimes => {
            let mut seen: HashSet<(String, u64)> = HashSet::new();
            records.retain(|record| seen.insert((record.unit.clone(), age_key(record))));
            records
        }
    }
}

// -0.0 and 0.0 must collapse to the same key.
fn age_key(record: &IncidentRecord) -> u64 {
    if record.age_at_incident == 0.0 {
        0
    } else {
        record.age_at_incident.to_bits()
    }
}
