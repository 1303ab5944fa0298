use serde::{Deserialize, Serialize};

use crate::enums::CensoringStatus;
use crate::incident::IncidentRecord;

/// One censored observation in a survival dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalRecord {
    /// Position of the triggering incident in the selected input sequence.
    /// Gaps appear where inputs were skipped.
    pub record_id: usize,
    pub dataset_id: i64,
    pub left_interval: f64,
    pub right_interval: f64,
    pub status: CensoringStatus,
    pub quantity: u32,
    pub unit: String,
    pub time_between_failure: f64,
    pub assembly_id: i64,
    pub report_date: i64,
}

impl SurvivalRecord {
    /// Build an interval-censored record for `source` covering `[left, right]`.
    ///
    /// The dataset id is left at 0; sinks that own a dataset stamp their own.
    pub fn interval_censored(
        record_id: usize,
        source: &IncidentRecord,
        left_interval: f64,
        right_interval: f64,
    ) -> Self {
        Self {
            record_id,
            dataset_id: 0,
            left_interval,
            right_interval,
            status: CensoringStatus::IntervalCensored,
            quantity: 1,
            unit: source.unit.clone(),
            time_between_failure: right_interval - left_interval,
            assembly_id: source.assembly_id,
            report_date: source.report_date,
        }
    }

    /// Copy of this record assigned to `dataset_id`.
    #[must_use]
    pub fn in_dataset(&self, dataset_id: i64) -> Self {
        Self {
            dataset_id,
            ..self.clone()
        }
    }
}

/// A survival dataset header row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub dataset_id: i64,
    pub assembly_id: i64,
    pub description: String,
    /// Analysis confidence in percent. Stored, never interpreted here.
    pub confidence: f64,
}
