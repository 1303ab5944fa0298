//! Type-safe enumerations for dataset construction.
//!
//! Both enums are stored as text in the program database and in
//! delimited files, so each carries a canonical label that round-trips
//! through `Display` and `FromStr`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Policy deciding which incident records participate in a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AggregationMode {
    /// One record per unit: its earliest qualifying incident (MTTF).
    FirstFailureOnly,
    /// One record per distinct `(unit, age)` pair (MTBBD).
    DistinctFailureTimes,
    /// Every qualifying incident, no collapsing (MTBF).
    #[default]
    AllFailureTimes,
}

impl AggregationMode {
    pub const ALL: [AggregationMode; 3] = [
        AggregationMode::FirstFailureOnly,
        AggregationMode::DistinctFailureTimes,
        AggregationMode::AllFailureTimes,
    ];

    /// Returns the canonical label.
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationMode::FirstFailureOnly => "first-failure-only",
            AggregationMode::DistinctFailureTimes => "distinct-failure-times",
            AggregationMode::AllFailureTimes => "all-failure-times",
        }
    }

    /// Returns a short human-readable description of the policy.
    pub fn description(&self) -> &'static str {
        match self {
            AggregationMode::FirstFailureOnly => "Include only the first failure time for each unit",
            AggregationMode::DistinctFailureTimes => {
                "Include only distinct failure times for each unit"
            }
            AggregationMode::AllFailureTimes => "Include all failure times for each unit",
        }
    }
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AggregationMode {
    type Err = ModelError;

    /// Accepts the canonical labels, the short forms `first`/`distinct`/`all`
    /// and the estimate names `mttf`/`mtbbd`/`mtbf` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        match normalized.as_str() {
            "first-failure-only" | "first" | "mttf" => Ok(AggregationMode::FirstFailureOnly),
            "distinct-failure-times" | "distinct" | "mtbbd" => {
                Ok(AggregationMode::DistinctFailureTimes)
            }
            "all-failure-times" | "all" | "mtbf" => Ok(AggregationMode::AllFailureTimes),
            _ => Err(ModelError::UnknownMode(s.to_string())),
        }
    }
}

/// Censoring kind of a survival record.
///
/// The interval builder only ever produces [`CensoringStatus::IntervalCensored`];
/// the other kinds come from records entered by hand and are read back
/// from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CensoringStatus {
    /// Failure observed at an exact instant.
    #[serde(rename = "Event")]
    Exact,
    /// Failure known to lie within `[left, right]`.
    #[serde(rename = "Interval Censored")]
    IntervalCensored,
    /// Unit still operating at `right`.
    #[serde(rename = "Right Censored")]
    RightCensored,
    /// Failure occurred at some time before `right`.
    #[serde(rename = "Left Censored")]
    LeftCensored,
}

impl CensoringStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CensoringStatus::Exact => "Event",
            CensoringStatus::IntervalCensored => "Interval Censored",
            CensoringStatus::RightCensored => "Right Censored",
            CensoringStatus::LeftCensored => "Left Censored",
        }
    }
}

impl fmt::Display for CensoringStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CensoringStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "EVENT" | "EXACT" => Ok(CensoringStatus::Exact),
            "INTERVAL CENSORED" => Ok(CensoringStatus::IntervalCensored),
            "RIGHT CENSORED" => Ok(CensoringStatus::RightCensored),
            "LEFT CENSORED" => Ok(CensoringStatus::LeftCensored),
            _ => Err(ModelError::UnknownStatus(s.to_string())),
        }
    }
}
