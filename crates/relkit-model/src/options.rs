//! Configuration options for dataset construction.

use serde::{Deserialize, Serialize};

use crate::enums::AggregationMode;

/// Smallest age accepted when zero-hour incidents are excluded.
pub const ZERO_HOUR_THRESHOLD: f64 = 0.01;

/// Options controlling a single dataset-creation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Which incidents participate.
    pub mode: AggregationMode,

    /// Include incidents recorded at zero operating hours.
    pub include_zero_hour: bool,

    /// Hardware assembly the dataset is assigned to.
    pub assembly_id: i64,

    /// Free-text dataset description.
    pub description: String,

    /// Analysis confidence (%), stored with the dataset.
    pub confidence: f64,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            mode: AggregationMode::default(),
            include_zero_hour: true,
            assembly_id: 0,
            description: String::new(),
            confidence: 0.0,
        }
    }
}

impl BuildOptions {
    pub fn new(mode: AggregationMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_zero_hour(mut self, include: bool) -> Self {
        self.include_zero_hour = include;
        self
    }

    #[must_use]
    pub fn with_assembly(mut self, assembly_id: i64) -> Self {
        self.assembly_id = assembly_id;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Minimum `age_at_incident` an incident needs to qualify.
    pub fn age_threshold(&self) -> f64 {
        if self.include_zero_hour {
            0.0
        } else {
            ZERO_HOUR_THRESHOLD
        }
    }
}
