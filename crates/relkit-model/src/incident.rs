use serde::{Deserialize, Serialize};

/// One reported incident against a tracked unit.
///
/// The flag fields are carried through from the incident report but are
/// not interpreted when building survival datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentRecord {
    /// Serial number of the unit that experienced the incident.
    pub unit: String,
    pub incident_id: i64,
    pub part_number: String,
    /// Operating time elapsed when the incident occurred.
    pub age_at_incident: f64,
    pub failure: bool,
    pub suspension: bool,
    pub cnd_nff: bool,
    pub occurred_fault: bool,
    pub initial_installation: bool,
    pub interval_censored: bool,
    /// Report date as a proleptic Gregorian ordinal (day 1 = 0001-01-01).
    pub report_date: i64,
    pub assembly_id: i64,
}

impl IncidentRecord {
    /// Create a record with all flags cleared and no part or assembly.
    pub fn new(
        unit: impl Into<String>,
        incident_id: i64,
        age_at_incident: f64,
        report_date: i64,
    ) -> Self {
        Self {
            unit: unit.into(),
            incident_id,
            part_number: String::new(),
            age_at_incident,
            failure: false,
            suspension: false,
            cnd_nff: false,
            occurred_fault: false,
            initial_installation: false,
            interval_censored: false,
            report_date,
            assembly_id: 0,
        }
    }

    #[must_use]
    pub fn with_assembly(mut self, assembly_id: i64) -> Self {
        self.assembly_id = assembly_id;
        self
    }

    #[must_use]
    pub fn with_part_number(mut self, part_number: impl Into<String>) -> Self {
        self.part_number = part_number.into();
        self
    }

    pub fn same_unit(&self, other: &IncidentRecord) -> bool {
        self.unit == other.unit
    }
}
