use std::convert::Infallible;

use relkit_model::IncidentRecord;

/// Read-only access to a store of incident records.
///
/// Implementations may return records in any order and may ignore
/// `min_age`; the selector filters and orders what it receives.
pub trait IncidentSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch every incident whose `age_at_incident` is at least `min_age`.
    fn fetch_incidents(&self, min_age: f64) -> Result<Vec<IncidentRecord>, Self::Error>;
}

impl IncidentSource for [IncidentRecord] {
    type Error = Infallible;

    fn fetch_incidents(&self, min_age: f64) -> Result<Vec<IncidentRecord>, Self::Error> {
        Ok(self
            .iter()
            .filter(|record| record.age_at_incident >= min_age)
            .cloned()
            .collect())
    }
}

impl IncidentSource for Vec<IncidentRecord> {
    type Error = Infallible;

    fn fetch_incidents(&self, min_age: f64) -> Result<Vec<IncidentRecord>, Self::Error> {
        self.as_slice().fetch_incidents(min_age)
    }
}
