pub mod dates;
pub mod enums;
pub mod error;
pub mod incident;
pub mod options;
pub mod survival;

pub use dates::{date_from_ordinal, format_ordinal, ordinal_from_date};
pub use enums::{AggregationMode, CensoringStatus};
pub use error::{ModelError, Result};
pub use incident::IncidentRecord;
pub use options::{BuildOptions, ZERO_HOUR_THRESHOLD};
pub use survival::{Dataset, SurvivalRecord};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_record_derives_tbf() {
        let incident = IncidentRecord::new("SN-1", 7, 25.0, 738_000).with_assembly(3);
        let record = SurvivalRecord::interval_censored(4, &incident, 10.0, 25.0);
        assert_eq!(record.record_id, 4);
        assert_eq!(record.status, CensoringStatus::IntervalCensored);
        assert_eq!(record.quantity, 1);
        assert_eq!(record.unit, "SN-1");
        assert_eq!(record.assembly_id, 3);
        assert_eq!(record.report_date, 738_000);
        assert!((record.time_between_failure - 15.0).abs() < 1e-12);
    }

    #[test]
    fn options_threshold() {
        let options = BuildOptions::default();
        assert_eq!(options.age_threshold(), 0.0);
        let options = options.with_zero_hour(false);
        assert_eq!(options.age_threshold(), ZERO_HOUR_THRESHOLD);
    }
}
