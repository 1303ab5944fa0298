use std::convert::Infallible;

use relkit_model::SurvivalRecord;

/// Destination for survival records, written one at a time as the
/// builder produces them.
pub trait SurvivalSink {
    type Error: std::error::Error + Send + Sync + 'static;

    fn write_record(&mut self, record: &SurvivalRecord) -> Result<(), Self::Error>;

    /// Push buffered output to the destination.
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl SurvivalSink for Vec<SurvivalRecord> {
    type Error = Infallible;

    fn write_record(&mut self, record: &SurvivalRecord) -> Result<(), Self::Error> {
        self.push(record.clone());
        Ok(())
    }
}

impl<S: SurvivalSink + ?Sized> SurvivalSink for &mut S {
    type Error = S::Error;

    fn write_record(&mut self, record: &SurvivalRecord) -> Result<(), Self::Error> {
        (**self).write_record(record)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        (**self).flush()
    }
}
