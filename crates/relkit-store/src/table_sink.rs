use relkit_core::SurvivalSink;
use relkit_model::SurvivalRecord;
use rusqlite::{Connection, params};

use crate::db::ProgramDb;
use crate::error::StoreError;

const INSERT_RECORD: &str = "
    INSERT INTO survival_data
        (record_id, dataset_id, left_interval, right_interval, status,
         quantity, unit, tbf, assembly_id, report_date)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";

/// Writes each survival record as a row of one dataset, immediately.
#[derive(Debug)]
pub struct TableSink<'db> {
    conn: &'db Connection,
    dataset_id: i64,
    written: usize,
}

impl ProgramDb {
    /// Sink for the rows of `dataset_id`, usually fresh from
    /// [`ProgramDb::create_dataset`].
    pub fn table_sink(&self, dataset_id: i64) -> TableSink<'_> {
        TableSink {
            conn: &self.conn,
            dataset_id,
            written: 0,
        }
    }
}

impl TableSink<'_> {
    pub fn dataset_id(&self) -> i64 {
        self.dataset_id
    }

    pub fn written(&self) -> usize {
        self.written
    }
}

impl SurvivalSink for TableSink<'_> {
    type Error = StoreError;

    fn write_record(&mut self, record: &SurvivalRecord) -> Result<(), Self::Error> {
        let record_id = i64::try_from(record.record_id).map_err(|_| StoreError::OutOfRange {
            table: "survival_data",
            column: "record_id",
            value: record.record_id as i128,
        })?;
        self.conn.prepare_cached(INSERT_RECORD)?.execute(params![
            record_id,
            self.dataset_id,
            record.left_interval,
            record.right_interval,
            record.status.as_str(),
            record.quantity,
            record.unit,
            record.time_between_failure,
            record.assembly_id,
            record.report_date
        ])?;
        self.written += 1;
        Ok(())
    }
}
