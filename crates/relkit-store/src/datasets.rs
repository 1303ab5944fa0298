use relkit_model::{CensoringStatus, Dataset, SurvivalRecord};
use rusqlite::{OptionalExtension, params};

use crate::db::ProgramDb;
use crate::error::{Result, StoreError};

/// A stored dataset with the number of survival records it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub dataset: Dataset,
    pub records: usize,
}

struct StoredRecord {
    record_id: i64,
    dataset_id: i64,
    left_interval: f64,
    right_interval: f64,
    status: String,
    quantity: i64,
    unit: String,
    tbf: f64,
    assembly_id: i64,
    report_date: i64,
}

impl StoredRecord {
    fn into_record(self) -> Result<SurvivalRecord> {
        let status: CensoringStatus =
            self.status.parse().map_err(|source| StoreError::Model {
                table: "survival_data",
                column: "status",
                source,
            })?;
        Ok(SurvivalRecord {
            record_id: in_range("record_id", self.record_id)?,
            dataset_id: self.dataset_id,
            left_interval: self.left_interval,
            right_interval: self.right_interval,
            status,
            quantity: in_range("quantity", self.quantity)?,
            unit: self.unit,
            time_between_failure: self.tbf,
            assembly_id: self.assembly_id,
            report_date: self.report_date,
        })
    }
}

fn in_range<T: TryFrom<i64>>(column: &'static str, value: i64) -> Result<T> {
    T::try_from(value).map_err(|_| StoreError::OutOfRange {
        table: "survival_data",
        column,
        value: i128::from(value),
    })
}

impl ProgramDb {
    /// Every dataset in id order, with record counts.
    pub fn list_datasets(&self) -> Result<Vec<DatasetSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT d.dataset_id, d.assembly_id, d.description, d.confidence,
                    COUNT(s.record_id)
             FROM survival_dataset AS d
             LEFT JOIN survival_data AS s ON s.dataset_id = d.dataset_id
             GROUP BY d.dataset_id
             ORDER BY d.dataset_id ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    Dataset {
                        dataset_id: row.get(0)?,
                        assembly_id: row.get(1)?,
                        description: row.get(2)?,
                        confidence: row.get(3)?,
                    },
                    row.get::<_, i64>(4)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter()
            .map(|(dataset, count)| {
                Ok(DatasetSummary {
                    dataset,
                    records: in_range("count", count)?,
                })
            })
            .collect()
    }

    pub fn load_dataset(&self, dataset_id: i64) -> Result<Dataset> {
        self.conn
            .query_row(
                "SELECT dataset_id, assembly_id, description, confidence
                 FROM survival_dataset WHERE dataset_id = ?1",
                params![dataset_id],
                |row| {
                    Ok(Dataset {
                        dataset_id: row.get(0)?,
                        assembly_id: row.get(1)?,
                        description: row.get(2)?,
                        confidence: row.get(3)?,
                    })
                },
            )
            .optional()?
            .ok_or(StoreError::DatasetNotFound(dataset_id))
    }

    /// Survival records of one dataset in `record_id` order.
    pub fn load_records(&self, dataset_id: i64) -> Result<Vec<SurvivalRecord>> {
        self.load_dataset(dataset_id)?;
        let mut stmt = self.conn.prepare(
            "SELECT record_id, dataset_id, left_interval, right_interval, status,
                    quantity, unit, tbf, assembly_id, report_date
             FROM survival_data
             WHERE dataset_id = ?1
             ORDER BY record_id ASC",
        )?;
        let stored = stmt
            .query_map(params![dataset_id], |row| {
                Ok(StoredRecord {
                    record_id: row.get(0)?,
                    dataset_id: row.get(1)?,
                    left_interval: row.get(2)?,
                    right_interval: row.get(3)?,
                    status: row.get(4)?,
                    quantity: row.get(5)?,
                    unit: row.get(6)?,
                    tbf: row.get(7)?,
                    assembly_id: row.get(8)?,
                    report_date: row.get(9)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        stored.into_iter().map(StoredRecord::into_record).collect()
    }
}
