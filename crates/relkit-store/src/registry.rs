use relkit_model::{BuildOptions, Dataset};
use rusqlite::params;
use tracing::info;

use crate::db::ProgramDb;
use crate::error::Result;

impl ProgramDb {
    /// Identifier one greater than any dataset currently stored, 1 for an
    /// empty store.
    pub fn new_dataset_id(&self) -> Result<i64> {
        let id = self.conn.query_row(
            "SELECT COALESCE(MAX(dataset_id), 0) + 1 FROM survival_dataset",
            [],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// Register a new dataset for a build run.
    ///
    /// Must happen before any of the run's survival records are written.
    pub fn create_dataset(&self, options: &BuildOptions) -> Result<Dataset> {
        let dataset = Dataset {
            dataset_id: self.new_dataset_id()?,
            assembly_id: options.assembly_id,
            description: options.description.clone(),
            confidence: options.confidence,
        };
        self.conn.execute(
            "INSERT INTO survival_dataset (dataset_id, assembly_id, description, confidence)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                dataset.dataset_id,
                dataset.assembly_id,
                dataset.description,
                dataset.confidence
            ],
        )?;
        info!(
            dataset_id = dataset.dataset_id,
            assembly_id = dataset.assembly_id,
            "created survival dataset"
        );
        Ok(dataset)
    }
}
