use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::debug;

use crate::error::Result;

const SCHEMA: &str = r"
    CREATE TABLE IF NOT EXISTS incident (
        incident_id INTEGER PRIMARY KEY,
        unit TEXT NOT NULL,
        report_date INTEGER NOT NULL,
        assembly_id INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS incident_detail (
        incident_id INTEGER PRIMARY KEY,
        part_number TEXT NOT NULL DEFAULT '',
        age_at_incident REAL NOT NULL,
        failure INTEGER NOT NULL DEFAULT 0,
        suspension INTEGER NOT NULL DEFAULT 0,
        cnd_nff INTEGER NOT NULL DEFAULT 0,
        occurred_fault INTEGER NOT NULL DEFAULT 0,
        initial_installation INTEGER NOT NULL DEFAULT 0,
        interval_censored INTEGER NOT NULL DEFAULT 0,
        FOREIGN KEY (incident_id) REFERENCES incident(incident_id)
    );

    CREATE TABLE IF NOT EXISTS survival_dataset (
        dataset_id INTEGER PRIMARY KEY,
        assembly_id INTEGER NOT NULL DEFAULT 0,
        description TEXT NOT NULL DEFAULT '',
        confidence REAL NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS survival_data (
        record_id INTEGER NOT NULL,
        dataset_id INTEGER NOT NULL,
        left_interval REAL NOT NULL,
        right_interval REAL NOT NULL,
        status TEXT NOT NULL,
        quantity INTEGER NOT NULL DEFAULT 1,
        unit TEXT NOT NULL,
        tbf REAL NOT NULL,
        assembly_id INTEGER NOT NULL DEFAULT 0,
        report_date INTEGER NOT NULL,
        PRIMARY KEY (dataset_id, record_id),
        FOREIGN KEY (dataset_id) REFERENCES survival_dataset(dataset_id)
    );

    CREATE INDEX IF NOT EXISTS idx_incident_unit
        ON incident(unit, report_date);
";

/// Handle on the program database.
#[derive(Debug)]
pub struct ProgramDb {
    pub(crate) conn: Connection,
    location: Option<PathBuf>,
}

impl ProgramDb {
    /// Open (or create) the database file at `path` and make sure the
    /// schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn,
            location: Some(path.to_path_buf()),
        };
        db.init_schema()?;
        debug!(store = %path.display(), "opened program database");
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn,
            location: None,
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Database file, or `None` for an in-memory store.
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }
}
