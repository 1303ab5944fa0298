use relkit_ingest::IncidentSource;
use relkit_model::IncidentRecord;
use rusqlite::{Row, params};
use tracing::{debug, info};

use crate::db::ProgramDb;
use crate::error::{Result, StoreError};

const SELECT_INCIDENTS: &str = "
    SELECT i.unit, i.incident_id, d.part_number, d.age_at_incident,
           d.failure, d.suspension, d.cnd_nff, d.occurred_fault,
           d.initial_installation, d.interval_censored,
           i.report_date, i.assembly_id
    FROM incident_detail AS d
    INNER JOIN incident AS i ON i.incident_id = d.incident_id
    WHERE d.age_at_incident >= ?1
    ORDER BY i.unit ASC, i.report_date ASC, d.age_at_incident ASC, i.incident_id ASC";

fn incident_from_row(row: &Row<'_>) -> rusqlite::Result<IncidentRecord> {
    Ok(IncidentRecord {
        unit: row.get(0)?,
        incident_id: row.get(1)?,
        part_number: row.get(2)?,
        age_at_incident: row.get(3)?,
        failure: row.get(4)?,
        suspension: row.get(5)?,
        cnd_nff: row.get(6)?,
        occurred_fault: row.get(7)?,
        initial_installation: row.get(8)?,
        interval_censored: row.get(9)?,
        report_date: row.get(10)?,
        assembly_id: row.get(11)?,
    })
}

impl ProgramDb {
    /// Write incidents into the incident tables in one transaction.
    ///
    /// Incidents whose id already exists are replaced.
    pub fn import_incidents(&mut self, incidents: &[IncidentRecord]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut incident = tx.prepare(
                "INSERT OR REPLACE INTO incident (incident_id, unit, report_date, assembly_id)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            let mut detail = tx.prepare(
                "INSERT OR REPLACE INTO incident_detail
                 (incident_id, part_number, age_at_incident, failure, suspension,
                  cnd_nff, occurred_fault, initial_installation, interval_censored)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for record in incidents {
                incident.execute(params![
                    record.incident_id,
                    record.unit,
                    record.report_date,
                    record.assembly_id
                ])?;
                detail.execute(params![
                    record.incident_id,
                    record.part_number,
                    record.age_at_incident,
                    record.failure,
                    record.suspension,
                    record.cnd_nff,
                    record.occurred_fault,
                    record.initial_installation,
                    record.interval_censored
                ])?;
            }
        }
        tx.commit()?;
        info!(imported = incidents.len(), "imported incidents");
        Ok(incidents.len())
    }

    /// Number of incidents with detail rows.
    pub fn incident_count(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM incident_detail AS d
             INNER JOIN incident AS i ON i.incident_id = d.incident_id",
            [],
            |row| row.get(0),
        )?;
        usize::try_from(count).map_err(|_| StoreError::OutOfRange {
            table: "incident_detail",
            column: "count",
            value: i128::from(count),
        })
    }
}

impl IncidentSource for ProgramDb {
    type Error = StoreError;

    fn fetch_incidents(&self, min_age: f64) -> Result<Vec<IncidentRecord>> {
        let mut stmt = self.conn.prepare_cached(SELECT_INCIDENTS)?;
        let records = stmt
            .query_map(params![min_age], incident_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(min_age, fetched = records.len(), "fetched incidents from store");
        Ok(records)
    }
}
