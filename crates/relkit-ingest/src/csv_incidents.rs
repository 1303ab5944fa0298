use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use relkit_model::{IncidentRecord, ModelError, ordinal_from_date};
use serde::{Deserialize, Deserializer, de};
use tracing::debug;

use crate::error::IngestError;
use crate::source::IncidentSource;

const REQUIRED_COLUMNS: [&str; 4] = ["unit", "incident_id", "age_at_incident", "report_date"];

/// Incident store backed by a CSV export.
#[derive(Debug, Clone)]
pub struct CsvIncidentSource {
    path: PathBuf,
}

impl CsvIncidentSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IncidentSource for CsvIncidentSource {
    type Error = IngestError;

    fn fetch_incidents(&self, min_age: f64) -> Result<Vec<IncidentRecord>, Self::Error> {
        let mut records = read_incident_csv(&self.path)?;
        records.retain(|record| record.age_at_incident >= min_age);
        Ok(records)
    }
}

#[derive(Debug, Deserialize)]
struct IncidentRow {
    unit: String,
    incident_id: i64,
    #[serde(default)]
    part_number: String,
    age_at_incident: f64,
    #[serde(default, deserialize_with = "deserialize_flag")]
    failure: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    suspension: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    cnd_nff: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    occurred_fault: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    initial_installation: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    interval_censored: bool,
    #[serde(deserialize_with = "deserialize_report_date")]
    report_date: i64,
    #[serde(default)]
    assembly_id: Option<i64>,
}

impl IncidentRow {
    fn into_record(self) -> Result<IncidentRecord, String> {
        let unit = self.unit.trim().to_string();
        if unit.is_empty() {
            return Err(ModelError::InvalidUnit(self.unit).to_string());
        }
        if !self.age_at_incident.is_finite() || self.age_at_incident < 0.0 {
            return Err(format!(
                "age_at_incident must be a non-negative number, got {}",
                self.age_at_incident
            ));
        }
        Ok(IncidentRecord {
            unit,
            incident_id: self.incident_id,
            part_number: self.part_number.trim().to_string(),
            age_at_incident: self.age_at_incident,
            failure: self.failure,
            suspension: self.suspension,
            cnd_nff: self.cnd_nff,
            occurred_fault: self.occurred_fault,
            initial_installation: self.initial_installation,
            interval_censored: self.interval_censored,
            report_date: self.report_date,
            assembly_id: self.assembly_id.unwrap_or(0),
        })
    }
}

/// Normalize a CSV header to the snake-case field name it maps to.
///
/// Strips byte-order marks and a legacy `fld_` prefix, lower-cases, joins
/// words with underscores and resolves the historical column aliases.
pub fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let joined = trimmed
        .split(|ch: char| ch.is_whitespace() || ch == '-' || ch == '/')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase();
    let name = joined.strip_prefix("fld_").unwrap_or(&joined);
    match name {
        "part_num" => "part_number".to_string(),
        "age" => "age_at_incident".to_string(),
        "occ_fault" | "occ" => "occurred_fault".to_string(),
        "request_date" | "failure_date" | "date" => "report_date".to_string(),
        "hardware_id" => "assembly_id".to_string(),
        "serial_number" => "unit".to_string(),
        other => other.to_string(),
    }
}

/// Read every incident in a CSV file, in file order.
pub fn read_incident_csv(path: &Path) -> Result<Vec<IncidentRecord>, IngestError> {
    let csv_error = |source| IngestError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_error)?;
    let headers: StringRecord = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(normalize_header)
        .collect();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(IngestError::MissingColumn {
                path: path.to_path_buf(),
                column,
            });
        }
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let raw = result.map_err(csv_error)?;
        if raw.iter().all(str::is_empty) {
            continue;
        }
        let line = raw.position().map_or(0, csv::Position::line);
        let invalid = |message: String| IngestError::InvalidRow {
            path: path.to_path_buf(),
            line,
            message,
        };
        let row: IncidentRow = raw
            .deserialize(Some(&headers))
            .map_err(|error| invalid(error.to_string()))?;
        records.push(row.into_record().map_err(invalid)?);
    }
    debug!(
        source_file = %path.display(),
        records = records.len(),
        "read incident csv"
    );
    Ok(records)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "" | "0" | "false" | "no" | "n" => Some(false),
        "1" | "true" | "yes" | "y" | "-1" => Some(true),
        _ => None,
    }
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_flag(&value).ok_or_else(|| de::Error::custom(format!("invalid flag value `{value}`")))
}

fn deserialize_report_date<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    let trimmed = value.trim();
    if let Ok(ordinal) = trimmed.parse::<i64>() {
        return Ok(ordinal);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(ordinal_from_date)
        .map_err(|_| de::Error::custom(format!("invalid report date `{value}`")))
}
