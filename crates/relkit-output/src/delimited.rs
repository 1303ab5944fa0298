use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use csv::{Terminator, WriterBuilder};
use relkit_core::SurvivalSink;
use relkit_model::SurvivalRecord;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Column header line of a dataset file.
pub const FILE_HEADER: [&str; 9] = [
    "Record_ID",
    "Left",
    "Right",
    "Status",
    "Quantity",
    "Unit",
    "TBF",
    "Assembly_ID",
    "Request_Date",
];

#[derive(Debug, Error)]
pub enum FileSinkError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Serialize)]
struct FileRow<'a> {
    record_id: usize,
    left: f64,
    right: f64,
    status: &'static str,
    quantity: u32,
    unit: &'a str,
    tbf: f64,
    assembly_id: i64,
    report_date: i64,
}

impl<'a> From<&'a SurvivalRecord> for FileRow<'a> {
    fn from(record: &'a SurvivalRecord) -> Self {
        Self {
            record_id: record.record_id,
            left: record.left_interval,
            right: record.right_interval,
            status: record.status.as_str(),
            quantity: record.quantity,
            unit: &record.unit,
            tbf: record.time_between_failure,
            assembly_id: record.assembly_id,
            report_date: record.report_date,
        }
    }
}

/// First line of a dataset file. Line breaks in the description become
/// spaces so the preamble stays on one line.
pub fn description_line(description: &str) -> String {
    let flattened = description.trim().replace(['\r', '\n'], " ");
    format!("Data Set Description: {flattened}")
}

/// Tab-delimited survival record writer.
///
/// File output carries no dataset id; records are written as they arrive.
pub struct DelimitedFileSink<W: Write> {
    writer: csv::Writer<W>,
    written: usize,
}

impl DelimitedFileSink<BufWriter<File>> {
    /// Create (or truncate) `path` and write the preamble.
    pub fn create(path: &Path, description: &str) -> Result<Self, FileSinkError> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        debug!(output = %path.display(), "created dataset file");
        Self::from_writer(BufWriter::new(file), description)
    }
}

impl<W: Write> DelimitedFileSink<W> {
    pub fn from_writer(mut inner: W, description: &str) -> Result<Self, FileSinkError> {
        writeln!(inner, "{}", description_line(description))?;
        writeln!(inner)?;
        let mut writer = WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(inner);
        writer.write_record(FILE_HEADER)?;
        Ok(Self { writer, written: 0 })
    }

    /// Records written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W, FileSinkError> {
        self.writer
            .into_inner()
            .map_err(|error| FileSinkError::Io(error.into_error()))
    }
}

impl<W: Write> SurvivalSink for DelimitedFileSink<W> {
    type Error = FileSinkError;

    fn write_record(&mut self, record: &SurvivalRecord) -> Result<(), Self::Error> {
        self.writer.serialize(FileRow::from(record))?;
        self.written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.writer.flush()?;
        Ok(())
    }
}
