//! Dataset build stages.
//!
//! A run is `select` → `build` → `write`, each inside its own span. The
//! builder streams records into the sink as it decides them, so sink
//! failures surface from the build stage; `write` finalizes the sink and
//! the skipped-record report.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use relkit_core::{BuildOutcome, SkippedRecord, SurvivalSink, build_intervals};
use relkit_ingest::{IncidentSource, select};
use relkit_model::{BuildOptions, IncidentRecord};
use relkit_output::DelimitedFileSink;
use relkit_store::ProgramDb;
use tracing::{debug, info, info_span};

pub fn open_store(path: &Path) -> Result<ProgramDb> {
    ProgramDb::open(path).with_context(|| format!("open program database {}", path.display()))
}

/// Retrieve and order the incidents taking part in the dataset.
pub fn select_stage<S>(source: &S, options: &BuildOptions) -> Result<Vec<IncidentRecord>>
where
    S: IncidentSource + ?Sized,
{
    info_span!("select", mode = %options.mode).in_scope(|| -> Result<_> {
        let start = Instant::now();
        let incidents =
            select(source, options.mode, options.include_zero_hour).context("select incidents")?;
        debug!(
            selected = incidents.len(),
            include_zero_hour = options.include_zero_hour,
            duration_ms = start.elapsed().as_millis(),
            "selection complete"
        );
        Ok(incidents)
    })
}

/// Run the interval builder, writing each record to `sink` as it is decided.
pub fn build_stage<S>(incidents: Vec<IncidentRecord>, sink: &mut S) -> Result<BuildOutcome>
where
    S: SurvivalSink + ?Sized,
{
    info_span!("build").in_scope(|| -> Result<_> {
        let start = Instant::now();
        let outcome = build_intervals(incidents, sink).context("write survival records")?;
        debug!(
            input = outcome.input,
            emitted = outcome.emitted,
            skipped = outcome.skipped_count(),
            duration_ms = start.elapsed().as_millis(),
            "build complete"
        );
        Ok(outcome)
    })
}

/// Flush the sink and, when requested, write the skipped-record report.
pub fn write_stage<S>(
    sink: &mut S,
    skipped: &[SkippedRecord],
    skipped_report: Option<&Path>,
) -> Result<()>
where
    S: SurvivalSink + ?Sized,
{
    info_span!("write").in_scope(|| -> Result<()> {
        sink.flush().context("write survival records")?;
        if let Some(path) = skipped_report {
            write_skipped_report(path, skipped)?;
            debug!(
                skipped_report = %path.display(),
                skipped = skipped.len(),
                "wrote skipped-record report"
            );
        }
        Ok(())
    })
}

/// Skipped incidents as pretty-printed JSON.
pub fn write_skipped_report(path: &Path, skipped: &[SkippedRecord]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, skipped)
        .with_context(|| format!("write {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Build a new dataset in the program database.
///
/// The dataset row is registered before any survival record is written.
pub fn build_into_store(
    db: &ProgramDb,
    incidents: Vec<IncidentRecord>,
    options: &BuildOptions,
    skipped_report: Option<&Path>,
) -> Result<(i64, BuildOutcome)> {
    let dataset = db
        .create_dataset(options)
        .context("create survival dataset")?;
    let mut sink = db.table_sink(dataset.dataset_id);
    let outcome = build_stage(incidents, &mut sink)?;
    write_stage(&mut sink, &outcome.skipped, skipped_report)?;
    info!(
        dataset_id = dataset.dataset_id,
        records = sink.written(),
        skipped = outcome.skipped_count(),
        "dataset stored"
    );
    Ok((dataset.dataset_id, outcome))
}

/// Build a dataset into a tab-delimited file.
pub fn build_into_file(
    path: &Path,
    incidents: Vec<IncidentRecord>,
    options: &BuildOptions,
    skipped_report: Option<&Path>,
) -> Result<BuildOutcome> {
    let mut sink = DelimitedFileSink::create(path, &options.description)
        .with_context(|| format!("create {}", path.display()))?;
    let outcome = build_stage(incidents, &mut sink)?;
    write_stage(&mut sink, &outcome.skipped, skipped_report)?;
    info!(
        output = %path.display(),
        records = sink.written(),
        skipped = outcome.skipped_count(),
        "dataset file written"
    );
    Ok(outcome)
}
