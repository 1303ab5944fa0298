use std::path::Path;

use anyhow::{Context, Result, bail, ensure};
use relkit_core::report;
use relkit_ingest::{CsvIncidentSource, read_incident_csv};
use relkit_model::BuildOptions;
use tracing::{info, info_span};

use crate::cli::{BuildArgs, ImportArgs, ShowArgs, StoreArgs};
use relkit_cli::pipeline::{build_into_file, build_into_store, open_store, select_stage};
use crate::summary::{print_dataset_records, print_datasets};
use crate::types::{BuildResult, Destination};

fn build_options(args: &BuildArgs) -> BuildOptions {
    BuildOptions::new(args.mode.into())
        .with_zero_hour(!args.exclude_zero_hour)
        .with_assembly(args.assembly)
        .with_description(args.description.trim())
        .with_confidence(args.confidence)
}

pub fn run_build(args: &BuildArgs, log_file: Option<&Path>) -> Result<BuildResult> {
    ensure!(
        args.store.is_some() || args.output_file.is_some(),
        "no destination: pass --store or --output-file"
    );
    let options = build_options(args);
    let run_span = info_span!("dataset", mode = %options.mode, assembly_id = options.assembly_id);
    let _run_guard = run_span.enter();

    let store = match &args.store {
        Some(path) => Some((path.as_path(), open_store(path)?)),
        None => None,
    };
    let (source, incidents) = if let Some(path) = &args.incidents {
        (path.clone(), select_stage(&CsvIncidentSource::new(path), &options)?)
    } else if let Some((path, db)) = &store {
        (path.to_path_buf(), select_stage(db, &options)?)
    } else {
        bail!("no incident source: pass --store or --incidents");
    };
    let selected = incidents.len();
    let skipped_report = args.skipped_report.as_deref();

    let (destination, dataset_id, outcome) = if let Some(path) = &args.output_file {
        let outcome = build_into_file(path, incidents, &options, skipped_report)?;
        (Destination::File(path.clone()), None, outcome)
    } else if let Some((path, db)) = &store {
        let (dataset_id, outcome) = build_into_store(db, incidents, &options, skipped_report)?;
        (Destination::Store(path.to_path_buf()), Some(dataset_id), outcome)
    } else {
        bail!("no destination: pass --store or --output-file");
    };

    let notice = report(outcome.skipped_count(), skipped_report.or(log_file));
    Ok(BuildResult {
        mode: options.mode,
        include_zero_hour: options.include_zero_hour,
        source,
        destination,
        dataset_id,
        selected,
        emitted: outcome.emitted,
        skipped: outcome.skipped_count(),
        skipped_report: args.skipped_report.clone(),
        notice: notice.map(|notice| notice.to_string()),
    })
}

pub fn run_import(args: &ImportArgs) -> Result<()> {
    let incidents = read_incident_csv(&args.incidents)
        .with_context(|| format!("read {}", args.incidents.display()))?;
    let mut db = open_store(&args.store)?;
    let imported = db
        .import_incidents(&incidents)
        .context("import incidents")?;
    let total = db.incident_count().context("count incidents")?;
    info!(imported, total, "import complete");
    println!(
        "Imported {imported} incidents into {} ({total} stored)",
        args.store.display()
    );
    Ok(())
}

pub fn run_datasets(args: &StoreArgs) -> Result<()> {
    let db = open_store(&args.store)?;
    let summaries = db.list_datasets().context("list datasets")?;
    if summaries.is_empty() {
        println!("No datasets in {}", args.store.display());
        return Ok(());
    }
    print_datasets(&summaries);
    Ok(())
}

pub fn run_show(args: &ShowArgs) -> Result<()> {
    let db = open_store(&args.store)?;
    let dataset = db
        .load_dataset(args.dataset_id)
        .with_context(|| format!("load dataset {}", args.dataset_id))?;
    let records = db
        .load_records(args.dataset_id)
        .with_context(|| format!("load records of dataset {}", args.dataset_id))?;
    print_dataset_records(&dataset, &records);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use relkit_model::AggregationMode;

    use super::*;
    use crate::cli::ModeArg;

    fn build_args() -> BuildArgs {
        BuildArgs {
            store: None,
            incidents: None,
            output_file: None,
            mode: ModeArg::All,
            exclude_zero_hour: false,
            assembly: 2,
            description: " Valve fleet ".to_string(),
            confidence: 90.0,
            skipped_report: None,
            json: false,
        }
    }

    #[test]
    fn build_from_csv_into_file() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("incidents.csv");
        fs::write(
            &csv,
            "unit,incident_id,age_at_incident,report_date\nV-1,1,12,738000\nV-1,2,30,738010\n",
        )
        .unwrap();
        let output = dir.path().join("valves.txt");
        let args = BuildArgs {
            incidents: Some(csv.clone()),
            output_file: Some(output.clone()),
            ..build_args()
        };

        let result = run_build(&args, None).unwrap();
        assert_eq!(result.mode, AggregationMode::AllFailureTimes);
        assert_eq!(result.source, csv);
        assert_eq!(result.dataset_id, None);
        assert_eq!(result.emitted, 2);
        assert!(result.notice.is_none());
        let contents = fs::read_to_string(&output).unwrap();
        assert!(contents.starts_with("Data Set Description: Valve fleet\n"));
    }

    #[test]
    fn build_without_destination_is_rejected() {
        let args = BuildArgs {
            incidents: Some("incidents.csv".into()),
            ..build_args()
        };
        let error = run_build(&args, None).unwrap_err();
        assert!(error.to_string().starts_with("no destination"));
    }
}
