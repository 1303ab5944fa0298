//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use relkit_model::AggregationMode;

#[derive(Parser)]
#[command(
    name = "relkit",
    version,
    about = "Build interval-censored survival datasets from field incidents",
    long_about = "Build interval-censored survival datasets from field incident history.\n\n\
                  Incidents come from the program database or a CSV export; datasets go\n\
                  to the program database or a tab-delimited file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build a survival dataset.
    Build(BuildArgs),

    /// Load incidents from a CSV file into the program database.
    Import(ImportArgs),

    /// List the datasets stored in the program database.
    Datasets(StoreArgs),

    /// Print the survival records of one stored dataset.
    Show(ShowArgs),
}

#[derive(Args)]
pub struct StoreArgs {
    /// Program database (SQLite file).
    #[arg(long = "store", value_name = "DB")]
    pub store: PathBuf,
}

#[derive(Args)]
pub struct BuildArgs {
    /// Program database. Incidents are read from it unless `--incidents`
    /// is given; the dataset is written to it unless `--output-file` is given.
    #[arg(long = "store", value_name = "DB")]
    pub store: Option<PathBuf>,

    /// Read incidents from this CSV file instead of the program database.
    #[arg(long = "incidents", value_name = "CSV")]
    pub incidents: Option<PathBuf>,

    /// Write the dataset to a tab-delimited file instead of the program database.
    #[arg(long = "output-file", value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Which incidents participate.
    #[arg(long = "mode", value_enum, default_value = "all")]
    pub mode: ModeArg,

    /// Leave out incidents recorded at zero operating hours.
    #[arg(long = "exclude-zero-hour")]
    pub exclude_zero_hour: bool,

    /// Hardware assembly the dataset belongs to.
    #[arg(long = "assembly", value_name = "ID", default_value_t = 0)]
    pub assembly: i64,

    /// Dataset description.
    #[arg(long = "description", default_value = "")]
    pub description: String,

    /// Analysis confidence in percent, stored with the dataset.
    #[arg(long = "confidence", value_name = "PCT", default_value_t = 0.0)]
    pub confidence: f64,

    /// Write skipped-incident details to this JSON file.
    #[arg(long = "skipped-report", value_name = "PATH")]
    pub skipped_report: Option<PathBuf>,

    /// Print the run summary as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Program database (created if missing).
    #[arg(long = "store", value_name = "DB")]
    pub store: PathBuf,

    /// Incident CSV export.
    #[arg(value_name = "CSV")]
    pub incidents: PathBuf,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Program database (SQLite file).
    #[arg(long = "store", value_name = "DB")]
    pub store: PathBuf,

    /// Dataset to print.
    #[arg(value_name = "DATASET_ID")]
    pub dataset_id: i64,
}

/// Incident aggregation choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// First failure of each unit only.
    #[value(alias = "mttf")]
    First,
    /// One incident per distinct failure time of each unit.
    #[value(alias = "mtbbd")]
    Distinct,
    /// Every incident.
    #[value(alias = "mtbf")]
    All,
}

impl From<ModeArg> for AggregationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::First => AggregationMode::FirstFailureOnly,
            ModeArg::Distinct => AggregationMode::DistinctFailureTimes,
            ModeArg::All => AggregationMode::AllFailureTimes,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
