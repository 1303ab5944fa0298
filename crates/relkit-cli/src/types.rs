use std::path::PathBuf;

use relkit_model::AggregationMode;
use serde::Serialize;

/// Where a dataset was written.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum Destination {
    Store(PathBuf),
    File(PathBuf),
}

#[derive(Debug, Serialize)]
pub struct BuildResult {
    pub mode: AggregationMode,
    pub include_zero_hour: bool,
    pub source: PathBuf,
    pub destination: Destination,
    /// Only set for datasets written to the program database.
    pub dataset_id: Option<i64>,
    pub selected: usize,
    pub emitted: usize,
    pub skipped: usize,
    pub skipped_report: Option<PathBuf>,
    pub notice: Option<String>,
}
