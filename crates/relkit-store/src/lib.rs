//! Program database for the dataset builder.
//!
//! A single SQLite file holds the incident history (`incident`,
//! `incident_detail`) and every survival dataset built from it
//! (`survival_dataset`, `survival_data`).

mod datasets;
mod db;
mod error;
mod incidents;
mod registry;
mod table_sink;

pub use datasets::DatasetSummary;
pub use db::ProgramDb;
pub use error::{Result, StoreError};
pub use table_sink::TableSink;
