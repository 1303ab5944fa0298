//! Survival dataset file output.
//!
//! Datasets saved outside the program database are written as
//! tab-delimited text: a description line, a blank line, a header naming
//! the nine record fields, then one line per survival record in scan order.

mod delimited;

pub use delimited::{DelimitedFileSink, FILE_HEADER, FileSinkError, description_line};
