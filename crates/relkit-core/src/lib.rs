//! Interval censoring engine.
//!
//! Turns an ordered stream of incident records into interval-censored
//! survival records:
//!
//! - [`consistency`]: ordering predicate for two incidents of one unit
//! - [`builder`]: the single-pass censoring state machine
//! - [`sink`]: destination trait the builder writes through
//! - [`diagnostics`]: user-facing notice for skipped records

pub mod builder;
pub mod consistency;
pub mod diagnostics;
pub mod sink;

pub use builder::{
    BuildOutcome, ComparedRecord, IntervalBuilder, IntervalRule, SkipReason, SkippedRecord,
    Transition, build_intervals,
};
pub use consistency::is_inconsistent;
pub use diagnostics::{InconsistencyNotice, report};
pub use sink::SurvivalSink;
