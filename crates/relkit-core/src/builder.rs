//! Single-pass interval censoring.
//!
//! Input must be ordered by unit, report date and age (see the selector in
//! `relkit-ingest`). Each accepted incident yields one interval-censored
//! record whose left edge is the previous accepted age for the same unit,
//! or zero at a unit boundary. Incidents whose age regresses are skipped
//! and counted, never treated as fatal.
//!
//! The builder keeps one record of look-ahead: the decision for incident
//! `i` needs incident `i + 1` when `i` starts a new unit, so `i` is held
//! until its successor is pushed or the stream is finished. Records reach
//! the sink in input order.

use relkit_model::{IncidentRecord, SurvivalRecord, format_ordinal};
use serde::Serialize;
use tracing::{debug, warn};

use crate::consistency::is_inconsistent;
use crate::sink::SurvivalSink;

/// Why an incident was left out of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Age is lower than the last accepted incident of the same unit.
    TimeRegression,
    /// First incident of a unit is older than the incident that follows it.
    LookAheadRegression,
}

/// Inputs to the interval decision for one incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Same unit as the last accepted incident.
    pub same_unit: bool,
    /// Age does not regress against the last accepted incident.
    pub consistent: bool,
    /// Age equals the last accepted incident's age.
    pub tie: bool,
    /// Final incident of the input.
    pub last: bool,
    /// Age does not exceed the following incident's age.
    pub look_ahead_ok: bool,
}

/// How the next interval is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalRule {
    /// `[previous age, age]`.
    ContinueFromPrevious,
    /// `[previous interval's right edge, age]`.
    CarryTie,
    /// `[0, age]`.
    StartUnit,
    /// No interval.
    Skip(SkipReason),
}

impl Transition {
    pub fn rule(self) -> IntervalRule {
        match self {
            Transition {
                same_unit: true,
                consistent: false,
                ..
            } => IntervalRule::Skip(SkipReason::TimeRegression),
            Transition {
                same_unit: true,
                tie: true,
                ..
            } => IntervalRule::CarryTie,
            Transition {
                same_unit: true, ..
            } => IntervalRule::ContinueFromPrevious,
            Transition { last: true, .. }
            | Transition {
                look_ahead_ok: true,
                ..
            } => IntervalRule::StartUnit,
            Transition { .. } => IntervalRule::Skip(SkipReason::LookAheadRegression),
        }
    }
}

/// The record an inconsistent incident was compared against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparedRecord {
    pub position: usize,
    pub incident_id: i64,
    pub unit: String,
    pub age_at_incident: f64,
    pub report_date: i64,
}

impl ComparedRecord {
    fn new(position: usize, record: &IncidentRecord) -> Self {
        Self {
            position,
            incident_id: record.incident_id,
            unit: record.unit.clone(),
            age_at_incident: record.age_at_incident,
            report_date: record.report_date,
        }
    }
}

/// An incident excluded for failing the ordering check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRecord {
    /// Position in the selected input.
    pub position: usize,
    pub unit: String,
    pub incident_id: i64,
    pub age_at_incident: f64,
    pub report_date: i64,
    pub reason: SkipReason,
    pub compared_with: ComparedRecord,
}

/// Totals for a completed run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildOutcome {
    /// Incidents consumed.
    pub input: usize,
    /// Survival records written to the sink.
    pub emitted: usize,
    pub skipped: Vec<SkippedRecord>,
}

impl BuildOutcome {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Streaming censoring state.
///
/// Push incidents in selection order, then call [`IntervalBuilder::finish`].
#[derive(Debug, Default)]
pub struct IntervalBuilder {
    /// Last accepted incident, the comparison point for the next decision.
    anchor: Option<(usize, IncidentRecord)>,
    /// Incident waiting for its successor.
    held: Option<(usize, IncidentRecord)>,
    /// Most recently constructed record.
    pending: Option<SurvivalRecord>,
    emit_pending: bool,
    /// Distance from the current incident back to the anchor.
    lookback: usize,
    received: usize,
    emitted: usize,
    skipped: Vec<SkippedRecord>,
}

impl IntervalBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of incidents skipped so far.
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Lookback distance to the last accepted incident.
    pub fn lookback(&self) -> usize {
        self.lookback
    }

    /// Consume the next incident. May write the previously pending record.
    pub fn push<S>(&mut self, incident: IncidentRecord, sink: &mut S) -> Result<(), S::Error>
    where
        S: SurvivalSink + ?Sized,
    {
        let position = self.received;
        self.received += 1;
        if position == 0 {
            let right = incident.age_at_incident;
            self.pending = Some(SurvivalRecord::interval_censored(0, &incident, 0.0, right));
            self.emit_pending = true;
            self.lookback = 1;
            self.anchor = Some((0, incident));
            return Ok(());
        }
        if let Some((held_position, held)) = self.held.take() {
            self.step(held_position, held, Some(&incident), sink)?;
        }
        self.held = Some((position, incident));
        Ok(())
    }

    /// Decide the held incident as the last one, write what remains pending
    /// and return the totals.
    pub fn finish<S>(mut self, sink: &mut S) -> Result<BuildOutcome, S::Error>
    where
        S: SurvivalSink + ?Sized,
    {
        if let Some((held_position, held)) = self.held.take() {
            self.step(held_position, held, None, sink)?;
        }
        if self.emit_pending {
            self.emit(sink)?;
        }
        debug!(
            input = self.received,
            emitted = self.emitted,
            skipped = self.skipped.len(),
            "interval build complete"
        );
        Ok(BuildOutcome {
            input: self.received,
            emitted: self.emitted,
            skipped: self.skipped,
        })
    }

    fn emit<S>(&mut self, sink: &mut S) -> Result<(), S::Error>
    where
        S: SurvivalSink + ?Sized,
    {
        if let Some(record) = &self.pending {
            sink.write_record(record)?;
            self.emitted += 1;
        }
        Ok(())
    }

    fn step<S>(
        &mut self,
        position: usize,
        current: IncidentRecord,
        next: Option<&IncidentRecord>,
        sink: &mut S,
    ) -> Result<(), S::Error>
    where
        S: SurvivalSink + ?Sized,
    {
        if self.emit_pending {
            self.emit(sink)?;
        }
        let Some((anchor_position, anchor)) = self.anchor.take() else {
            return Ok(());
        };
        let transition = Transition {
            same_unit: current.same_unit(&anchor),
            consistent: !is_inconsistent(&anchor, &current),
            tie: current.age_at_incident == anchor.age_at_incident,
            last: next.is_none(),
            look_ahead_ok: next.is_none_or(|next| current.age_at_incident <= next.age_at_incident),
        };
        let left = match transition.rule() {
            IntervalRule::ContinueFromPrevious => anchor.age_at_incident,
            IntervalRule::CarryTie => self
                .pending
                .as_ref()
                .map_or(anchor.age_at_incident, |pending| pending.right_interval),
            IntervalRule::StartUnit => 0.0,
            IntervalRule::Skip(reason) => {
                let compared_with = match (reason, next) {
                    (SkipReason::LookAheadRegression, Some(next)) => {
                        ComparedRecord::new(position + 1, next)
                    }
                    _ => ComparedRecord::new(anchor_position, &anchor),
                };
                self.skip(position, &current, reason, compared_with);
                self.anchor = Some((anchor_position, anchor));
                return Ok(());
            }
        };
        let right = current.age_at_incident;
        self.pending = Some(SurvivalRecord::interval_censored(
            position, &current, left, right,
        ));
        self.emit_pending = true;
        self.lookback = 1;
        self.anchor = Some((position, current));
        Ok(())
    }

    fn skip(
        &mut self,
        position: usize,
        current: &IncidentRecord,
        reason: SkipReason,
        compared_with: ComparedRecord,
    ) {
        warn!(
            position,
            unit = %current.unit,
            incident_id = current.incident_id,
            age_at_incident = current.age_at_incident,
            report_date = %format_ordinal(current.report_date),
            compared_incident_id = compared_with.incident_id,
            compared_unit = %compared_with.unit,
            compared_age = compared_with.age_at_incident,
            compared_report_date = %format_ordinal(compared_with.report_date),
            reason = ?reason,
            "inconsistent incident skipped: failure times should not decrease over time"
        );
        self.emit_pending = false;
        self.lookback += 1;
        self.skipped.push(SkippedRecord {
            position,
            unit: current.unit.clone(),
            incident_id: current.incident_id,
            age_at_incident: current.age_at_incident,
            report_date: current.report_date,
            reason,
            compared_with,
        });
    }
}

/// Run the builder over a complete, ordered incident sequence.
pub fn build_intervals<I, S>(incidents: I, sink: &mut S) -> Result<BuildOutcome, S::Error>
where
    I: IntoIterator<Item = IncidentRecord>,
    S: SurvivalSink + ?Sized,
{
    let mut builder = IntervalBuilder::new();
    for incident in incidents {
        builder.push(incident, sink)?;
    }
    builder.finish(sink)
}
