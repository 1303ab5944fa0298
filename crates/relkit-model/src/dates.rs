//! Report dates are stored as proleptic Gregorian ordinals, day 1 being
//! 0001-01-01.

use chrono::{Datelike, NaiveDate};

/// Calendar date for an ordinal, if it is in chrono's range.
///
/// Ordinals below 1 precede the first day and have no date.
pub fn date_from_ordinal(ordinal: i64) -> Option<NaiveDate> {
    if ordinal < 1 {
        return None;
    }
    let days = i32::try_from(ordinal).ok()?;
    NaiveDate::from_num_days_from_ce_opt(days)
}

pub fn ordinal_from_date(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce())
}

/// Render an ordinal as `YYYY-MM-DD`, falling back to the raw number.
pub fn format_ordinal(ordinal: i64) -> String {
    match date_from_ordinal(ordinal) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => format!("#{ordinal}"),
    }
}
