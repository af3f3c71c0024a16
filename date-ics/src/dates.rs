// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::{ValidationError, ValidationResult};
use chrono::{Duration, NaiveDate};
use clap::ValueEnum;

/// Date formats accepted for user-entered dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DateFormat {
    /// DD/MM/YYYY
    Dmy,
    /// MM/DD/YYYY
    #[default]
    Mdy,
    /// YYYY-MM-DD
    Iso,
}

impl DateFormat {
    /// chrono format string
    #[must_use]
    pub const fn pattern(self) -> &'static str {
        match self {
            Self::Dmy => "%d/%m/%Y",
            Self::Mdy => "%m/%d/%Y",
            Self::Iso => "%Y-%m-%d",
        }
    }

    /// Human-readable label, e.g. `MM/DD/YYYY`
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dmy => "DD/MM/YYYY",
            Self::Mdy => "MM/DD/YYYY",
            Self::Iso => "YYYY-MM-DD",
        }
    }

    /// Parse a date in this format
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDate`] if the text does not match.
    pub fn parse(self, text: &str) -> ValidationResult<NaiveDate> {
        let text = text.trim();
        NaiveDate::parse_from_str(text, self.pattern())
            .map_err(|_| ValidationError::InvalidDate(format!("{text} (expected {})", self.label())))
    }

    #[must_use]
    pub fn format(self, date: NaiveDate) -> String {
        date.format(self.pattern()).to_string()
    }
}

/// The three date relationships the tool can compute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateQuery {
    /// Days from `start` to `end`; the event lands on `end`
    Between { start: NaiveDate, end: NaiveDate },

    /// `start` shifted by `days` (may be negative)
    Offset { start: NaiveDate, days: i64 },

    /// `end` minus `days`; the event lands on the derived start date
    BeforeEnd { end: NaiveDate, days: i64 },
}

/// Result of a [`DateQuery`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Computation {
    /// Day count involved in the query
    pub days: i64,

    /// The computed date handed to the event encoder
    pub date: NaiveDate,

    /// Multi-line summary shown to the user
    pub report: String,
}

impl DateQuery {
    /// Run the arithmetic and render a report in `format`
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDays`] if the resulting date falls
    /// outside the representable calendar range.
    pub fn compute(&self, format: DateFormat) -> ValidationResult<Computation> {
        match *self {
            Self::Between { start, end } => {
                let days = (end - start).num_days();
                let direction = if days >= 0 { "ahead of" } else { "before" };
                let report = format!(
                    "Start: {}\nEnd:   {}\nResult: {days} day(s) ({} {direction} start).",
                    format.format(start),
                    format.format(end),
                    days.unsigned_abs()
                );
                Ok(Computation {
                    days,
                    date: end,
                    report,
                })
            }
            Self::Offset { start, days } => {
                let date = shift(start, days)?;
                let direction = if days >= 0 { "from" } else { "before" };
                let report = format!(
                    "Start: {}\nDays:  {days}\nResult: {} ({} day(s) {direction} start).",
                    format.format(start),
                    format.format(date),
                    days.unsigned_abs()
                );
                Ok(Computation { days, date, report })
            }
            Self::BeforeEnd { end, days } => {
                let date = shift(end, days.checked_neg().unwrap_or(i64::MAX))?;
                let report = format!(
                    "End:   {}\nDays to subtract: {days}\nResult (start date): {}.",
                    format.format(end),
                    format.format(date)
                );
                Ok(Computation { days, date, report })
            }
        }
    }
}

fn shift(date: NaiveDate, days: i64) -> ValidationResult<NaiveDate> {
    Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or_else(|| ValidationError::InvalidDays("Resulting date is out of range.".to_string()))
}

/// Parse a day count typed by the user
///
/// # Errors
///
/// Returns [`ValidationError::InvalidDays`] when blank or not an integer.
pub fn parse_days(text: &str) -> ValidationResult<i64> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::InvalidDays(
            "Please enter a number of days.".to_string(),
        ));
    }
    text.parse::<i64>().map_err(|_| {
        ValidationError::InvalidDays("Days must be an integer (e.g., 121 or -7).".to_string())
    })
}
