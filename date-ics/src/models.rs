// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::timezone::DEFAULT_TIME_ZONE;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Title used when the caller leaves the title blank
pub const DEFAULT_TITLE: &str = "Reminder";

/// Duration applied to timed events when none (or garbage) is supplied
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

/// Whether an event covers whole days or starts at a wall-clock time
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventKind {
    /// Date-only event, end date exclusive
    AllDay,

    /// Event starting at `start` on the event date, lasting `duration_minutes`
    Timed {
        start: NaiveTime,
        duration_minutes: u32,
    },
}

/// Everything needed to encode one calendar event
///
/// Built fresh for every encode request and never mutated by the encoder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventSpec {
    /// Display title (see [`EventSpec::display_title`])
    pub title: String,

    /// All-day or timed
    pub kind: EventKind,

    /// The computed date the event occurs on
    pub date: NaiveDate,

    /// IANA zone name used to place a timed start on the timeline
    pub time_zone: String,

    /// Reminder offsets in minutes before the start
    pub alarms: Vec<i64>,

    /// Recurrence, if any
    pub recurrence: RecurrenceSpec,

    /// Caller-supplied UID; one is generated when absent
    pub uid: Option<String>,
}

impl EventSpec {
    /// Create an all-day event on `date`
    #[must_use]
    pub fn all_day(title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            kind: EventKind::AllDay,
            date,
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            alarms: Vec::new(),
            recurrence: RecurrenceSpec::None,
            uid: None,
        }
    }

    /// Create a timed event starting at `start` on `date`
    #[must_use]
    pub fn timed(
        title: impl Into<String>,
        date: NaiveDate,
        start: NaiveTime,
        duration_minutes: u32,
    ) -> Self {
        Self {
            kind: EventKind::Timed {
                start,
                duration_minutes,
            },
            ..Self::all_day(title, date)
        }
    }

    #[must_use]
    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = time_zone.into();
        self
    }

    #[must_use]
    pub fn with_alarms(mut self, alarms: Vec<i64>) -> Self {
        self.alarms = alarms;
        self
    }

    #[must_use]
    pub fn with_recurrence(mut self, recurrence: RecurrenceSpec) -> Self {
        self.recurrence = recurrence;
        self
    }

    #[must_use]
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    /// Title with surrounding whitespace removed, or [`DEFAULT_TITLE`] when blank
    #[must_use]
    pub fn display_title(&self) -> &str {
        let trimmed = self.title.trim();
        if trimmed.is_empty() {
            DEFAULT_TITLE
        } else {
            trimmed
        }
    }

    /// Whether this is an all-day event
    #[must_use]
    pub const fn is_all_day(&self) -> bool {
        matches!(self.kind, EventKind::AllDay)
    }
}

/// Recurrence frequency for preset rules
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// The `FREQ=` value for this frequency
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }
}

/// How a preset recurrence ends
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Terminator {
    /// Recurs indefinitely
    None,

    /// Stops after this many occurrences (always > 0)
    Count(u32),

    /// Stops after midnight UTC of this date
    Until(NaiveDate),
}

/// Recurrence attached to an event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum RecurrenceSpec {
    #[default]
    None,

    Preset {
        frequency: Frequency,
        interval: u32,
        terminator: Terminator,
    },

    /// Verbatim rule body, `RRULE:` prefix already stripped
    Custom(String),
}
