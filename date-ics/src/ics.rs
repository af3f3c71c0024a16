// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! iCalendar (RFC 5545) encoding of a single event.
//!
//! Output is a `VCALENDAR` holding exactly one `VEVENT`:
//!
//! ```text
//! BEGIN:VCALENDAR
//! VERSION:2.0
//! PRODID:-//Date Counter//EN
//! CALSCALE:GREGORIAN
//! BEGIN:VEVENT
//! UID:...
//! DTSTAMP:20250101T120000Z
//! DTSTART;VALUE=DATE:20250101      (all-day)   | DTSTART:20250101T140000Z
//! DTEND;VALUE=DATE:20250102                    | DTEND:20250101T150000Z
//! SUMMARY:...
//!                                              | DESCRIPTION:Time zone: America/New_York
//! RRULE:...                        (optional)
//! BEGIN:VALARM ... END:VALARM      (0-3 times)
//! END:VEVENT
//! END:VCALENDAR
//! ```
//!
//! Every line, including the last, ends in CRLF. Text values are written
//! verbatim: no escaping and no line folding.

use crate::alarms::{MAX_ALARMS, trigger};
use crate::models::{EventKind, EventSpec};
use crate::timezone::{resolve_zone, to_utc};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use std::path::Path;
use uuid::Uuid;

/// Product identifier written into every document
pub const PRODUCT_ID: &str = "-//Date Counter//EN";

/// Domain suffix for generated UIDs
pub const UID_DOMAIN: &str = "date-counter";

const CRLF: &str = "\r\n";

/// Compact UTC date-time, e.g. `20250101T140000Z`
const UTC_STAMP: &str = "%Y%m%dT%H%M%SZ";

/// Date-only value, e.g. `20250101`
const DATE_VALUE: &str = "%Y%m%d";

/// Start and end of an event after time-zone normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventWindow {
    /// Whole days; `end` is exclusive (always `start + 1 day`)
    AllDay { start: NaiveDate, end: NaiveDate },

    /// Absolute instants
    Timed {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        /// Zone the start was resolved in
        zone: Tz,
    },
}

impl EventWindow {
    /// Resolve the window for an event
    #[must_use]
    pub fn for_spec(spec: &EventSpec) -> Self {
        match spec.kind {
            EventKind::AllDay => Self::AllDay {
                start: spec.date,
                // EventForm rejects NaiveDate::MAX before it gets here
                end: spec.date.succ_opt().unwrap_or(spec.date),
            },
            EventKind::Timed {
                start,
                duration_minutes,
            } => {
                let zone = resolve_zone(&spec.time_zone);
                let start = to_utc(spec.date, start, zone);
                Self::Timed {
                    start,
                    end: start + Duration::minutes(i64::from(duration_minutes)),
                    zone,
                }
            }
        }
    }
}

/// Encodes [`EventSpec`]s as iCalendar documents
///
/// Stateless; the only input besides the spec is the current time, read
/// once per [`IcsEncoder::encode`] call.
#[derive(Debug, Clone, Copy, Default)]
pub struct IcsEncoder;

impl IcsEncoder {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Encode `spec`, stamping it with the current time
    #[must_use]
    pub fn encode(&self, spec: &EventSpec) -> String {
        self.encode_at(spec, Utc::now())
    }

    /// Encode `spec` with an explicit `DTSTAMP`
    ///
    /// Given a spec with a UID, the output is fully determined by the arguments.
    #[must_use]
    pub fn encode_at(&self, spec: &EventSpec, stamp: DateTime<Utc>) -> String {
        let uid = spec.uid.clone().unwrap_or_else(generate_uid);
        let window = EventWindow::for_spec(spec);

        let mut lines: Vec<String> = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:{PRODUCT_ID}"),
            "CALSCALE:GREGORIAN".to_string(),
            "BEGIN:VEVENT".to_string(),
            format!("UID:{uid}"),
            format!("DTSTAMP:{}", stamp.format(UTC_STAMP)),
        ];

        match window {
            EventWindow::AllDay { start, end } => {
                lines.push(format!("DTSTART;VALUE=DATE:{}", start.format(DATE_VALUE)));
                lines.push(format!("DTEND;VALUE=DATE:{}", end.format(DATE_VALUE)));
                lines.push(format!("SUMMARY:{}", spec.display_title()));
            }
            EventWindow::Timed { start, end, zone } => {
                lines.push(format!("DTSTART:{}", start.format(UTC_STAMP)));
                lines.push(format!("DTEND:{}", end.format(UTC_STAMP)));
                lines.push(format!("SUMMARY:{}", spec.display_title()));
                lines.push(format!("DESCRIPTION:Time zone: {}", zone.name()));
            }
        }

        if let Some(rule) = spec.recurrence.rule_body() {
            lines.push(format!("RRULE:{rule}"));
        }

        for minutes in spec.alarms.iter().take(MAX_ALARMS) {
            lines.extend([
                "BEGIN:VALARM".to_string(),
                format!("TRIGGER:{}", trigger(*minutes)),
                "ACTION:DISPLAY".to_string(),
                "DESCRIPTION:Reminder".to_string(),
                "END:VALARM".to_string(),
            ]);
        }

        lines.push("END:VEVENT".to_string());
        lines.push("END:VCALENDAR".to_string());

        debug!(
            "Encoded event '{}' ({} lines, uid {})",
            spec.display_title(),
            lines.len(),
            uid
        );

        join_lines(&lines)
    }
}

/// A fresh, globally unique event UID
#[must_use]
pub fn generate_uid() -> String {
    format!("{}@{UID_DOMAIN}", Uuid::new_v4())
}

/// Join with CRLF, terminating the final line as well
fn join_lines(lines: &[String]) -> String {
    let mut out = lines.join(CRLF);
    out.push_str(CRLF);
    out
}

/// Write an encoded document to `path` byte-for-byte
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_ics(path: &Path, document: &str) -> Result<()> {
    debug!("Writing iCalendar document to: {:?}", path);
    std::fs::write(path, document.as_bytes())
        .with_context(|| format!("Failed to write iCalendar file: {}", path.display()))?;
    info!("Saved: {}", path.display());
    Ok(())
}
