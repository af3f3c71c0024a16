// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::alarms::{DEFAULT_REMINDERS, parse_alarm_list};
use crate::dates::DateFormat;
use crate::error::{ValidationError, ValidationResult};
use crate::models::{DEFAULT_DURATION_MINUTES, EventSpec, RecurrenceSpec};
use crate::recurrence::{PresetFields, RecurrenceMode};
use crate::timezone::{DEFAULT_TIME_ZONE, parse_hhmm};
use chrono::NaiveDate;

/// Raw event inputs as a user types them
///
/// Nothing here is validated until [`EventForm::into_spec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventForm {
    pub title: String,
    pub timed: bool,
    pub time: String,
    pub duration: String,
    pub time_zone: String,
    pub reminders: String,
    pub recurrence_mode: RecurrenceMode,
    pub recurrence_fields: PresetFields,
    pub custom_rule: String,
    pub uid: Option<String>,
}

impl Default for EventForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            timed: false,
            time: "09:00".to_string(),
            duration: DEFAULT_DURATION_MINUTES.to_string(),
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            reminders: DEFAULT_REMINDERS.to_string(),
            recurrence_mode: RecurrenceMode::None,
            recurrence_fields: PresetFields {
                interval: "1".to_string(),
                ..PresetFields::default()
            },
            custom_rule: String::new(),
            uid: None,
        }
    }
}

impl EventForm {
    /// Validate the form against a computed date and produce an [`EventSpec`]
    ///
    /// `format` is the active date format, used for the recurrence until-date.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::MissingComputedDate`] if `date` is `None`
    /// - [`ValidationError::InvalidDate`] if `date` is the last representable day
    /// - [`ValidationError::InvalidTime`] for a bad `HH:MM` on a timed event
    /// - any recurrence error from [`RecurrenceSpec::from_mode`]
    pub fn into_spec(
        &self,
        date: Option<NaiveDate>,
        format: DateFormat,
    ) -> ValidationResult<EventSpec> {
        let date = date.ok_or(ValidationError::MissingComputedDate)?;
        // All-day events end on the following day, which must exist
        if date.succ_opt().is_none() {
            return Err(ValidationError::InvalidDate(date.to_string()));
        }

        let recurrence = RecurrenceSpec::from_mode(
            self.recurrence_mode,
            &self.recurrence_fields,
            &self.custom_rule,
            format,
        )?;

        let spec = if self.timed {
            let start = parse_hhmm(&self.time)?;
            EventSpec::timed(
                self.title.clone(),
                date,
                start,
                parse_duration(&self.duration),
            )
        } else {
            EventSpec::all_day(self.title.clone(), date)
        };

        let spec = spec
            .with_time_zone(self.time_zone.clone())
            .with_alarms(parse_alarm_list(&self.reminders))
            .with_recurrence(recurrence);

        Ok(match &self.uid {
            Some(uid) => spec.with_uid(uid.clone()),
            None => spec,
        })
    }
}

/// Duration in minutes; blank, unparseable or non-positive input means 60
#[must_use]
pub fn parse_duration(text: &str) -> u32 {
    let text = text.trim();
    if text.is_empty() {
        return DEFAULT_DURATION_MINUTES;
    }

    match text.parse::<u32>() {
        Ok(minutes) if minutes > 0 => minutes,
        _ => {
            warn!(
                "Ignoring duration '{}', using {} minutes",
                text, DEFAULT_DURATION_MINUTES
            );
            DEFAULT_DURATION_MINUTES
        }
    }
}
