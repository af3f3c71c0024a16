// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::dates::DateFormat;
use crate::error::{ValidationError, ValidationResult};
use crate::models::{Frequency, RecurrenceSpec, Terminator};
use chrono::NaiveDate;
use clap::ValueEnum;

/// Recurrence choice as offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RecurrenceMode {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Custom,
}

impl RecurrenceMode {
    /// Preset frequency for this mode, if it is a preset
    #[must_use]
    pub const fn frequency(self) -> Option<Frequency> {
        match self {
            Self::Daily => Some(Frequency::Daily),
            Self::Weekly => Some(Frequency::Weekly),
            Self::Monthly => Some(Frequency::Monthly),
            Self::Yearly => Some(Frequency::Yearly),
            Self::None | Self::Custom => None,
        }
    }
}

/// Raw text fields for a preset recurrence, exactly as typed
///
/// Blank strings mean "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetFields {
    pub interval: String,
    pub count: String,
    pub until: String,
}

impl RecurrenceSpec {
    /// Build a custom recurrence from a user-supplied rule
    ///
    /// A leading `RRULE:` (any case) is stripped; the rest is kept verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyRecurrence`] if nothing is left.
    pub fn custom(raw: &str) -> ValidationResult<Self> {
        let raw = raw.trim();
        let body = raw
            .get(..6)
            .filter(|prefix| prefix.eq_ignore_ascii_case("RRULE:"))
            .map_or(raw, |_| &raw[6..]);

        if body.trim().is_empty() {
            return Err(ValidationError::EmptyRecurrence);
        }

        Ok(Self::Custom(body.to_string()))
    }

    /// Build a preset recurrence from raw interval/count/until text
    ///
    /// - Blank interval means 1; anything at or below 1 is treated as 1
    /// - A positive count wins over an until date when both are given
    /// - A count of zero or less is ignored (falling through to until)
    ///
    /// # Errors
    ///
    /// - [`ValidationError::InvalidInterval`] for a non-integer interval
    /// - [`ValidationError::InvalidCount`] for a non-integer count
    /// - [`ValidationError::IntervalTooLarge`] / [`ValidationError::CountTooLarge`]
    ///   for integers beyond `u32::MAX`
    /// - [`ValidationError::InvalidUntilDate`] if the until date does not parse
    pub fn preset(
        frequency: Frequency,
        fields: &PresetFields,
        format: DateFormat,
    ) -> ValidationResult<Self> {
        let interval = parse_interval(&fields.interval)?;
        let terminator = parse_terminator(&fields.count, &fields.until, format)?;

        Ok(Self::Preset {
            frequency,
            interval,
            terminator,
        })
    }

    /// Build the recurrence selected by `mode`
    ///
    /// # Errors
    ///
    /// Propagates errors from [`RecurrenceSpec::custom`] and [`RecurrenceSpec::preset`].
    pub fn from_mode(
        mode: RecurrenceMode,
        fields: &PresetFields,
        custom: &str,
        format: DateFormat,
    ) -> ValidationResult<Self> {
        match mode {
            RecurrenceMode::None => Ok(Self::None),
            RecurrenceMode::Custom => Self::custom(custom),
            preset => preset
                .frequency()
                .map_or(Ok(Self::None), |frequency| {
                    Self::preset(frequency, fields, format)
                }),
        }
    }

    /// The rule body (without the `RRULE:` keyword), or `None` for no recurrence
    ///
    /// Preset fields are always emitted as FREQ, then INTERVAL, then COUNT or UNTIL.
    #[must_use]
    pub fn rule_body(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Custom(body) => Some(body.clone()),
            Self::Preset {
                frequency,
                interval,
                terminator,
            } => {
                let mut parts = vec![format!("FREQ={}", frequency.as_str())];

                if *interval > 1 {
                    parts.push(format!("INTERVAL={interval}"));
                }

                match terminator {
                    Terminator::Count(count) if *count > 0 => parts.push(format!("COUNT={count}")),
                    Terminator::Until(date) => parts.push(format!("UNTIL={}", format_until(*date))),
                    Terminator::Count(_) | Terminator::None => {}
                }

                Some(parts.join(";"))
            }
        }
    }
}

/// Compose a rule body straight from form input
///
/// # Errors
///
/// Same as [`RecurrenceSpec::from_mode`].
pub fn compose_rule(
    mode: RecurrenceMode,
    fields: &PresetFields,
    custom: &str,
    format: DateFormat,
) -> ValidationResult<Option<String>> {
    let rule = RecurrenceSpec::from_mode(mode, fields, custom, format)?.rule_body();
    if let Some(body) = &rule {
        debug!("Composed RRULE: {}", body);
    }
    Ok(rule)
}

/// UNTIL is always midnight UTC of the given day, in basic format
#[must_use]
pub fn format_until(date: NaiveDate) -> String {
    format!("{}T000000Z", date.format("%Y%m%d"))
}

fn parse_interval(text: &str) -> ValidationResult<u32> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(1);
    }

    let value = text
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidInterval(text.to_string()))?;

    if value <= 1 {
        return Ok(1);
    }

    u32::try_from(value).map_err(|_| ValidationError::IntervalTooLarge(text.to_string()))
}

fn parse_terminator(count: &str, until: &str, format: DateFormat) -> ValidationResult<Terminator> {
    let count = count.trim();
    let until = until.trim();

    if !count.is_empty() {
        let value = count
            .parse::<i64>()
            .map_err(|_| ValidationError::InvalidCount(count.to_string()))?;

        if value > 0 {
            let value =
                u32::try_from(value).map_err(|_| ValidationError::CountTooLarge(count.to_string()))?;
            if !until.is_empty() {
                debug!("Both COUNT and UNTIL supplied; COUNT={} wins", value);
            }
            return Ok(Terminator::Count(value));
        }
    }

    if until.is_empty() {
        return Ok(Terminator::None);
    }

    format
        .parse(until)
        .map(Terminator::Until)
        .map_err(|_| ValidationError::InvalidUntilDate(until.to_string()))
}
