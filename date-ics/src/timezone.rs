// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::{ValidationError, ValidationResult};
use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

/// Zone used whenever the requested one cannot be resolved
pub const DEFAULT_TIME_ZONE: &str = "America/New_York";

/// Resolve an IANA zone name, falling back to [`DEFAULT_TIME_ZONE`]
///
/// Never fails: blank or unknown names silently resolve to the default zone
/// (a warning is logged for unknown names).
#[must_use]
pub fn resolve_zone(name: &str) -> Tz {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return chrono_tz::America::New_York;
    }

    trimmed.parse::<Tz>().unwrap_or_else(|_| {
        warn!(
            "Unknown time zone '{}', falling back to {}",
            trimmed, DEFAULT_TIME_ZONE
        );
        chrono_tz::America::New_York
    })
}

/// Combine a wall-clock date and time in `zone` and return the UTC instant
///
/// - Ambiguous local times (clocks going back) resolve to the earlier instant
/// - Local times inside a gap (clocks going forward) use the offset in force
///   before the gap, so they land after the transition
#[must_use]
pub fn to_utc(date: NaiveDate, time: NaiveTime, zone: Tz) -> DateTime<Utc> {
    let local = date.and_time(time);

    match zone.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            let before_gap = zone.from_utc_datetime(&(local - Duration::days(1)));
            let offset = before_gap.offset().fix().local_minus_utc();
            let utc = Utc.from_utc_datetime(&(local - Duration::seconds(i64::from(offset))));
            debug!(
                "Local time {} does not exist in {}, using pre-transition offset -> {} UTC",
                local,
                zone.name(),
                utc
            );
            utc
        }
    }
}

/// Today's calendar date as seen in `zone`
#[must_use]
pub fn today_in(zone: Tz) -> NaiveDate {
    Utc::now().with_timezone(&zone).date_naive()
}

/// Parse a 24-hour `HH:MM` time of day
///
/// # Errors
///
/// Returns [`ValidationError::InvalidTime`] if the text is blank, is not two
/// colon-separated integers, or is outside 00:00-23:59.
pub fn parse_hhmm(text: &str) -> ValidationResult<NaiveTime> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::InvalidTime(
            "Enter a time like 09:30 or 17:00".to_string(),
        ));
    }

    let Some((hours, minutes)) = text.split_once(':') else {
        return Err(ValidationError::InvalidTime(
            "Time must be HH:MM".to_string(),
        ));
    };

    let (Ok(hours), Ok(minutes)) = (hours.trim().parse::<i64>(), minutes.trim().parse::<i64>())
    else {
        return Err(ValidationError::InvalidTime(
            "Time must be HH:MM".to_string(),
        ));
    };

    if !(0..=23).contains(&hours) || !(0..=59).contains(&minutes) {
        return Err(ValidationError::InvalidTime(
            "Time must be between 00:00 and 23:59".to_string(),
        ));
    }

    // Range checked above
    let hours = u32::try_from(hours).unwrap_or_default();
    let minutes = u32::try_from(minutes).unwrap_or_default();
    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(|| {
        ValidationError::InvalidTime("Time must be between 00:00 and 23:59".to_string())
    })
}
