// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;

/// User-facing validation failures.
///
/// Every variant is reported to the caller as-is; nothing here is retried
/// and no partial document is produced when one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0}")]
    InvalidTime(String),

    #[error("Interval must be an integer (got '{0}').")]
    InvalidInterval(String),

    #[error("Count must be an integer (got '{0}').")]
    InvalidCount(String),

    #[error("Interval is too large (got '{0}', maximum {max}).", max = u32::MAX)]
    IntervalTooLarge(String),

    #[error("Count is too large (got '{0}', maximum {max}).", max = u32::MAX)]
    CountTooLarge(String),

    #[error("Invalid UNTIL date '{0}'.")]
    InvalidUntilDate(String),

    #[error("Custom RRULE is empty.")]
    EmptyRecurrence,

    #[error("No target date computed yet.")]
    MissingComputedDate,

    #[error("Invalid date '{0}'.")]
    InvalidDate(String),

    #[error("{0}")]
    InvalidDays(String),
}

pub type ValidationResult<T> = std::result::Result<T, ValidationError>;
