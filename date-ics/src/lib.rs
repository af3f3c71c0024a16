// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Date counting and iCalendar event generation.
//!
//! The crate computes a date relationship (days between two dates, a date
//! offset by N days, or a start date N days before an end date) and turns
//! the resulting date into a single-event iCalendar document, optionally
//! with a recurrence rule and up to three reminders.

#[macro_use]
extern crate tracing;

pub mod alarms;
pub mod dates;
pub mod error;
pub mod form;
pub mod ics;
pub mod models;
pub mod recurrence;
pub mod submit;
pub mod timezone;

pub use error::{ValidationError, ValidationResult};
pub use ics::IcsEncoder;
pub use models::{EventKind, EventSpec, Frequency, RecurrenceSpec, Terminator};
