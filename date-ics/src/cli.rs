// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use date_ics::alarms::DEFAULT_REMINDERS;
use date_ics::dates::{DateFormat, DateQuery, parse_days};
use date_ics::error::ValidationResult;
use date_ics::form::EventForm;
use date_ics::recurrence::{PresetFields, RecurrenceMode};
use date_ics::submit::{DEFAULT_API_BASE, DEFAULT_CALENDAR_ID};
use date_ics::timezone::{DEFAULT_TIME_ZONE, resolve_zone, today_in};
use std::path::PathBuf;

/// Count days between dates and turn the result into a calendar event
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Days between a start date (default: today) and an end date; the event lands on the end date
    Between {
        /// End date
        #[arg(long)]
        end: String,

        /// Start date (default: today in the selected time zone)
        #[arg(long)]
        start: Option<String>,

        #[command(flatten)]
        event: EventArgs,
    },

    /// The date N days from a start date (default: today); N may be negative
    Offset {
        /// Number of days to add
        #[arg(long, allow_hyphen_values = true)]
        days: String,

        /// Start date (default: today in the selected time zone)
        #[arg(long)]
        start: Option<String>,

        #[command(flatten)]
        event: EventArgs,
    },

    /// The start date N days before an end date; the event lands on that start date
    Before {
        /// End date
        #[arg(long)]
        end: String,

        /// Number of days to subtract
        #[arg(long, allow_hyphen_values = true)]
        days: String,

        #[command(flatten)]
        event: EventArgs,
    },
}

/// Event and output options shared by every mode
#[derive(Args, Debug, Clone)]
pub struct EventArgs {
    /// Format used for every date argument
    #[arg(long, value_enum, env = "DATE_ICS_FORMAT", default_value_t = DateFormat::Mdy)]
    pub date_format: DateFormat,

    /// IANA time zone (unknown names fall back to America/New_York)
    #[arg(long = "tz", env = "DATE_ICS_TZ", default_value = DEFAULT_TIME_ZONE)]
    pub time_zone: String,

    /// Event title (default: "Reminder")
    #[arg(long, default_value = "")]
    pub title: String,

    /// Create a timed event instead of an all-day event
    #[arg(long)]
    pub timed: bool,

    /// Start time for timed events (HH:MM, 24-hour)
    #[arg(long, default_value = "09:00")]
    pub time: String,

    /// Duration in minutes for timed events
    #[arg(long, default_value = "60")]
    pub duration: String,

    /// Comma-separated reminder offsets in minutes (at most 3 are used)
    #[arg(long, default_value = DEFAULT_REMINDERS, allow_hyphen_values = true)]
    pub reminders: String,

    /// Recurrence
    #[arg(long, value_enum, default_value_t = RecurrenceMode::None)]
    pub repeat: RecurrenceMode,

    /// Recurrence interval
    #[arg(long, default_value = "1", allow_hyphen_values = true)]
    pub interval: String,

    /// Number of occurrences (wins over --until)
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub count: String,

    /// Last date of the recurrence, in --date-format
    #[arg(long, default_value = "")]
    pub until: String,

    /// Rule used with --repeat custom, with or without a leading "RRULE:"
    #[arg(long, default_value = "")]
    pub rrule: String,

    /// Fixed event UID (default: freshly generated)
    #[arg(long)]
    pub uid: Option<String>,

    /// Write the event as an .ics file ("-" for stdout)
    #[arg(long)]
    pub ics: Option<PathBuf>,

    /// Insert the event into the calendar service
    #[arg(long)]
    pub submit: bool,

    /// Calendar service access token (or path to file containing it)
    #[arg(long, env = "GOOGLE_CALENDAR_TOKEN")]
    pub google_token: Option<String>,

    /// Calendar to insert into
    #[arg(long, env = "GOOGLE_CALENDAR_ID", default_value = DEFAULT_CALENDAR_ID)]
    pub calendar_id: String,

    /// Calendar service API base URL
    #[arg(long, env = "GOOGLE_CALENDAR_API", default_value = DEFAULT_API_BASE)]
    pub api_base: String,
}

/// Settings for talking to the calendar service
#[derive(Debug, Clone)]
pub struct SubmitSettings {
    pub api_base: String,
    pub calendar_id: String,
    pub access_token: String,
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Command {
    /// Options shared by all modes
    #[must_use]
    pub const fn event(&self) -> &EventArgs {
        match self {
            Self::Between { event, .. } | Self::Offset { event, .. } | Self::Before { event, .. } => {
                event
            }
        }
    }

    /// Turn the mode's raw arguments into a date query
    ///
    /// # Errors
    ///
    /// Returns a validation error for unparseable dates or day counts.
    pub fn query(&self) -> ValidationResult<DateQuery> {
        let event = self.event();
        let format = event.date_format;
        let start_or_today = |start: &Option<String>| -> ValidationResult<NaiveDate> {
            start.as_deref().map_or_else(
                || Ok(today_in(resolve_zone(&event.time_zone))),
                |text| format.parse(text),
            )
        };

        Ok(match self {
            Self::Between { end, start, .. } => DateQuery::Between {
                start: start_or_today(start)?,
                end: format.parse(end)?,
            },
            Self::Offset { days, start, .. } => DateQuery::Offset {
                start: start_or_today(start)?,
                days: parse_days(days)?,
            },
            Self::Before { end, days, .. } => DateQuery::BeforeEnd {
                end: format.parse(end)?,
                days: parse_days(days)?,
            },
        })
    }
}

impl EventArgs {
    /// The raw event form these arguments describe
    #[must_use]
    pub fn form(&self) -> EventForm {
        EventForm {
            title: self.title.clone(),
            timed: self.timed,
            time: self.time.clone(),
            duration: self.duration.clone(),
            time_zone: self.time_zone.clone(),
            reminders: self.reminders.clone(),
            recurrence_mode: self.repeat,
            recurrence_fields: PresetFields {
                interval: self.interval.clone(),
                count: self.count.clone(),
                until: self.until.clone(),
            },
            custom_rule: self.rrule.clone(),
            uid: self.uid.clone(),
        }
    }

    /// Load and validate calendar service settings
    ///
    /// The token can be either a direct value or a path to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No token was given
    /// - A file path is specified but cannot be read
    /// - The token or calendar ID is empty
    /// - The API base doesn't start with http:// or https://
    pub fn load_submit_settings(&self) -> Result<SubmitSettings> {
        let token = self.google_token.as_deref().ok_or_else(|| {
            anyhow::anyhow!("--submit requires --google-token (or GOOGLE_CALENDAR_TOKEN)")
        })?;
        let access_token =
            load_value_or_file(token).context("Failed to load calendar access token")?;

        validate_submit_settings(&self.api_base, &self.calendar_id, &access_token)?;

        Ok(SubmitSettings {
            api_base: self.api_base.clone(),
            calendar_id: self.calendar_id.clone(),
            access_token,
        })
    }
}

/// Load a value either directly or from a file
///
/// If the value exists as a file path, read its contents.
/// Otherwise, return the value as-is.
fn load_value_or_file(value: &str) -> Result<String> {
    let path = PathBuf::from(value);

    if path.exists() && path.is_file() {
        debug!("Loading value from file: {}", value);
        let contents =
            std::fs::read_to_string(&path).context(format!("Failed to read file: {value}"))?;
        Ok(contents.trim().to_string())
    } else {
        debug!("Using value directly (not a file path)");
        Ok(value.to_string())
    }
}

fn validate_submit_settings(api_base: &str, calendar_id: &str, token: &str) -> Result<()> {
    if token.is_empty() {
        anyhow::bail!("Calendar access token cannot be empty");
    }

    if calendar_id.is_empty() {
        anyhow::bail!("Calendar ID cannot be empty");
    }

    if !api_base.starts_with("http://") && !api_base.starts_with("https://") {
        anyhow::bail!("Calendar API base must start with http:// or https://");
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use date_ics::error::ValidationError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ENV_VARS: [&str; 5] = [
        "DATE_ICS_FORMAT",
        "DATE_ICS_TZ",
        "GOOGLE_CALENDAR_TOKEN",
        "GOOGLE_CALENDAR_ID",
        "GOOGLE_CALENDAR_API",
    ];

    fn parse_clean(args: &[&str]) -> Cli {
        temp_env::with_vars_unset(ENV_VARS, || Cli::parse_from(args))
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_load_value_or_file_direct_value() -> Result<()> {
        let result = load_value_or_file("direct_value")?;
        assert_eq!(result, "direct_value");
        Ok(())
    }

    #[test]
    fn test_load_value_or_file_trims_file_contents() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "  ya29.token  ")?;

        let path = temp_file
            .path()
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid path"))?;
        assert_eq!(load_value_or_file(path)?, "ya29.token");
        Ok(())
    }

    #[test]
    fn test_load_value_or_file_directory_not_file() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let dir_path = temp_dir.path().to_str().expect("path");

        // Directory exists but is not a file, should use value directly
        assert_eq!(load_value_or_file(dir_path)?, dir_path);
        Ok(())
    }

    #[test]
    fn test_validate_submit_settings() {
        assert!(validate_submit_settings("https://api.example", "primary", "tok").is_ok());
        assert!(validate_submit_settings("http://localhost:9000", "primary", "tok").is_ok());

        let err = validate_submit_settings("https://api.example", "primary", "").unwrap_err();
        assert!(err.to_string().contains("token cannot be empty"));

        let err = validate_submit_settings("https://api.example", "", "tok").unwrap_err();
        assert!(err.to_string().contains("Calendar ID cannot be empty"));

        let err = validate_submit_settings("ftp://api.example", "primary", "tok").unwrap_err();
        assert!(err.to_string().contains("must start with http"));
    }

    #[test]
    fn test_parse_between_defaults() {
        let cli = parse_clean(&["date-ics", "between", "--end", "12/25/2025"]);
        let event = cli.command.event();
        assert_eq!(event.date_format, DateFormat::Mdy);
        assert_eq!(event.time_zone, DEFAULT_TIME_ZONE);
        assert_eq!(event.reminders, "60,10");
        assert_eq!(event.repeat, RecurrenceMode::None);
        assert_eq!(event.calendar_id, "primary");
        assert_eq!(event.api_base, DEFAULT_API_BASE);
        assert!(!event.timed);
        assert!(!event.submit);
        assert!(event.ics.is_none());
    }

    #[test]
    fn test_between_query_with_start() {
        let cli = parse_clean(&[
            "date-ics",
            "between",
            "--start",
            "2025-01-01",
            "--end",
            "2025-02-01",
            "--date-format",
            "iso",
        ]);
        assert_eq!(
            cli.command.query().unwrap(),
            DateQuery::Between {
                start: ymd(2025, 1, 1),
                end: ymd(2025, 2, 1),
            }
        );
    }

    #[test]
    fn test_offset_query_defaults_start_to_today() {
        let cli = parse_clean(&["date-ics", "offset", "--days", "-7", "--tz", "UTC"]);
        let DateQuery::Offset { start, days } = cli.command.query().unwrap() else {
            panic!("expected offset query");
        };
        assert_eq!(days, -7);
        let today = chrono::Utc::now().date_naive();
        assert!((start - today).num_days().abs() <= 1);
    }

    #[test]
    fn test_before_query() {
        let cli = parse_clean(&[
            "date-ics",
            "before",
            "--end",
            "31/12/2025",
            "--days",
            "30",
            "--date-format",
            "dmy",
        ]);
        assert_eq!(
            cli.command.query().unwrap(),
            DateQuery::BeforeEnd {
                end: ymd(2025, 12, 31),
                days: 30,
            }
        );
    }

    #[test]
    fn test_query_reports_bad_input() {
        let cli = parse_clean(&["date-ics", "before", "--end", "2025-12-31", "--days", "5"]);
        assert!(matches!(
            cli.command.query().unwrap_err(),
            ValidationError::InvalidDate(_)
        ));

        let cli = parse_clean(&["date-ics", "offset", "--days", "soon"]);
        assert!(matches!(
            cli.command.query().unwrap_err(),
            ValidationError::InvalidDays(_)
        ));
    }

    #[test]
    fn test_form_from_args() {
        let cli = parse_clean(&[
            "date-ics",
            "offset",
            "--days",
            "3",
            "--title",
            "Renewal",
            "--timed",
            "--time",
            "17:30",
            "--duration",
            "20",
            "--reminders",
            "-5,15",
            "--repeat",
            "weekly",
            "--interval",
            "2",
            "--count",
            "4",
        ]);
        let form = cli.command.event().form();
        assert_eq!(form.title, "Renewal");
        assert!(form.timed);
        assert_eq!(form.time, "17:30");
        assert_eq!(form.duration, "20");
        assert_eq!(form.reminders, "-5,15");
        assert_eq!(form.recurrence_mode, RecurrenceMode::Weekly);
        assert_eq!(form.recurrence_fields.interval, "2");
        assert_eq!(form.recurrence_fields.count, "4");
    }

    #[test]
    fn test_parse_from_env() {
        temp_env::with_vars(
            [
                ("DATE_ICS_FORMAT", Some("iso")),
                ("DATE_ICS_TZ", Some("Europe/Paris")),
                ("GOOGLE_CALENDAR_TOKEN", Some("envtoken")),
                ("GOOGLE_CALENDAR_ID", Some("team@example.com")),
                ("GOOGLE_CALENDAR_API", Some("http://localhost:8080/v3")),
            ],
            || {
                let cli = Cli::parse_from(["date-ics", "between", "--end", "2025-06-01"]);
                let event = cli.command.event();
                assert_eq!(event.date_format, DateFormat::Iso);
                assert_eq!(event.time_zone, "Europe/Paris");
                assert_eq!(event.google_token.as_deref(), Some("envtoken"));
                assert_eq!(event.calendar_id, "team@example.com");
                assert_eq!(event.api_base, "http://localhost:8080/v3");
            },
        );
    }

    #[test]
    fn test_load_submit_settings_requires_token() {
        let cli = parse_clean(&["date-ics", "between", "--end", "12/25/2025", "--submit"]);
        let err = cli.command.event().load_submit_settings().unwrap_err();
        assert!(err.to_string().contains("--google-token"));
    }

    #[test]
    fn test_load_submit_settings_from_file() -> Result<()> {
        let mut token_file = NamedTempFile::new()?;
        writeln!(token_file, "file-token")?;
        let token_path = token_file.path().to_str().expect("path");

        let cli = parse_clean(&[
            "date-ics",
            "between",
            "--end",
            "12/25/2025",
            "--submit",
            "--google-token",
            token_path,
        ]);
        let settings = cli.command.event().load_submit_settings()?;
        assert_eq!(settings.access_token, "file-token");
        assert_eq!(settings.calendar_id, "primary");
        assert_eq!(settings.api_base, DEFAULT_API_BASE);
        Ok(())
    }

    #[test]
    fn test_load_submit_settings_bad_api_base() {
        let cli = parse_clean(&[
            "date-ics",
            "between",
            "--end",
            "12/25/2025",
            "--google-token",
            "tok",
            "--api-base",
            "calendar.example",
        ]);
        assert!(cli.command.event().load_submit_settings().is_err());
    }
}
