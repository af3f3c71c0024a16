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

#[macro_use]
extern crate tracing;

mod cli;

use anyhow::Result;
use cli::{Cli, EventArgs};
use date_ics::EventSpec;
use date_ics::ics::{IcsEncoder, write_ics};
use date_ics::submit::{GoogleCalendarClient, SubmitReceipt, submit_spec};
use std::io::Write;
use std::path::Path;
use tracing_subscriber::{EnvFilter, fmt};

/// `--ics` value that sends the document to stdout
const STDOUT_PATH: &str = "-";

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    // stdout carries the report and, with `--ics -`, the document itself
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    // Parse command line arguments
    let cli = Cli::parse_args();

    run(&cli, std::io::stdout(), std::io::stderr()).await
}

/// Output sinks for a run
///
/// Report and status lines go to `out` unless the document itself is being
/// written there, in which case they go to `notes`.
struct Console<O, E> {
    out: O,
    notes: E,
    document_on_out: bool,
}

impl<O: Write, E: Write> Console<O, E> {
    fn line(&mut self, text: &str) -> std::io::Result<()> {
        if self.document_on_out {
            writeln!(self.notes, "{text}")
        } else {
            writeln!(self.out, "{text}")
        }
    }

    fn document(&mut self, document: &str) -> std::io::Result<()> {
        self.out.write_all(document.as_bytes())?;
        self.out.flush()
    }
}

/// Compute, report, validate, then write and/or submit the event
///
/// # Errors
///
/// Returns an error for invalid input or a failed file write. A failed
/// calendar insert is reported as a status line instead.
async fn run<O, E>(cli: &Cli, out: O, notes: E) -> Result<()>
where
    O: Write + Send,
    E: Write + Send,
{
    let event = cli.command.event();
    let document_on_out = event.ics.as_deref() == Some(Path::new(STDOUT_PATH));
    let mut console = Console {
        out,
        notes,
        document_on_out,
    };

    let computation = cli.command.query()?.compute(event.date_format)?;
    console.line(&computation.report)?;

    // Validation happens before anything is written or sent
    let spec = event
        .form()
        .into_spec(Some(computation.date), event.date_format)?;
    debug!("Event spec: {:?}", spec);

    let mut status = Vec::new();

    if let Some(path) = &event.ics {
        let document = IcsEncoder::new().encode(&spec);
        let kind = if spec.is_all_day() { "all-day" } else { "timed" };

        if document_on_out {
            console.document(&document)?;
        } else {
            write_ics(path, &document)?;
            status.push(format!(".ics ({kind}) saved: {}", path.display()));
        }
    }

    if event.submit {
        match submit(event, &spec).await {
            Ok(receipt) => status.push(receipt.to_string()),
            Err(e) => {
                warn!("Calendar insert failed: {:#}", e);
                status.push(format!("Calendar insert failed: {e:#}"));
            }
        }
    }

    if event.ics.is_none() && !event.submit {
        status.push("(No .ics or calendar insert selected.)".to_string());
    }

    for line in status {
        console.line(&line)?;
    }

    Ok(())
}

async fn submit(event: &EventArgs, spec: &EventSpec) -> Result<SubmitReceipt> {
    let settings = event.load_submit_settings()?;

    info!(
        "Inserting event into calendar {} at {}",
        settings.calendar_id, settings.api_base
    );

    let client = GoogleCalendarClient::new(
        &settings.api_base,
        &settings.calendar_id,
        &settings.access_token,
    )?;

    submit_spec(&client, spec).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    const ENV_VARS: [&str; 5] = [
        "DATE_ICS_FORMAT",
        "DATE_ICS_TZ",
        "GOOGLE_CALENDAR_TOKEN",
        "GOOGLE_CALENDAR_ID",
        "GOOGLE_CALENDAR_API",
    ];

    fn parse_clean(extra: &[&str]) -> Cli {
        let mut args = vec![
            "date-ics",
            "between",
            "--start",
            "2025-01-01",
            "--end",
            "2025-01-13",
            "--date-format",
            "iso",
        ];
        args.extend_from_slice(extra);
        temp_env::with_vars_unset(ENV_VARS, || Cli::parse_from(args))
    }

    async fn run_captured(cli: &Cli) -> (Result<()>, String, String) {
        let mut out = Vec::new();
        let mut notes = Vec::new();
        let result = run(cli, &mut out, &mut notes).await;
        (
            result,
            String::from_utf8(out).unwrap(),
            String::from_utf8(notes).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_report_then_no_output_selected() {
        let (result, out, notes) = run_captured(&parse_clean(&[])).await;

        result.unwrap();
        assert!(out.starts_with("Start: 2025-01-01\n"));
        assert!(out.contains("Result: 12 day(s) (12 ahead of start).\n"));
        assert!(out.ends_with("(No .ics or calendar insert selected.)\n"));
        assert!(notes.is_empty());
    }

    #[tokio::test]
    async fn test_ics_file_saved_line() {
        let temp_dir = tempfile::tempdir().unwrap();
        let ics_path = temp_dir.path().join("event.ics");
        let ics_arg = ics_path.to_str().unwrap();

        let (result, out, _) = run_captured(&parse_clean(&["--ics", ics_arg])).await;
        result.unwrap();
        assert!(out.ends_with(&format!(".ics (all-day) saved: {ics_arg}\n")));
        assert!(!out.contains("No .ics"));

        let written = std::fs::read_to_string(&ics_path).unwrap();
        assert!(written.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(written.contains("DTSTART;VALUE=DATE:20250113\r\n"));

        let (result, out, _) =
            run_captured(&parse_clean(&["--ics", ics_arg, "--timed", "--time", "08:15"])).await;
        result.unwrap();
        assert!(out.contains(".ics (timed) saved: "));
    }

    #[tokio::test]
    async fn test_ics_to_stdout_carries_only_the_document() {
        let (result, out, notes) = run_captured(&parse_clean(&["--ics", "-"])).await;

        result.unwrap();
        assert!(out.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(out.ends_with("END:VCALENDAR\r\n"));
        assert!(!out.contains("Result:"));
        assert!(out.parse::<icalendar::Calendar>().is_ok());

        assert!(notes.contains("Result: 12 day(s)"));
        assert!(!notes.contains("BEGIN:VCALENDAR"));
    }

    #[tokio::test]
    async fn test_invalid_input_writes_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let ics_path = temp_dir.path().join("never.ics");

        let cli = parse_clean(&[
            "--ics",
            ics_path.to_str().unwrap(),
            "--timed",
            "--time",
            "25:00",
        ]);
        let (result, out, _) = run_captured(&cli).await;

        let err = result.unwrap_err();
        assert!(err.to_string().contains("Time must be between 00:00 and 23:59"));
        assert!(out.contains("Result: 12 day(s)"));
        assert!(!ics_path.exists());
    }

    #[tokio::test]
    async fn test_failed_insert_keeps_file_and_succeeds() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/calendars/primary/events"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid Credentials"))
            .mount(&mock_server)
            .await;

        let temp_dir = tempfile::tempdir().unwrap();
        let ics_path = temp_dir.path().join("event.ics");
        let uri = mock_server.uri();

        let cli = parse_clean(&[
            "--ics",
            ics_path.to_str().unwrap(),
            "--submit",
            "--google-token",
            "expired",
            "--api-base",
            &uri,
        ]);
        let (result, out, _) = run_captured(&cli).await;

        result.unwrap();
        assert!(out.contains(".ics (all-day) saved: "));
        assert!(out.contains("Calendar insert failed: Calendar API error: 401"));
        assert!(ics_path.exists());
    }

    #[tokio::test]
    async fn test_submit_without_token_is_reported() {
        let (result, out, _) = run_captured(&parse_clean(&["--submit"])).await;

        result.unwrap();
        assert!(out.contains("Calendar insert failed: --submit requires --google-token"));
        assert!(!out.contains("No .ics"));
    }

    #[tokio::test]
    async fn test_successful_insert_line() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/calendars/primary/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "evt1",
                "htmlLink": "https://calendar.example/e/evt1",
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();
        let cli = parse_clean(&["--submit", "--google-token", "tok", "--api-base", &uri]);
        let (result, out, _) = run_captured(&cli).await;

        result.unwrap();
        assert!(out.ends_with("Event created: https://calendar.example/e/evt1\n"));
    }
}
