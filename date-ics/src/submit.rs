// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pushing an event to an external calendar service.
//!
//! The encoder's output is mirrored as a JSON event body: all-day events
//! carry a bare date pair (end exclusive), timed events carry zone-aware
//! instants plus the zone name, and a recurrence is sent as a one-element
//! `RRULE:` list. Credentials are supplied ready to use; acquiring or
//! refreshing them is the caller's business.

use crate::ics::EventWindow;
use crate::models::EventSpec;
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Default REST endpoint for the calendar service
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Calendar used when none is configured
pub const DEFAULT_CALENDAR_ID: &str = "primary";

/// Start or end of an event in the service's event body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum EventTime {
    Date {
        date: NaiveDate,
    },
    DateTime {
        #[serde(rename = "dateTime")]
        date_time: DateTime<FixedOffset>,
        #[serde(rename = "timeZone")]
        time_zone: String,
    },
}

/// Event-creation body sent to the calendar service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventPayload {
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Vec<String>>,
}

impl EventPayload {
    /// Build the payload from the same spec the iCalendar encoder uses
    #[must_use]
    pub fn from_spec(spec: &EventSpec) -> Self {
        let (start, end) = match EventWindow::for_spec(spec) {
            EventWindow::AllDay { start, end } => {
                (EventTime::Date { date: start }, EventTime::Date { date: end })
            }
            EventWindow::Timed { start, end, zone } => {
                let at = |instant: DateTime<Utc>| EventTime::DateTime {
                    date_time: instant.with_timezone(&zone).fixed_offset(),
                    time_zone: zone.name().to_string(),
                };
                (at(start), at(end))
            }
        };

        Self {
            summary: spec.display_title().to_string(),
            start,
            end,
            recurrence: spec
                .recurrence
                .rule_body()
                .map(|body| vec![format!("RRULE:{body}")]),
        }
    }
}

/// What the service reports back for a created event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SubmitReceipt {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "htmlLink")]
    pub html_link: Option<String>,
}

impl std::fmt::Display for SubmitReceipt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Event created: {}",
            self.html_link.as_deref().unwrap_or("(no link)")
        )
    }
}

/// The one capability the tool needs from a calendar service
pub trait EventSubmitter {
    /// Create `payload` as a new event
    fn submit(&self, payload: &EventPayload) -> impl Future<Output = Result<SubmitReceipt>> + Send;
}

/// REST client for a Google-Calendar-compatible events endpoint
#[derive(Debug, Clone)]
pub struct GoogleCalendarClient {
    http: reqwest::Client,
    api_base: String,
    calendar_id: String,
    access_token: String,
}

impl GoogleCalendarClient {
    /// Create a client for `calendar_id` under `api_base`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(api_base: &str, calendar_id: &str, access_token: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            calendar_id: calendar_id.to_string(),
            access_token: access_token.to_string(),
        })
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/{}/events", self.api_base, self.calendar_id)
    }
}

impl EventSubmitter for GoogleCalendarClient {
    fn submit(&self, payload: &EventPayload) -> impl Future<Output = Result<SubmitReceipt>> + Send {
        let url = self.events_url();
        let request = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(payload);

        async move {
            debug!("Submitting event to {}", url);

            let response = request
                .send()
                .await
                .context("Failed to reach calendar service")?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                anyhow::bail!("Calendar API error: {status}: {body}");
            }

            let receipt: SubmitReceipt = response
                .json()
                .await
                .context("Failed to parse calendar service response")?;

            info!(
                "Created event {}",
                receipt.id.as_deref().unwrap_or("(no id)")
            );
            Ok(receipt)
        }
    }
}

/// Derive the payload from `spec` and hand it to `submitter`
///
/// # Errors
///
/// Propagates the submitter's error.
pub async fn submit_spec<S: EventSubmitter + Sync>(
    submitter: &S,
    spec: &EventSpec,
) -> Result<SubmitReceipt> {
    let payload = EventPayload::from_spec(spec);
    submitter.submit(&payload).await
}
