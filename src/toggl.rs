use std::time::Duration;

use chrono::{DateTime, SecondsFormat, TimeZone};
use chrono_tz::Tz;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Method;
use tracing::debug;

use crate::domain::{CreateEnvelope, TimeEntry};
use crate::error::CopyError;
use crate::time::{end_of_day, start_of_day};

pub const TIME_ENTRIES_PATH: &str = "time_entries";

/// Toggl's convention: the token is the username, this literal the password.
const TOKEN_PASSWORD: &str = "api_token";

/// The two calls a copy run needs from the time-tracking service.
pub trait TimeEntryApi {
    /// All entries whose start lies within `day`'s calendar day.
    fn fetch_day_entries(&self, day: &DateTime<Tz>) -> Result<Vec<TimeEntry>, CopyError>;

    fn create_entry(&self, entry: TimeEntry) -> Result<(), CopyError>;

    /// Creates entries strictly in order and returns how many were created.
    ///
    /// Entries are pulled one at a time, so an `Err` in the input (a record
    /// that could not be prepared) stops the run just like a failed request.
    /// Entries created before the failure are not rolled back.
    fn create_entries<I>(&self, entries: I) -> Result<usize, CopyError>
    where
        I: IntoIterator<Item = Result<TimeEntry, CopyError>>,
    {
        let mut created = 0;
        for (index, entry) in entries.into_iter().enumerate() {
            self.create_entry(entry?)?;
            created += 1;
            debug!(index, "toggl.created");
        }
        Ok(created)
    }
}

#[derive(Clone)]
pub struct TogglClient {
    base_url: String,
    token: String,
    http: Client,
}

fn rfc3339<T: TimeZone>(t: &DateTime<T>) -> String
where
    T::Offset: std::fmt::Display,
{
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn ensure_success(method: &'static str, resp: Response) -> Result<Response, CopyError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(CopyError::Status {
            method,
            url: resp.url().to_string(),
            status,
        });
    }
    Ok(resp)
}

impl TogglClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self, CopyError> {
        // Calls may block indefinitely; no request timeout is applied.
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(None::<Duration>)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            http,
        })
    }

    fn request(&self, method: Method) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, TIME_ENTRIES_PATH);
        self.http
            .request(method, url)
            .basic_auth(&self.token, Some(TOKEN_PASSWORD))
    }
}

impl TimeEntryApi for TogglClient {
    fn fetch_day_entries(&self, day: &DateTime<Tz>) -> Result<Vec<TimeEntry>, CopyError> {
        let (start, end) = start_of_day(day)
            .zip(end_of_day(day))
            .ok_or_else(|| CopyError::DateOutOfRange(format!("day window of {day}")))?;
        let (start_date, end_date) = (rfc3339(&start), rfc3339(&end));
        debug!(%start_date, %end_date, "toggl.fetch");

        let resp = self
            .request(Method::GET)
            .query(&[("start_date", &start_date), ("end_date", &end_date)])
            .send()?;
        let body = ensure_success("GET", resp)?.text()?;
        Ok(serde_json::from_str(&body)?)
    }

    fn create_entry(&self, entry: TimeEntry) -> Result<(), CopyError> {
        let resp = self
            .request(Method::POST)
            .json(&CreateEnvelope::new(entry))
            .send()?;
        let status = ensure_success("POST", resp)?.status();
        debug!(%status, "toggl.create");
        Ok(())
    }
}
