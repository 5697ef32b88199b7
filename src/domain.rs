use std::fmt::{self, Display};

use chrono::{DateTime, FixedOffset, SecondsFormat, TimeZone};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::CopyError;
use crate::time::next_day;

/// A time entry as the API returns it.
///
/// Only `start`/`stop` and the identity fields are interpreted; everything
/// else is carried through untouched so the copy keeps project, tags,
/// description, billable flags and whatever the service adds later.
pub type TimeEntry = Map<String, Value>;

/// Server-assigned fields that must not be sent back on create.
pub const IDENTITY_FIELDS: [&str; 4] = ["guid", "uid", "id", "at"];

pub const CREATED_WITH: &str = "api";

/// Body of a create request: `{"time_entry": {..., "created_with": "api"}}`.
#[derive(Debug, Serialize)]
pub struct CreateEnvelope {
    pub time_entry: TimeEntry,
}

impl CreateEnvelope {
    /// Wraps `entry` and marks it as created through the API.
    pub fn new(mut entry: TimeEntry) -> Self {
        entry.insert("created_with".into(), Value::String(CREATED_WITH.into()));
        Self { time_entry: entry }
    }
}

impl fmt::Display for CreateEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Strips identity fields from every entry.
pub fn sanitize(mut entries: Vec<TimeEntry>) -> Vec<TimeEntry> {
    for entry in &mut entries {
        for field in IDENTITY_FIELDS {
            entry.remove(field);
        }
    }
    entries
}

fn parse_timestamp(
    entry: &TimeEntry,
    field: &'static str,
) -> Result<DateTime<FixedOffset>, CopyError> {
    let raw = match entry.get(field) {
        Some(Value::String(raw)) => raw,
        other => {
            return Err(CopyError::TimestampParse {
                field,
                value: other.map_or_else(|| "missing".to_string(), Value::to_string),
                reason: "expected an RFC3339 string".into(),
            })
        }
    };
    DateTime::parse_from_rfc3339(raw).map_err(|e| CopyError::TimestampParse {
        field,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Advances `start` and `stop` by one calendar day in `tz`.
///
/// Both fields are parsed before either is written, so a bad `stop` leaves
/// the entry unchanged.
pub fn shift_to_next_day<Tz>(entry: &mut TimeEntry, tz: &Tz) -> Result<(), CopyError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut shifted = Vec::with_capacity(2);
    for field in ["start", "stop"] {
        let t = parse_timestamp(entry, field)?.with_timezone(tz);
        let next = next_day(&t).ok_or_else(|| {
            CopyError::DateOutOfRange(format!("day after {field} {}", t.to_rfc3339()))
        })?;
        shifted.push((field, next.to_rfc3339_opts(SecondsFormat::AutoSi, true)));
    }
    for (field, value) in shifted {
        entry.insert(field.to_string(), Value::String(value));
    }
    Ok(())
}
