use chrono::DateTime;
use chrono_tz::Tz;
use tracing::info;

use crate::domain::{sanitize, shift_to_next_day, CreateEnvelope};
use crate::error::CopyError;
use crate::time::DAY_LABEL_FORMAT;
use crate::toggl::TimeEntryApi;

pub struct Engine<A> {
    api: A,
    dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopySummary {
    pub found: usize,
    pub created: usize,
}

impl<A: TimeEntryApi> Engine<A> {
    pub fn new(api: A, dry_run: bool) -> Self {
        Self { api, dry_run }
    }

    /// fetch -> sanitize -> shift -> create, one entry at a time.
    ///
    /// Entries are shifted in `day`'s zone. The first error aborts the run;
    /// entries already created stay created.
    pub fn copy_day(&self, day: &DateTime<Tz>) -> Result<CopySummary, CopyError> {
        let entries = self.api.fetch_day_entries(day)?;
        let label = day.format(DAY_LABEL_FORMAT).to_string();
        info!(
            count = entries.len(),
            day = %label,
            "Found {} time entries at {}",
            entries.len(),
            label
        );

        let entries = sanitize(entries);
        let found = entries.len();
        let zone = day.timezone();

        let shifted = entries.into_iter().map(|mut entry| {
            shift_to_next_day(&mut entry, &zone)?;
            Ok::<_, CopyError>(entry)
        });

        let created = if self.dry_run {
            for (index, entry) in shifted.enumerate() {
                let payload = CreateEnvelope::new(entry?);
                info!(index, %payload, "dry_run: skipping create");
            }
            0
        } else {
            self.api.create_entries(shifted)?
        };

        Ok(CopySummary { found, created })
    }
}
