use chrono::{DateTime, Days, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::CopyError;

/// Human-readable day, e.g. "January 02, 2006".
pub const DAY_LABEL_FORMAT: &str = "%B %d, %Y";

/// Maps a wall-clock time onto `tz`.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant; times that
/// fall in a DST gap are pushed forward past the gap.
fn localize<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&naive).earliest().or_else(|| {
        let later = naive.checked_add_signed(Duration::hours(1))?;
        tz.from_local_datetime(&later).earliest()
    })
}

fn midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<DateTime<Tz>> {
    localize(tz, date.and_hms_opt(0, 0, 0)?)
}

/// Midnight of `t`'s calendar date in `t`'s time zone.
pub fn start_of_day<Tz: TimeZone>(t: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    midnight(&t.timezone(), t.date_naive())
}

/// One nanosecond before the next day's midnight, in `t`'s time zone.
pub fn end_of_day<Tz: TimeZone>(t: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    let next = midnight(&t.timezone(), t.date_naive().succ_opt()?)?;
    next.checked_sub_signed(Duration::nanoseconds(1))
}

/// Moves `t` by whole calendar days, keeping the wall-clock time in `t`'s zone.
pub fn shift_days<Tz: TimeZone>(t: &DateTime<Tz>, days: i64) -> Option<DateTime<Tz>> {
    let naive = t.naive_local();
    let step = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        naive.checked_add_days(step)?
    } else {
        naive.checked_sub_days(step)?
    };
    localize(&t.timezone(), shifted)
}

pub fn next_day<Tz: TimeZone>(t: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    shift_days(t, 1)
}

/// The day to copy: `now` moved `days` calendar days, seen from `tz`.
pub fn target_day(
    now: DateTime<Utc>,
    days: i64,
    tz: &chrono_tz::Tz,
) -> Result<DateTime<chrono_tz::Tz>, CopyError> {
    shift_days(&now.with_timezone(tz), days)
        .ok_or_else(|| CopyError::DateOutOfRange(format!("{days} days from {now}")))
}
