//! Calendar-day math in the server's local time zone.
//!
//! Entries are bucketed by the local calendar day of their creation
//! timestamp, so "today" follows the server clock, not UTC.

use chrono::{DateTime, Days, Local, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};

/// Today's date on the server's local clock.
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// Local midnight of `day`, in UTC.
fn local_midnight(day: NaiveDate) -> DateTime<Utc> {
    let naive = day.and_time(NaiveTime::MIN);
    let local = match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
        // Midnight falls in a DST gap; the hour after it always exists.
        LocalResult::None => Local
            .from_local_datetime(&(naive + chrono::Duration::hours(1)))
            .earliest()
            .unwrap_or_else(|| Local.from_utc_datetime(&naive)),
    };
    local.with_timezone(&Utc)
}

/// Half-open window `[local midnight, next local midnight)` covering the
/// given calendar day. An entry stamped 23:59:59.999 is inside; one
/// stamped at the next midnight is not.
pub fn local_day_bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = local_midnight(day);
    let end = local_midnight(day.checked_add_days(Days::new(1)).unwrap_or(day));
    (start, end)
}

/// The trailing seven calendar days ending with `last`, oldest first.
pub fn trailing_week(last: NaiveDate) -> Vec<NaiveDate> {
    (0..7)
        .rev()
        .filter_map(|back| last.checked_sub_days(Days::new(back)))
        .collect()
}
