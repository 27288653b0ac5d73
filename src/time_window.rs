//! Wall-clock time window evaluation.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use tracing::debug;

use crate::types::TimeWindow;

/// Whether `now` falls inside the window's `[start, end)` range, or
/// `[start, +inf)` when no end date is authored.
///
/// Hour and minute fields are zero-padded into the timestamp; a missing or
/// unparsable start (or an authored but unparsable end) evaluates closed.
#[must_use]
pub fn is_time_window_open(window: &TimeWindow, now: DateTime<Utc>) -> bool {
    let Some(start) = parse_stamp(
        &window.start_date,
        window.start_date_hour,
        window.start_date_minute,
    ) else {
        debug!(date = %window.start_date, "unparsable time window start");
        return false;
    };
    if now < start {
        return false;
    }

    match &window.end_date {
        None => true,
        Some(end_date) => {
            let Some(end) = parse_stamp(end_date, window.end_date_hour, window.end_date_minute)
            else {
                debug!(date = %end_date, "unparsable time window end");
                return false;
            };
            now < end
        }
    }
}

fn parse_stamp(date: &str, hour: u32, minute: u32) -> Option<DateTime<Utc>> {
    let stamp = format!("{date}T{hour:02}:{minute:02}:00");
    NaiveDateTime::parse_from_str(&stamp, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}
