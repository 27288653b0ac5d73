use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use tracing::debug;

use crate::types::AttributeValue;

/// Date-time comparator.
///
/// `lessThan`/`moreThan`/`exactly` read the operand as a relative day count
/// anchored at `now` ("N days before now"); `before`/`on`/`after` read it as
/// an absolute date. An unparsable actual date is false for every logic.
pub(super) fn compare(
    logic: &str,
    actual: Option<&AttributeValue>,
    operands: &[AttributeValue],
    now: DateTime<Utc>,
) -> bool {
    let Some(actual) = actual.and_then(parse_datetime) else {
        return false;
    };

    match logic {
        "lessThan" | "moreThan" | "exactly" => {
            let Some(days) = operands.first().and_then(AttributeValue::as_number) else {
                return false;
            };
            if !days.is_finite() {
                return false;
            }
            // day counts large enough to overflow the date range are closed
            #[allow(clippy::cast_possible_truncation)]
            let Some(delta) = Duration::try_days(days as i64) else {
                return false;
            };
            let Some(anchor) = now.checked_sub_signed(delta) else {
                return false;
            };
            match logic {
                "lessThan" => actual > anchor,
                "moreThan" => actual < anchor,
                // exactly: anywhere inside the anchor's calendar day
                _ => {
                    let start = day_start(anchor);
                    let Some(end) = start.checked_add_signed(Duration::days(1)) else {
                        return false;
                    };
                    actual >= start && actual < end
                }
            }
        }
        "before" | "on" | "after" => {
            let Some(operand) = operands.first().and_then(parse_datetime) else {
                return false;
            };
            let start = day_start(operand);
            let Some(end) = start.checked_add_signed(Duration::days(1)) else {
                return false;
            };
            match logic {
                "before" => actual < start,
                "on" => actual >= start && actual < end,
                _ => actual >= end,
            }
        }
        other => {
            debug!(logic = other, "unknown date-time logic");
            false
        }
    }
}

/// Parse a runtime or operand value into a UTC instant. Accepts RFC 3339,
/// a bare `YYYY-MM-DDTHH:MM:SS`, a bare `YYYY-MM-DD` (midnight), or an
/// epoch-milliseconds number.
fn parse_datetime(value: &AttributeValue) -> Option<DateTime<Utc>> {
    match value {
        #[allow(clippy::cast_possible_truncation)]
        AttributeValue::Number(ms) => Utc.timestamp_millis_opt(*ms as i64).single(),
        AttributeValue::String(s) => {
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                return Some(Utc.from_utc_datetime(&naive));
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .map(|d| Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN)))
        }
        _ => None,
    }
}

fn day_start(instant: DateTime<Utc>) -> DateTime<Utc> {
    Utc.from_utc_datetime(&instant.date_naive().and_time(NaiveTime::MIN))
}
