//! Time utilities — venue timezone conversion
//!
//! All date/time parsing happens at the API handler layer; the repository
//! layer only ever sees `i64` Unix millis.

use chrono::{NaiveDate, NaiveTime, Timelike};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date format: {}", date)))
}

/// Parse a time-of-day string (HH:MM)
pub fn parse_hhmm(time: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| AppError::Validation(format!("Invalid time format: {}", time)))
}

/// Date + hour/minute -> Unix millis (venue timezone)
///
/// DST gap fallback: if the local time does not exist (spring-forward),
/// fall back to interpreting the wall time as UTC.
pub fn date_hm_to_millis(date: NaiveDate, hour: u32, min: u32, tz: Tz) -> i64 {
    let naive = date.and_hms_opt(hour, min, 0).unwrap_or_else(|| {
        date.and_time(NaiveTime::MIN)
    });
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// Minutes since midnight for a time-of-day
pub fn minutes_of(time: NaiveTime) -> i64 {
    (time.hour() * 60 + time.minute()) as i64
}

/// Format minutes-since-midnight as an HH:MM label (wraps past midnight)
pub fn minutes_label(minutes: i64) -> String {
    let m = minutes.rem_euclid(24 * 60);
    format!("{:02}:{:02}", m / 60, m % 60)
}

/// Current instant as Unix millis
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Today's date in the venue timezone
pub fn today_in_tz(tz: Tz) -> NaiveDate {
    chrono::Utc::now().with_timezone(&tz).date_naive()
}
