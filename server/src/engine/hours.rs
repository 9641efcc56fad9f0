//! Calendar Window Resolver
//!
//! Decides whether the venue is open on a date and what the open/close
//! window is. A date-specific override fully determines openness and
//! short-circuits the weekly default; an unconfigured day is closed.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use chrono_tz::Tz;

use crate::db::models::{OperatingWindow, SpecialHours};
use crate::utils::time::{date_hm_to_millis, minutes_of};

/// Resolved open/close pair for one date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayWindow {
    pub open: NaiveTime,
    /// Close ≤ open means the window rolls past midnight
    pub close: NaiveTime,
}

impl DayWindow {
    /// Window length in minutes, accounting for midnight rollover
    pub fn duration_minutes(&self) -> i64 {
        let open = minutes_of(self.open);
        let close = minutes_of(self.close);
        if close <= open {
            close + 24 * 60 - open
        } else {
            close - open
        }
    }
}

fn parse_window(open: &str, close: &str) -> Option<DayWindow> {
    let open = NaiveTime::parse_from_str(open, "%H:%M").ok()?;
    let close = NaiveTime::parse_from_str(close, "%H:%M").ok()?;
    Some(DayWindow { open, close })
}

/// Resolve the operating window for a date, or `None` when closed
pub fn resolve_window(
    weekly: &[OperatingWindow],
    special: Option<&SpecialHours>,
    date: NaiveDate,
) -> Option<DayWindow> {
    // A date override wins outright, open or closed
    if let Some(special) = special {
        if !special.enabled {
            return None;
        }
        return match (&special.open, &special.close) {
            (Some(open), Some(close)) => parse_window(open, close),
            _ => None,
        };
    }

    let dow = date.weekday().num_days_from_sunday() as u8;
    weekly
        .iter()
        .find(|w| w.day_of_week == dow && w.enabled)
        .and_then(|w| parse_window(&w.open, &w.close))
}

/// Convert a resolved window to an absolute millisecond range on a date
pub fn window_range(date: NaiveDate, window: &DayWindow, tz: Tz) -> (i64, i64) {
    let start = date_hm_to_millis(date, window.open.hour(), window.open.minute(), tz);
    let close_date = if minutes_of(window.close) <= minutes_of(window.open) {
        date.succ_opt().unwrap_or(date)
    } else {
        date
    };
    let end = date_hm_to_millis(close_date, window.close.hour(), window.close.minute(), tz);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weekly(day: u8, open: &str, close: &str, enabled: bool) -> OperatingWindow {
        OperatingWindow {
            id: None,
            day_of_week: day,
            open: open.to_string(),
            close: close.to_string(),
            enabled,
        }
    }

    fn special(date: NaiveDate, open: Option<&str>, close: Option<&str>, enabled: bool) -> SpecialHours {
        SpecialHours {
            id: None,
            date,
            open: open.map(String::from),
            close: close.map(String::from),
            enabled,
        }
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    // 2026-08-10 is a Monday (day_of_week = 1)
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 10).unwrap()
    }

    #[test]
    fn weekly_window_resolves_by_weekday() {
        let weekly = vec![
            weekly(1, "17:00", "23:00", true),
            weekly(2, "18:00", "23:00", true),
        ];
        let window = resolve_window(&weekly, None, monday()).unwrap();
        assert_eq!(window.open, t(17, 0));
        assert_eq!(window.close, t(23, 0));
    }

    #[test]
    fn unconfigured_or_disabled_day_is_closed() {
        let weekly = vec![weekly(1, "17:00", "23:00", false)];
        assert!(resolve_window(&weekly, None, monday()).is_none());
        assert!(resolve_window(&[], None, monday()).is_none());
    }

    #[test]
    fn special_hours_override_wins() {
        let weekly = vec![weekly(1, "17:00", "23:00", true)];
        let over = special(monday(), Some("12:00"), Some("20:00"), true);
        let window = resolve_window(&weekly, Some(&over), monday()).unwrap();
        assert_eq!(window.open, t(12, 0));
        assert_eq!(window.close, t(20, 0));
    }

    #[test]
    fn disabled_special_hours_close_the_date() {
        let weekly = vec![weekly(1, "17:00", "23:00", true)];
        let over = special(monday(), None, None, false);
        assert!(resolve_window(&weekly, Some(&over), monday()).is_none());
    }

    #[test]
    fn close_at_or_before_open_rolls_past_midnight() {
        let window = DayWindow {
            open: t(18, 0),
            close: t(2, 0),
        };
        assert_eq!(window.duration_minutes(), 8 * 60);

        let tz = chrono_tz::UTC;
        let (start, end) = window_range(monday(), &window, tz);
        assert_eq!(end - start, 8 * 60 * 60 * 1000);
    }

    #[test]
    fn same_day_window_range() {
        let window = DayWindow {
            open: t(17, 0),
            close: t(23, 0),
        };
        let (start, end) = window_range(monday(), &window, chrono_tz::UTC);
        assert_eq!(end - start, 6 * 60 * 60 * 1000);
    }
}
