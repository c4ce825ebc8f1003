//! Library opening-hours calendar.
//!
//! The schedule is a fixed policy, not configuration: closed on Sundays,
//! short Saturdays, full weekdays. Times are local wall-clock times; the
//! last bookable minute is five minutes before the top of the closing hour
//! so a minimum-length slot still ends while staff are present.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

/// Open/close bounds for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningHours {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

/// Weekday opening time, 07:00.
pub const WEEKDAY_OPEN: (u32, u32) = (7, 0);

/// Weekday closing time, 21:55.
pub const WEEKDAY_CLOSE: (u32, u32) = (21, 55);

/// Saturday opening time, 08:00.
pub const SATURDAY_OPEN: (u32, u32) = (8, 0);

/// Saturday closing time, 13:55.
pub const SATURDAY_CLOSE: (u32, u32) = (13, 55);

/// Returns the opening hours for `date`, or `None` when the library is
/// closed that day (Sundays).
pub fn opening_hours(date: NaiveDate) -> Option<OpeningHours> {
    let (open, close) = match date.weekday() {
        Weekday::Sun => return None,
        Weekday::Sat => (SATURDAY_OPEN, SATURDAY_CLOSE),
        _ => (WEEKDAY_OPEN, WEEKDAY_CLOSE),
    };
    Some(OpeningHours {
        open: NaiveTime::from_hms_opt(open.0, open.1, 0)?,
        close: NaiveTime::from_hms_opt(close.0, close.1, 0)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn sunday_is_closed() {
        // 2026-08-09 is a Sunday.
        assert_eq!(opening_hours(date(2026, 8, 9)), None);
    }

    #[test]
    fn saturday_has_short_hours() {
        // 2026-08-08 is a Saturday.
        let hours = opening_hours(date(2026, 8, 8)).unwrap();
        assert_eq!(hours.open, time(8, 0));
        assert_eq!(hours.close, time(13, 55));
    }

    #[test]
    fn monday_has_full_hours() {
        // 2026-08-10 is a Monday.
        let hours = opening_hours(date(2026, 8, 10)).unwrap();
        assert_eq!(hours.open, time(7, 0));
        assert_eq!(hours.close, time(21, 55));
    }

    #[test]
    fn friday_has_full_hours() {
        // 2026-08-07 is a Friday.
        let hours = opening_hours(date(2026, 8, 7)).unwrap();
        assert_eq!(hours.open, time(7, 0));
        assert_eq!(hours.close, time(21, 55));
    }
}
