//! Time parsing, slot validation, and interval overlap.
//!
//! All reservation times are wall-clock `HH:MM` strings at the HTTP edge
//! and `NaiveTime` internally. Slots are half-open intervals `[start, end)`:
//! a reservation ending at 11:00 does not collide with one starting at
//! 11:00.

use chrono::{NaiveDate, NaiveTime, Timelike};

use crate::hours::{opening_hours, OpeningHours};

/// Reservation times must fall on quarter-hour boundaries.
pub const SLOT_GRANULARITY_MIN: u32 = 15;

/// Minimum reservation length in minutes.
pub const MIN_SLOT_MINUTES: i64 = 15;

/// A business-rule violation, carrying what the caller needs for a
/// distinct user-facing message. Mapped to 400 at the HTTP edge.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleViolation {
    #[error("invalid time '{value}' for {field}, expected HH:MM")]
    InvalidTime { field: &'static str, value: String },

    #[error("times must fall on 15-minute boundaries")]
    InvalidGranularity,

    #[error("start time must be before end time")]
    InvalidRange,

    #[error("reservations must last at least 15 minutes")]
    TooShort,

    #[error("the library is closed on {date}")]
    Closed { date: NaiveDate },

    #[error("requested time is outside opening hours ({} to {})", open.format("%H:%M"), close.format("%H:%M"))]
    OutsideHours { open: NaiveTime, close: NaiveTime },

    #[error("date must be within {max_days} days from today")]
    OutsideHorizon { max_days: i64 },

    #[error("cannot reserve a time in the past")]
    InPast,

    #[error("limit of {limit} active reservations reached")]
    QuotaExceeded { limit: i64 },

    #[error("you already have an active reservation for this date")]
    DailyLimitActive,

    #[error("you already completed a reservation for this date")]
    DailyLimitCompleted,

    #[error("room holds {capacity}, requested {requested}")]
    CapacityExceeded { capacity: i32, requested: i32 },
}

/// Parse an `HH:MM` string. Fails on a wrong number of `:`-separated
/// parts, non-numeric parts, or out-of-range hour/minute.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let mut parts = raw.split(':');
    let (hour, minute) = (parts.next()?, parts.next()?);
    if parts.next().is_some() || hour.is_empty() || minute.is_empty() {
        return None;
    }
    if !hour.bytes().all(|b| b.is_ascii_digit()) || !minute.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveTime::from_hms_opt(hour.parse().ok()?, minute.parse().ok()?, 0)
}

/// Half-open interval overlap: `[a_start, a_end)` intersects
/// `[b_start, b_end)`. Back-to-back slots sharing an endpoint do not
/// overlap.
pub fn overlaps(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    a_start < b_end && a_end > b_start
}

fn on_grid(t: NaiveTime) -> bool {
    t.minute() % SLOT_GRANULARITY_MIN == 0 && t.second() == 0
}

/// Validate a requested slot against the fixed scheduling rules, in a
/// stable order so the first failure wins: parse, granularity, ordering,
/// minimum length, closed day, opening hours.
///
/// Returns the parsed times so callers never re-parse the raw strings.
pub fn validate_slot(
    date: NaiveDate,
    start_raw: &str,
    end_raw: &str,
) -> Result<(NaiveTime, NaiveTime), RuleViolation> {
    let start = parse_time(start_raw).ok_or_else(|| RuleViolation::InvalidTime {
        field: "startTime",
        value: start_raw.to_string(),
    })?;
    let end = parse_time(end_raw).ok_or_else(|| RuleViolation::InvalidTime {
        field: "endTime",
        value: end_raw.to_string(),
    })?;

    if !on_grid(start) || !on_grid(end) {
        return Err(RuleViolation::InvalidGranularity);
    }
    if start >= end {
        return Err(RuleViolation::InvalidRange);
    }
    if end.signed_duration_since(start).num_minutes() < MIN_SLOT_MINUTES {
        return Err(RuleViolation::TooShort);
    }

    let OpeningHours { open, close } =
        opening_hours(date).ok_or(RuleViolation::Closed { date })?;
    if start < open || end > close {
        return Err(RuleViolation::OutsideHours { open, close });
    }

    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    // 2026-08-10 is a Monday (07:00-21:55).
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 10).unwrap()
    }

    // -----------------------------------------------------------------------
    // parse_time
    // -----------------------------------------------------------------------

    #[test]
    fn parse_time_accepts_valid() {
        assert_eq!(parse_time("09:30"), Some(time(9, 30)));
        assert_eq!(parse_time("7:00"), Some(time(7, 0)));
        assert_eq!(parse_time("21:55"), Some(time(21, 55)));
    }

    #[test]
    fn parse_time_rejects_wrong_part_count() {
        assert_eq!(parse_time("09"), None);
        assert_eq!(parse_time("09:30:00"), None);
        assert_eq!(parse_time(""), None);
    }

    #[test]
    fn parse_time_rejects_non_numeric() {
        assert_eq!(parse_time("ab:cd"), None);
        assert_eq!(parse_time("09:3o"), None);
        assert_eq!(parse_time("-9:30"), None);
        assert_eq!(parse_time(":30"), None);
    }

    #[test]
    fn parse_time_rejects_out_of_range() {
        assert_eq!(parse_time("24:00"), None);
        assert_eq!(parse_time("09:60"), None);
    }

    // -----------------------------------------------------------------------
    // overlaps
    // -----------------------------------------------------------------------

    #[test]
    fn overlapping_intervals_detected() {
        assert!(overlaps(time(10, 0), time(11, 0), time(10, 30), time(11, 30)));
        assert!(overlaps(time(10, 30), time(11, 30), time(10, 0), time(11, 0)));
    }

    #[test]
    fn containment_is_overlap() {
        assert!(overlaps(time(10, 0), time(12, 0), time(10, 30), time(11, 0)));
        assert!(overlaps(time(10, 30), time(11, 0), time(10, 0), time(12, 0)));
    }

    #[test]
    fn identical_intervals_overlap() {
        assert!(overlaps(time(10, 0), time(11, 0), time(10, 0), time(11, 0)));
    }

    #[test]
    fn back_to_back_does_not_overlap() {
        assert!(!overlaps(time(10, 0), time(11, 0), time(11, 0), time(12, 0)));
        assert!(!overlaps(time(11, 0), time(12, 0), time(10, 0), time(11, 0)));
    }

    #[test]
    fn disjoint_intervals_do_not_overlap() {
        assert!(!overlaps(time(8, 0), time(9, 0), time(10, 0), time(11, 0)));
    }

    // -----------------------------------------------------------------------
    // validate_slot: failure ordering
    // -----------------------------------------------------------------------

    #[test]
    fn unparsable_start_reported_first() {
        let err = validate_slot(monday(), "9h30", "10:00").unwrap_err();
        assert_matches!(err, RuleViolation::InvalidTime { field: "startTime", .. });
    }

    #[test]
    fn unparsable_end_reported() {
        let err = validate_slot(monday(), "09:30", "ten").unwrap_err();
        assert_matches!(err, RuleViolation::InvalidTime { field: "endTime", .. });
    }

    #[test]
    fn off_grid_minutes_rejected() {
        let err = validate_slot(monday(), "09:10", "10:00").unwrap_err();
        assert_eq!(err, RuleViolation::InvalidGranularity);
        let err = validate_slot(monday(), "09:00", "10:05").unwrap_err();
        assert_eq!(err, RuleViolation::InvalidGranularity);
    }

    #[test]
    fn granularity_checked_before_range() {
        // Both reversed and off-grid; granularity wins.
        let err = validate_slot(monday(), "10:10", "09:00").unwrap_err();
        assert_eq!(err, RuleViolation::InvalidGranularity);
    }

    #[test]
    fn reversed_range_rejected() {
        let err = validate_slot(monday(), "11:00", "10:00").unwrap_err();
        assert_eq!(err, RuleViolation::InvalidRange);
    }

    #[test]
    fn zero_length_rejected_as_range() {
        let err = validate_slot(monday(), "10:00", "10:00").unwrap_err();
        assert_eq!(err, RuleViolation::InvalidRange);
    }

    #[test]
    fn sunday_rejected_as_closed() {
        // 2026-08-09 is a Sunday.
        let sunday = NaiveDate::from_ymd_opt(2026, 8, 9).unwrap();
        let err = validate_slot(sunday, "10:00", "11:00").unwrap_err();
        assert_matches!(err, RuleViolation::Closed { .. });
    }

    #[test]
    fn before_opening_rejected() {
        let err = validate_slot(monday(), "06:00", "08:00").unwrap_err();
        assert_matches!(err, RuleViolation::OutsideHours { .. });
    }

    #[test]
    fn past_closing_rejected() {
        let err = validate_slot(monday(), "21:00", "22:00").unwrap_err();
        assert_matches!(err, RuleViolation::OutsideHours { .. });
    }

    #[test]
    fn saturday_hours_enforced() {
        // 2026-08-08 is a Saturday (08:00-13:55).
        let saturday = NaiveDate::from_ymd_opt(2026, 8, 8).unwrap();
        let err = validate_slot(saturday, "14:00", "15:00").unwrap_err();
        assert_matches!(err, RuleViolation::OutsideHours { .. });
        assert!(validate_slot(saturday, "08:00", "09:00").is_ok());
    }

    // -----------------------------------------------------------------------
    // validate_slot: acceptance and boundaries
    // -----------------------------------------------------------------------

    #[test]
    fn valid_slot_returns_parsed_times() {
        let (start, end) = validate_slot(monday(), "09:30", "11:15").unwrap();
        assert_eq!(start, time(9, 30));
        assert_eq!(end, time(11, 15));
    }

    #[test]
    fn minimum_length_slot_accepted() {
        assert!(validate_slot(monday(), "10:00", "10:15").is_ok());
    }

    #[test]
    fn slot_at_exact_bounds_accepted() {
        assert!(validate_slot(monday(), "07:00", "21:45").is_ok());
    }

    #[test]
    fn error_messages_are_user_facing() {
        assert_eq!(
            RuleViolation::InvalidRange.to_string(),
            "start time must be before end time"
        );
        let outside = RuleViolation::OutsideHours {
            open: time(7, 0),
            close: time(21, 55),
        };
        assert_eq!(
            outside.to_string(),
            "requested time is outside opening hours (07:00 to 21:55)"
        );
    }
}
