//! Per-user eligibility rules for creating or editing a reservation.
//!
//! Every check here is a pure function taking injected `today`/`now` and
//! pre-fetched counts, so the rules are unit-testable without a clock or a
//! database. Callers skip [`check_quota`] and [`check_daily_unique`] for
//! admins; the horizon, past-time, and capacity rules apply to everyone.

use chrono::{Days, NaiveDate, NaiveTime};

use crate::status::ReservationStatus;
use crate::timeslot::RuleViolation;

/// Non-admins may hold at most this many active reservations.
pub const MAX_ACTIVE_RESERVATIONS: i64 = 3;

/// Reservations may be placed at most this many days ahead.
pub const BOOKING_HORIZON_DAYS: u64 = 30;

/// The date must fall inside `[today, today + horizon]`.
pub fn check_horizon(date: NaiveDate, today: NaiveDate) -> Result<(), RuleViolation> {
    let max = today
        .checked_add_days(Days::new(BOOKING_HORIZON_DAYS))
        .ok_or(RuleViolation::OutsideHorizon {
            max_days: BOOKING_HORIZON_DAYS as i64,
        })?;
    if date < today || date > max {
        return Err(RuleViolation::OutsideHorizon {
            max_days: BOOKING_HORIZON_DAYS as i64,
        });
    }
    Ok(())
}

/// Same-day reservations must start strictly after the current time.
pub fn check_past_time(
    date: NaiveDate,
    start: NaiveTime,
    today: NaiveDate,
    now: NaiveTime,
) -> Result<(), RuleViolation> {
    if date == today && start <= now {
        return Err(RuleViolation::InPast);
    }
    Ok(())
}

/// Concurrent-reservation quota over the caller's current active count.
pub fn check_quota(active_count: i64) -> Result<(), RuleViolation> {
    if active_count >= MAX_ACTIVE_RESERVATIONS {
        return Err(RuleViolation::QuotaExceeded {
            limit: MAX_ACTIVE_RESERVATIONS,
        });
    }
    Ok(())
}

/// The requested party size must fit the room.
pub fn check_capacity(requested: i32, capacity: i32) -> Result<(), RuleViolation> {
    if requested > capacity {
        return Err(RuleViolation::CapacityExceeded {
            capacity,
            requested,
        });
    }
    Ok(())
}

/// One reservation per calendar date. `existing` is the status of the
/// caller's reservation on that date, if any; cancelled bookings free the
/// day again. The two violation variants keep the messages distinct.
pub fn check_daily_unique(
    existing: Option<ReservationStatus>,
) -> Result<(), RuleViolation> {
    match existing {
        Some(ReservationStatus::Active) => Err(RuleViolation::DailyLimitActive),
        Some(ReservationStatus::Completed) => Err(RuleViolation::DailyLimitCompleted),
        Some(ReservationStatus::Cancelled) | None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    // -----------------------------------------------------------------------
    // Horizon
    // -----------------------------------------------------------------------

    #[test]
    fn today_is_inside_horizon() {
        let today = date(2026, 8, 10);
        assert!(check_horizon(today, today).is_ok());
    }

    #[test]
    fn horizon_boundary_is_inclusive() {
        let today = date(2026, 8, 10);
        assert!(check_horizon(date(2026, 9, 9), today).is_ok());
    }

    #[test]
    fn past_horizon_rejected() {
        let today = date(2026, 8, 10);
        let err = check_horizon(date(2026, 9, 10), today).unwrap_err();
        assert_matches!(err, RuleViolation::OutsideHorizon { max_days: 30 });
    }

    #[test]
    fn yesterday_rejected() {
        let today = date(2026, 8, 10);
        assert!(check_horizon(date(2026, 8, 9), today).is_err());
    }

    // -----------------------------------------------------------------------
    // Past-time guard
    // -----------------------------------------------------------------------

    #[test]
    fn future_date_ignores_clock() {
        let today = date(2026, 8, 10);
        assert!(check_past_time(date(2026, 8, 11), time(7, 0), today, time(23, 0)).is_ok());
    }

    #[test]
    fn same_day_future_start_ok() {
        let today = date(2026, 8, 10);
        assert!(check_past_time(today, time(15, 0), today, time(14, 59)).is_ok());
    }

    #[test]
    fn same_day_past_start_rejected() {
        let today = date(2026, 8, 10);
        let err = check_past_time(today, time(9, 0), today, time(9, 30)).unwrap_err();
        assert_eq!(err, RuleViolation::InPast);
    }

    #[test]
    fn same_day_start_equal_to_now_rejected() {
        let today = date(2026, 8, 10);
        assert!(check_past_time(today, time(9, 0), today, time(9, 0)).is_err());
    }

    // -----------------------------------------------------------------------
    // Quota
    // -----------------------------------------------------------------------

    #[test]
    fn below_quota_ok() {
        assert!(check_quota(0).is_ok());
        assert!(check_quota(2).is_ok());
    }

    #[test]
    fn at_quota_rejected() {
        let err = check_quota(3).unwrap_err();
        assert_matches!(err, RuleViolation::QuotaExceeded { limit: 3 });
    }

    #[test]
    fn over_quota_rejected() {
        assert!(check_quota(7).is_err());
    }

    // -----------------------------------------------------------------------
    // Capacity
    // -----------------------------------------------------------------------

    #[test]
    fn party_fits_room() {
        assert!(check_capacity(4, 6).is_ok());
        assert!(check_capacity(6, 6).is_ok());
    }

    #[test]
    fn party_too_large() {
        let err = check_capacity(8, 6).unwrap_err();
        assert_eq!(
            err,
            RuleViolation::CapacityExceeded {
                capacity: 6,
                requested: 8
            }
        );
    }

    // -----------------------------------------------------------------------
    // Daily uniqueness
    // -----------------------------------------------------------------------

    #[test]
    fn free_day_ok() {
        assert!(check_daily_unique(None).is_ok());
    }

    #[test]
    fn cancelled_booking_frees_the_day() {
        assert!(check_daily_unique(Some(ReservationStatus::Cancelled)).is_ok());
    }

    #[test]
    fn active_booking_blocks_with_distinct_message() {
        let err = check_daily_unique(Some(ReservationStatus::Active)).unwrap_err();
        assert_eq!(err, RuleViolation::DailyLimitActive);
    }

    #[test]
    fn completed_booking_blocks_with_distinct_message() {
        let err = check_daily_unique(Some(ReservationStatus::Completed)).unwrap_err();
        assert_eq!(err, RuleViolation::DailyLimitCompleted);
    }
}
