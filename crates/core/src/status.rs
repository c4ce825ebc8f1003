//! Reservation lifecycle state machine.
//!
//! This module lives in `core` (zero internal deps) so it can be used by
//! both the API/repository layer and the background completion sweep.

use serde::{Deserialize, Serialize};

/// Reservation status as stored in the `reservations.status` TEXT column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Active,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    /// Column value for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            ReservationStatus::Active => "active",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    /// Parse a column value. Returns `None` for anything not written by
    /// this service.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(ReservationStatus::Active),
            "completed" => Some(ReservationStatus::Completed),
            "cancelled" => Some(ReservationStatus::Cancelled),
            _ => None,
        }
    }
}

/// Returns the set of valid target statuses reachable from `from`.
///
/// Terminal states (Completed, Cancelled) return an empty slice because no
/// further transitions are allowed.
pub fn valid_transitions(from: ReservationStatus) -> &'static [ReservationStatus] {
    match from {
        // Active -> Completed (sweep), Cancelled (explicit)
        ReservationStatus::Active => {
            &[ReservationStatus::Completed, ReservationStatus::Cancelled]
        }
        // Terminal states
        ReservationStatus::Completed | ReservationStatus::Cancelled => &[],
    }
}

/// Check whether a transition from `from` to `to` is valid.
pub fn can_transition(from: ReservationStatus, to: ReservationStatus) -> bool {
    valid_transitions(from).contains(&to)
}

/// Validate a state transition, returning an error message for invalid ones.
pub fn validate_transition(
    from: ReservationStatus,
    to: ReservationStatus,
) -> Result<(), String> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(format!(
            "Invalid transition: {} -> {}",
            from.as_str(),
            to.as_str()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReservationStatus::*;

    // -----------------------------------------------------------------------
    // Valid transitions
    // -----------------------------------------------------------------------

    #[test]
    fn active_to_completed() {
        assert!(can_transition(Active, Completed));
    }

    #[test]
    fn active_to_cancelled() {
        assert!(can_transition(Active, Cancelled));
    }

    // -----------------------------------------------------------------------
    // Terminal states have no outgoing transitions
    // -----------------------------------------------------------------------

    #[test]
    fn completed_has_no_transitions() {
        assert!(valid_transitions(Completed).is_empty());
    }

    #[test]
    fn cancelled_has_no_transitions() {
        assert!(valid_transitions(Cancelled).is_empty());
    }

    // -----------------------------------------------------------------------
    // Invalid transitions
    // -----------------------------------------------------------------------

    #[test]
    fn completed_to_active_invalid() {
        assert!(!can_transition(Completed, Active));
    }

    #[test]
    fn cancelled_to_active_invalid() {
        assert!(!can_transition(Cancelled, Active));
    }

    #[test]
    fn cancelled_to_completed_invalid() {
        assert!(!can_transition(Cancelled, Completed));
    }

    // -----------------------------------------------------------------------
    // validate_transition returns descriptive error
    // -----------------------------------------------------------------------

    #[test]
    fn validate_transition_ok() {
        assert!(validate_transition(Active, Cancelled).is_ok());
    }

    #[test]
    fn validate_transition_err() {
        let err = validate_transition(Completed, Active).unwrap_err();
        assert!(err.contains("completed"));
        assert!(err.contains("active"));
    }

    // -----------------------------------------------------------------------
    // Column round-trip
    // -----------------------------------------------------------------------

    #[test]
    fn parse_known_values() {
        assert_eq!(ReservationStatus::parse("active"), Some(Active));
        assert_eq!(ReservationStatus::parse("completed"), Some(Completed));
        assert_eq!(ReservationStatus::parse("cancelled"), Some(Cancelled));
    }

    #[test]
    fn parse_rejects_unknown() {
        assert_eq!(ReservationStatus::parse("ativa"), None);
        assert_eq!(ReservationStatus::parse(""), None);
    }
}
