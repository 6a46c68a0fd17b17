use crate::bookings::BookingStatus;

/// Service for managing booking status transitions
pub struct StatusMachine;

impl StatusMachine {
    /// Check if a status transition is valid
    ///
    /// # Valid Transitions
    /// - Pending → Confirmed, Cancelled, Expired
    /// - Confirmed → Active, Cancelled, Expired
    /// - Active → Completed, Cancelled
    /// - Completed/Cancelled/Expired → (terminal, no transitions)
    /// - Any status → Same status (idempotent)
    pub fn is_valid_transition(from: BookingStatus, to: BookingStatus) -> bool {
        // Same status is always valid (idempotent)
        if from == to {
            return true;
        }

        match (from, to) {
            (BookingStatus::Pending, BookingStatus::Confirmed) => true,
            (BookingStatus::Pending, BookingStatus::Cancelled) => true,
            (BookingStatus::Pending, BookingStatus::Expired) => true,

            (BookingStatus::Confirmed, BookingStatus::Active) => true,
            (BookingStatus::Confirmed, BookingStatus::Cancelled) => true,
            (BookingStatus::Confirmed, BookingStatus::Expired) => true,

            (BookingStatus::Active, BookingStatus::Completed) => true,
            (BookingStatus::Active, BookingStatus::Cancelled) => true,

            _ => false,
        }
    }

    /// Attempt to transition from one status to another
    ///
    /// # Returns
    /// `Ok(to)` if the transition is valid, `Err(message)` otherwise
    pub fn transition(from: BookingStatus, to: BookingStatus) -> Result<BookingStatus, String> {
        if Self::is_valid_transition(from, to) {
            Ok(to)
        } else {
            Err(format!("Invalid status transition from {} to {}", from, to))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_transitions() {
        assert!(StatusMachine::is_valid_transition(
            BookingStatus::Pending,
            BookingStatus::Confirmed
        ));
        assert!(StatusMachine::is_valid_transition(
            BookingStatus::Pending,
            BookingStatus::Cancelled
        ));
        assert!(StatusMachine::is_valid_transition(
            BookingStatus::Pending,
            BookingStatus::Expired
        ));
        assert!(!StatusMachine::is_valid_transition(
            BookingStatus::Pending,
            BookingStatus::Completed
        ));
    }

    #[test]
    fn test_confirmed_transitions() {
        assert!(StatusMachine::is_valid_transition(
            BookingStatus::Confirmed,
            BookingStatus::Active
        ));
        assert!(StatusMachine::is_valid_transition(
            BookingStatus::Confirmed,
            BookingStatus::Cancelled
        ));
        assert!(!StatusMachine::is_valid_transition(
            BookingStatus::Confirmed,
            BookingStatus::Completed
        ));
    }

    #[test]
    fn test_active_transitions() {
        assert!(StatusMachine::is_valid_transition(
            BookingStatus::Active,
            BookingStatus::Completed
        ));
        assert!(StatusMachine::is_valid_transition(
            BookingStatus::Active,
            BookingStatus::Cancelled
        ));
        assert!(!StatusMachine::is_valid_transition(
            BookingStatus::Active,
            BookingStatus::Expired
        ));
    }

    #[test]
    fn test_terminal_statuses_admit_no_transitions() {
        for terminal in [
            BookingStatus::Completed,
            BookingStatus::Cancelled,
            BookingStatus::Expired,
        ] {
            for target in [
                BookingStatus::Pending,
                BookingStatus::Confirmed,
                BookingStatus::Active,
            ] {
                assert!(
                    !StatusMachine::is_valid_transition(terminal, target),
                    "{} -> {} should be invalid",
                    terminal,
                    target
                );
            }
        }
    }

    #[test]
    fn test_same_status_is_idempotent() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Active,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
            BookingStatus::Expired,
        ] {
            assert!(StatusMachine::is_valid_transition(status, status));
        }
    }

    #[test]
    fn test_transition_returns_error_message() {
        let result = StatusMachine::transition(BookingStatus::Cancelled, BookingStatus::Active);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("cancelled"));
    }
}
