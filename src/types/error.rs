//! Error types for the Bike Fleet Engine
//!
//! All lifecycle operations return typed errors to the caller; nothing is
//! retried internally and no error is downgraded into a silent no-op.
//!
//! # Error Categories
//!
//! - **Reference errors**: unknown loan/bicycle/sanction identities
//! - **Lifecycle errors**: the entity is in the wrong state for the
//!   requested transition (bike not available, loan not open, ...)
//! - **Policy errors**: sanction/appeal rules (already appealed, zero-day
//!   penalty, user blocked)
//! - **Replay I/O errors**: file and CSV failures in the event pipeline

use super::fleet::{BikeId, BikeStatus, UserId};
use super::incident::IncidentId;
use super::loan::LoanId;
use super::sanction::SanctionId;
use thiserror::Error;

/// Main error type for the fleet lifecycle engine
///
/// Each variant carries enough context for the caller to translate it into
/// a domain message without re-querying the stores.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FleetError {
    /// An identity reference did not resolve
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of entity ("loan", "bicycle", "incident", "sanction")
        entity: String,
        /// The identifier that failed to resolve
        id: u64,
    },

    /// The bicycle is not available for checkout
    #[error("bicycle {bike} is not available")]
    BikeNotAvailable {
        /// Bicycle ID
        bike: BikeId,
    },

    /// The bicycle is in the wrong state for the requested transition
    ///
    /// Returned by `checkin` on a bicycle that is not loaned, and by
    /// `retire` on a bicycle that is currently out.
    #[error("bicycle {bike} is in state {status:?}, invalid for this transition")]
    InvalidState {
        /// Bicycle ID
        bike: BikeId,
        /// The state the bicycle was found in
        status: BikeStatus,
    },

    /// The user already holds an open loan
    #[error("user {user} already has open loan {loan}")]
    UserHasOpenLoan {
        /// User ID
        user: UserId,
        /// The open loan
        loan: LoanId,
    },

    /// The user is under an active or appealed sanction covering `now`
    #[error("user {user} is blocked by an active sanction")]
    UserBlocked {
        /// User ID
        user: UserId,
    },

    /// The loan is not open, so it cannot be closed
    #[error("loan {loan} is not open")]
    LoanNotOpen {
        /// Loan ID
        loan: LoanId,
    },

    /// The sanction was already appealed once; no re-appeal exists
    #[error("sanction {sanction} was already appealed")]
    AlreadyAppealed {
        /// Sanction ID
        sanction: SanctionId,
    },

    /// The sanction is not active, so it cannot be appealed
    #[error("sanction {sanction} is not active")]
    SanctionNotActive {
        /// Sanction ID
        sanction: SanctionId,
    },

    /// The sanction is not under appeal, so there is nothing to resolve
    #[error("sanction {sanction} is not under appeal")]
    NotAppealed {
        /// Sanction ID
        sanction: SanctionId,
    },

    /// The incident's tier mapped to zero penalty days
    ///
    /// Guarded against even though the fixed penalty table cannot
    /// produce it.
    #[error("incident {incident} carries no penalty days")]
    NoPenalty {
        /// Incident ID
        incident: IncidentId,
    },

    /// I/O error in the event replay pipeline
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error in the event replay pipeline
    ///
    /// Recoverable: the malformed row is skipped and replay continues.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

impl From<std::io::Error> for FleetError {
    fn from(error: std::io::Error) -> Self {
        FleetError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for FleetError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        FleetError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

// Helper constructors for common errors

impl FleetError {
    /// Create a NotFound error
    pub fn not_found(entity: &str, id: impl Into<u64>) -> Self {
        FleetError::NotFound {
            entity: entity.to_string(),
            id: id.into(),
        }
    }

    /// Create a BikeNotAvailable error
    pub fn bike_not_available(bike: BikeId) -> Self {
        FleetError::BikeNotAvailable { bike }
    }

    /// Create an InvalidState error
    pub fn invalid_state(bike: BikeId, status: BikeStatus) -> Self {
        FleetError::InvalidState { bike, status }
    }

    /// Create a UserHasOpenLoan error
    pub fn user_has_open_loan(user: UserId, loan: LoanId) -> Self {
        FleetError::UserHasOpenLoan { user, loan }
    }

    /// Create a UserBlocked error
    pub fn user_blocked(user: UserId) -> Self {
        FleetError::UserBlocked { user }
    }

    /// Create a LoanNotOpen error
    pub fn loan_not_open(loan: LoanId) -> Self {
        FleetError::LoanNotOpen { loan }
    }

    /// Create an AlreadyAppealed error
    pub fn already_appealed(sanction: SanctionId) -> Self {
        FleetError::AlreadyAppealed { sanction }
    }

    /// Create a SanctionNotActive error
    pub fn sanction_not_active(sanction: SanctionId) -> Self {
        FleetError::SanctionNotActive { sanction }
    }

    /// Create a NotAppealed error
    pub fn not_appealed(sanction: SanctionId) -> Self {
        FleetError::NotAppealed { sanction }
    }

    /// Create a NoPenalty error
    pub fn no_penalty(incident: IncidentId) -> Self {
        FleetError::NoPenalty { incident }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::not_found(
        FleetError::not_found("loan", 42u64),
        "loan 42 not found"
    )]
    #[case::bike_not_available(
        FleetError::bike_not_available(7),
        "bicycle 7 is not available"
    )]
    #[case::invalid_state(
        FleetError::invalid_state(7, BikeStatus::Available),
        "bicycle 7 is in state Available, invalid for this transition"
    )]
    #[case::user_has_open_loan(
        FleetError::user_has_open_loan(3, 11),
        "user 3 already has open loan 11"
    )]
    #[case::user_blocked(
        FleetError::user_blocked(3),
        "user 3 is blocked by an active sanction"
    )]
    #[case::loan_not_open(
        FleetError::loan_not_open(11),
        "loan 11 is not open"
    )]
    #[case::already_appealed(
        FleetError::already_appealed(5),
        "sanction 5 was already appealed"
    )]
    #[case::sanction_not_active(
        FleetError::sanction_not_active(5),
        "sanction 5 is not active"
    )]
    #[case::not_appealed(
        FleetError::not_appealed(5),
        "sanction 5 is not under appeal"
    )]
    #[case::no_penalty(
        FleetError::no_penalty(9),
        "incident 9 carries no penalty days"
    )]
    #[case::parse_error_with_line(
        FleetError::ParseError { line: Some(4), message: "bad field".to_string() },
        "CSV parse error at line 4: bad field"
    )]
    #[case::parse_error_without_line(
        FleetError::ParseError { line: None, message: "bad field".to_string() },
        "CSV parse error: bad field"
    )]
    fn test_error_display(#[case] error: FleetError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: FleetError = io_error.into();
        assert!(matches!(error, FleetError::IoError { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
