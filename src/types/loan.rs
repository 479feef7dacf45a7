//! Loan types for the Bike Fleet Engine

use super::fleet::{BikeId, StationId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Loan identifier
pub type LoanId = u64;

/// Loan lifecycle state
///
/// This engine only drives the `Open` → `Closed` transition. `Late` and
/// `Lost` are set by an out-of-scope reconciliation process; they are
/// recognized here as terminal so invariant checks treat them like `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// Bicycle is checked out; close timestamp and destination are unset
    Open,

    /// Bicycle has been returned
    Closed,

    /// Corrected by reconciliation after a late return
    Late,

    /// Corrected by reconciliation when the bicycle never came back
    Lost,
}

impl LoanStatus {
    /// Whether the loan can undergo no further transitions
    pub fn is_terminal(self) -> bool {
        !matches!(self, LoanStatus::Open)
    }
}

/// A single checkout-to-checkin lifecycle of one bicycle by one user
#[derive(Debug, Clone, PartialEq)]
pub struct Loan {
    /// The loan ID
    pub id: LoanId,

    /// User who checked the bicycle out
    pub user: UserId,

    /// Bicycle on loan
    pub bike: BikeId,

    /// Station the bicycle left from
    pub origin_station: StationId,

    /// Station the bicycle was (or is intended to be) returned to
    ///
    /// May be prefilled at checkout; set to the actual station on close.
    pub dest_station: Option<StationId>,

    /// Checkout instant
    pub opened_at: DateTime<Utc>,

    /// Return instant
    ///
    /// `None` while the loan is open.
    pub closed_at: Option<DateTime<Utc>>,

    /// Lifecycle state
    pub status: LoanStatus,
}
