//! Incident and return-report types for the Bike Fleet Engine
//!
//! Incidents record problems tied to a loan (damage, misuse, lateness).
//! When a loan with incidents closes, the incidents are rolled up into a
//! single return report whose total drives sanction issuance.

use super::fleet::{BikeId, UserId};
use super::loan::LoanId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Incident identifier
pub type IncidentId = u64;

/// Return-report identifier
pub type ReportId = u64;

/// Kind of problem being reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentType {
    /// Crash or collision involving the bicycle
    Accident,

    /// Wear or damage found on return
    Deterioration,

    /// Rule violation, including late returns
    Misuse,

    /// Anything else
    Other,
}

/// Severity tier of an incident
///
/// Tiers map to a fixed number of penalty days (1/3/7/30); lateness is
/// classified into a tier by `core::penalty::classify_lateness`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityTier {
    /// Tier 1: minor (1 penalty day)
    Minor,

    /// Tier 2: moderate (3 penalty days)
    Moderate,

    /// Tier 3: severe (7 penalty days)
    Severe,

    /// Tier 4: critical (30 penalty days)
    Critical,
}

impl SeverityTier {
    /// Numeric rank of the tier, 1 through 4
    pub fn rank(self) -> u8 {
        match self {
            SeverityTier::Minor => 1,
            SeverityTier::Moderate => 2,
            SeverityTier::Severe => 3,
            SeverityTier::Critical => 4,
        }
    }

    /// Tier for a numeric rank, if valid
    pub fn from_rank(rank: u8) -> Option<Self> {
        match rank {
            1 => Some(SeverityTier::Minor),
            2 => Some(SeverityTier::Moderate),
            3 => Some(SeverityTier::Severe),
            4 => Some(SeverityTier::Critical),
            _ => None,
        }
    }
}

/// A recorded problem tied to a loan
///
/// Incidents are append-only: the only mutation ever applied is attaching
/// the return report when the loan closes.
#[derive(Debug, Clone, PartialEq)]
pub struct Incident {
    /// The incident ID
    pub id: IncidentId,

    /// Loan the incident occurred under
    pub loan: LoanId,

    /// Bicycle involved
    pub bike: BikeId,

    /// User or operator who reported the incident
    pub reporter: UserId,

    /// Kind of problem
    pub kind: IncidentType,

    /// Severity tier driving the penalty
    pub severity: SeverityTier,

    /// Free-text description
    pub description: String,

    /// Recording instant
    pub created_at: DateTime<Utc>,

    /// Return report this incident was rolled into, once the loan closed
    pub report: Option<ReportId>,
}

/// Roll-up of all incidents attached to one loan close
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnReport {
    /// The report ID
    pub id: ReportId,

    /// Loan being closed
    pub loan: LoanId,

    /// Operator or reporter who closed the loan
    pub created_by: UserId,

    /// Creation instant
    pub created_at: DateTime<Utc>,

    /// Sum of penalty days over all attached incidents
    pub total_penalty_days: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SeverityTier::Minor, 1)]
    #[case(SeverityTier::Moderate, 2)]
    #[case(SeverityTier::Severe, 3)]
    #[case(SeverityTier::Critical, 4)]
    fn test_rank_round_trip(#[case] tier: SeverityTier, #[case] rank: u8) {
        assert_eq!(tier.rank(), rank);
        assert_eq!(SeverityTier::from_rank(rank), Some(tier));
    }

    #[rstest]
    #[case(0)]
    #[case(5)]
    #[case(255)]
    fn test_from_rank_rejects_out_of_range(#[case] rank: u8) {
        assert_eq!(SeverityTier::from_rank(rank), None);
    }
}
