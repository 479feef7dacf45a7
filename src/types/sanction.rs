//! Sanction types for the Bike Fleet Engine

use super::fleet::UserId;
use super::incident::IncidentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sanction identifier
pub type SanctionId = u64;

/// Appeal state of a sanction
///
/// The stored status tracks the appeal sub-state-machine only. Wall-clock
/// expiry is never written back: callers decide whether a sanction blocks by
/// combining the status with the `start <= now <= end` window check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SanctionStatus {
    /// In force (or past its window and awaiting lazy expiry)
    Active,

    /// Appeal filed, awaiting operator resolution; still blocks the user
    Appealed,

    /// Lifted by an accepted appeal
    Expired,
}

/// A time-bounded restriction on a user, issued for one incident
#[derive(Debug, Clone, PartialEq)]
pub struct Sanction {
    /// The sanction ID
    pub id: SanctionId,

    /// User under restriction
    pub user: UserId,

    /// Incident the sanction was issued for
    pub incident: IncidentId,

    /// Operator who issued the sanction
    pub operator: UserId,

    /// Start of the restriction window
    pub start: DateTime<Utc>,

    /// End of the restriction window; always after `start`
    pub end: DateTime<Utc>,

    /// Appeal state
    pub status: SanctionStatus,

    /// Appeal text, set at most once (no re-appeal after rejection)
    pub appeal_text: Option<String>,

    /// Operator response recorded when the appeal was resolved
    pub appeal_response: Option<String>,
}

impl Sanction {
    /// Whether this sanction restricts the user at the given instant
    ///
    /// Appealed sanctions still block; only an accepted appeal (status
    /// `Expired`) or falling outside the time window lifts the restriction.
    pub fn blocks_at(&self, now: DateTime<Utc>) -> bool {
        matches!(
            self.status,
            SanctionStatus::Active | SanctionStatus::Appealed
        ) && self.start <= now
            && now <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn sample(status: SanctionStatus) -> Sanction {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        Sanction {
            id: 1,
            user: 10,
            incident: 20,
            operator: 30,
            start,
            end: start + Duration::days(3),
            status,
            appeal_text: None,
            appeal_response: None,
        }
    }

    #[test]
    fn test_active_sanction_blocks_inside_window() {
        let sanction = sample(SanctionStatus::Active);
        assert!(sanction.blocks_at(sanction.start + Duration::days(1)));
    }

    #[test]
    fn test_appealed_sanction_still_blocks() {
        let sanction = sample(SanctionStatus::Appealed);
        assert!(sanction.blocks_at(sanction.start + Duration::days(1)));
    }

    #[test]
    fn test_expired_sanction_never_blocks() {
        let sanction = sample(SanctionStatus::Expired);
        assert!(!sanction.blocks_at(sanction.start + Duration::days(1)));
    }

    #[test]
    fn test_active_sanction_past_window_does_not_block() {
        let sanction = sample(SanctionStatus::Active);
        assert!(!sanction.blocks_at(sanction.end + Duration::seconds(1)));
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let sanction = sample(SanctionStatus::Active);
        assert!(sanction.blocks_at(sanction.start));
        assert!(sanction.blocks_at(sanction.end));
    }
}
