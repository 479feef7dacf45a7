//! Penalty policy
//!
//! Pure functions mapping a late return to a severity tier and a tier to a
//! number of penalty days. The thresholds and day counts are fixed fleet
//! policy; nothing here reads the clock or touches shared state.

use crate::types::SeverityTier;
use chrono::Duration;

/// Loans returned within this many minutes carry no penalty
pub const GRACE_MINUTES: i64 = 15;

/// Classify how long a loan stayed open into a severity tier
///
/// `elapsed` is the time between checkout and return. Returns `None`
/// inside the grace window (no incident is recorded at all).
pub fn classify_lateness(elapsed: Duration) -> Option<SeverityTier> {
    let minutes = elapsed.num_minutes();
    if minutes <= GRACE_MINUTES {
        return None;
    }

    let tier = if minutes <= 45 {
        SeverityTier::Minor
    } else if minutes <= 300 {
        SeverityTier::Moderate
    } else if minutes <= 1440 {
        SeverityTier::Severe
    } else {
        SeverityTier::Critical
    };

    Some(tier)
}

/// Penalty days carried by a severity tier
pub fn penalty_days(tier: SeverityTier) -> i64 {
    match tier {
        SeverityTier::Minor => 1,
        SeverityTier::Moderate => 3,
        SeverityTier::Severe => 7,
        SeverityTier::Critical => 30,
    }
}
