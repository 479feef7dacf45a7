//! Fleet-related types for the Bike Fleet Engine
//!
//! This module defines bicycles, stations, and the identifiers shared
//! across the lifecycle engine.

use serde::{Deserialize, Serialize};

/// User identifier (riders and operators alike)
pub type UserId = u32;

/// Bicycle identifier
pub type BikeId = u32;

/// Station identifier
pub type StationId = u16;

/// Bicycle availability state
///
/// A bicycle is `Loaned` if and only if exactly one open loan references it;
/// bicycles are never deleted, only moved to `Retired`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BikeStatus {
    /// Docked at a station and free to be checked out
    Available,

    /// Checked out under an open loan; current station is unset
    Loaned,

    /// Pulled from circulation by the maintenance workflow
    Maintenance,

    /// Permanently removed from the fleet
    Retired,
}

/// A bicycle in the shared fleet
#[derive(Debug, Clone, PartialEq)]
pub struct Bicycle {
    /// The bicycle ID
    pub id: BikeId,

    /// Current availability state
    pub status: BikeStatus,

    /// Station where the bicycle is docked
    ///
    /// `None` while the bicycle is loaned out.
    pub current_station: Option<StationId>,
}

impl Bicycle {
    /// Create a newly provisioned bicycle, available at the given station
    pub fn new(id: BikeId, station: StationId) -> Self {
        Bicycle {
            id,
            status: BikeStatus::Available,
            current_station: Some(station),
        }
    }
}

/// A fixed docking station
///
/// Stations are referenced by loans but never mutated by this engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// The station ID
    pub id: StationId,

    /// Short unique code (e.g. "ST01")
    pub code: String,

    /// Display name
    pub name: String,

    /// Dock capacity, when known
    pub capacity: Option<u16>,
}
