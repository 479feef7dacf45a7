//! Resource registry
//!
//! Owns the fleet inventory (bicycles and stations) and enforces bicycle
//! state transitions. All checks and writes on a bicycle happen under that
//! bicycle's `DashMap` entry lock, so two concurrent checkouts of the same
//! bicycle are serialized and exactly one succeeds.

use crate::types::{Bicycle, BikeId, BikeStatus, FleetError, Station, StationId};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Thread-safe inventory of bicycles and stations
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    bikes: DashMap<BikeId, Bicycle>,
    stations: DashMap<StationId, Station>,
}

impl ResourceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision a bicycle, available at the given station
    ///
    /// Re-registering an existing ID is a no-op; the stored bicycle wins.
    pub fn register(&self, id: BikeId, station: StationId) {
        self.bikes.entry(id).or_insert_with(|| Bicycle::new(id, station));
    }

    /// Register a docking station
    pub fn register_station(&self, station: Station) {
        self.stations.entry(station.id).or_insert(station);
    }

    /// Snapshot of a bicycle
    pub fn get(&self, id: BikeId) -> Result<Bicycle, FleetError> {
        self.bikes
            .get(&id)
            .map(|entry| entry.clone())
            .ok_or_else(|| FleetError::not_found("bicycle", id as u64))
    }

    /// Snapshot of a station
    pub fn station(&self, id: StationId) -> Result<Station, FleetError> {
        self.stations
            .get(&id)
            .map(|entry| entry.clone())
            .ok_or_else(|| FleetError::not_found("station", id as u64))
    }

    /// Whether the bicycle can be checked out right now
    pub fn is_available(&self, id: BikeId) -> bool {
        self.bikes
            .get(&id)
            .map(|entry| entry.status == BikeStatus::Available)
            .unwrap_or(false)
    }

    /// Take a bicycle out for a loan
    ///
    /// Transitions `Available` → `Loaned` and records the origin station.
    /// Fails if the bicycle is unknown or in any other state; the check and
    /// the write happen under one entry lock.
    pub fn checkout(&self, id: BikeId) -> Result<StationId, FleetError> {
        match self.bikes.entry(id) {
            Entry::Vacant(_) => Err(FleetError::not_found("bicycle", id as u64)),
            Entry::Occupied(mut entry) => {
                let bike = entry.get_mut();
                if bike.status != BikeStatus::Available {
                    return Err(FleetError::bike_not_available(id));
                }
                // Open loans only exist for registered bikes, so the
                // station is always set here.
                let origin = bike
                    .current_station
                    .ok_or_else(|| FleetError::invalid_state(id, bike.status))?;

                bike.status = BikeStatus::Loaned;
                bike.current_station = None;
                Ok(origin)
            }
        }
    }

    /// Return a bicycle to a station
    ///
    /// Transitions `Loaned` → `Available` and docks the bicycle. Fails on
    /// any other state.
    pub fn checkin(&self, id: BikeId, station: StationId) -> Result<(), FleetError> {
        match self.bikes.entry(id) {
            Entry::Vacant(_) => Err(FleetError::not_found("bicycle", id as u64)),
            Entry::Occupied(mut entry) => {
                let bike = entry.get_mut();
                if bike.status != BikeStatus::Loaned {
                    return Err(FleetError::invalid_state(id, bike.status));
                }

                bike.status = BikeStatus::Available;
                bike.current_station = Some(station);
                Ok(())
            }
        }
    }

    /// Permanently remove a bicycle from circulation
    ///
    /// Allowed from `Available` or `Maintenance`; a bicycle that is out on
    /// loan must come back first. Retiring is idempotent.
    pub fn retire(&self, id: BikeId) -> Result<(), FleetError> {
        match self.bikes.entry(id) {
            Entry::Vacant(_) => Err(FleetError::not_found("bicycle", id as u64)),
            Entry::Occupied(mut entry) => {
                let bike = entry.get_mut();
                match bike.status {
                    BikeStatus::Retired => Ok(()),
                    BikeStatus::Loaned => Err(FleetError::invalid_state(id, bike.status)),
                    BikeStatus::Available | BikeStatus::Maintenance => {
                        bike.status = BikeStatus::Retired;
                        Ok(())
                    }
                }
            }
        }
    }

    /// Number of registered bicycles
    pub fn bike_count(&self) -> usize {
        self.bikes.len()
    }
}
