//! Sanction ledger
//!
//! Stores sanctions and drives the appeal state machine. A sanction's
//! stored status only ever reflects appeals; window expiry is evaluated
//! lazily against the clock at query time and never written back.

use crate::types::{FleetError, IncidentId, Sanction, SanctionId, SanctionStatus, UserId};
use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe store of sanctions
#[derive(Debug, Default)]
pub struct SanctionLedger {
    sanctions: DashMap<SanctionId, Sanction>,
    by_user: DashMap<UserId, Vec<SanctionId>>,
    by_incident: DashMap<IncidentId, SanctionId>,
    next_id: AtomicU64,
}

impl SanctionLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a sanction for an incident
    ///
    /// The restriction runs from `now` for `days` days, inclusive at both
    /// ends. At most one sanction exists per incident: issuing again for
    /// the same incident returns the stored sanction unchanged.
    pub fn issue(
        &self,
        user: UserId,
        incident: IncidentId,
        operator: UserId,
        days: i64,
        now: DateTime<Utc>,
    ) -> Result<Sanction, FleetError> {
        if days <= 0 {
            return Err(FleetError::no_penalty(incident));
        }

        match self.by_incident.entry(incident) {
            Entry::Occupied(entry) => {
                let id = *entry.get();
                self.get(id)
            }
            Entry::Vacant(entry) => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
                let sanction = Sanction {
                    id,
                    user,
                    incident,
                    operator,
                    start: now,
                    end: now + Duration::days(days),
                    status: SanctionStatus::Active,
                    appeal_text: None,
                    appeal_response: None,
                };

                self.sanctions.insert(id, sanction.clone());
                self.by_user.entry(user).or_default().push(id);
                entry.insert(id);
                Ok(sanction)
            }
        }
    }

    /// File an appeal against a sanction
    ///
    /// Each sanction can be appealed exactly once, ever; a rejected appeal
    /// does not open a second chance. While the appeal is pending the
    /// sanction keeps blocking the user.
    pub fn appeal(&self, id: SanctionId, text: String) -> Result<Sanction, FleetError> {
        let mut sanction = self
            .sanctions
            .get_mut(&id)
            .ok_or_else(|| FleetError::not_found("sanction", id))?;

        if sanction.appeal_text.is_some() {
            return Err(FleetError::already_appealed(id));
        }
        if sanction.status != SanctionStatus::Active {
            return Err(FleetError::sanction_not_active(id));
        }

        sanction.status = SanctionStatus::Appealed;
        sanction.appeal_text = Some(text);
        Ok(sanction.clone())
    }

    /// Resolve a pending appeal
    ///
    /// Accepting lifts the sanction immediately (status `Expired`, window
    /// untouched). Rejecting puts it back to `Active`; the original window
    /// keeps running and lapses on its own.
    pub fn resolve_appeal(
        &self,
        id: SanctionId,
        accept: bool,
        response: String,
    ) -> Result<Sanction, FleetError> {
        let mut sanction = self
            .sanctions
            .get_mut(&id)
            .ok_or_else(|| FleetError::not_found("sanction", id))?;

        if sanction.status != SanctionStatus::Appealed {
            return Err(FleetError::not_appealed(id));
        }

        sanction.status = if accept {
            SanctionStatus::Expired
        } else {
            SanctionStatus::Active
        };
        sanction.appeal_response = Some(response);
        Ok(sanction.clone())
    }

    /// Whether any sanction restricts the user at the given instant
    pub fn is_blocking(&self, user: UserId, now: DateTime<Utc>) -> bool {
        self.by_user
            .get(&user)
            .map(|ids| {
                ids.iter().any(|id| {
                    self.sanctions
                        .get(id)
                        .map(|sanction| sanction.blocks_at(now))
                        .unwrap_or(false)
                })
            })
            .unwrap_or(false)
    }

    /// All sanctions currently restricting the user
    pub fn active_for(&self, user: UserId, now: DateTime<Utc>) -> Vec<Sanction> {
        self.by_user
            .get(&user)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.sanctions.get(id).map(|entry| entry.clone()))
                    .filter(|sanction| sanction.blocks_at(now))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The sanction issued for an incident, if any
    pub fn by_incident(&self, incident: IncidentId) -> Option<Sanction> {
        self.by_incident
            .get(&incident)
            .and_then(|id| self.sanctions.get(&*id).map(|entry| entry.clone()))
    }

    /// Snapshot of a sanction
    pub fn get(&self, id: SanctionId) -> Result<Sanction, FleetError> {
        self.sanctions
            .get(&id)
            .map(|entry| entry.clone())
            .ok_or_else(|| FleetError::not_found("sanction", id))
    }

    /// All sanctions, sorted by ID
    pub fn all(&self) -> Vec<Sanction> {
        let mut sanctions: Vec<Sanction> = self
            .sanctions
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        sanctions.sort_by_key(|sanction| sanction.id);
        sanctions
    }
}
