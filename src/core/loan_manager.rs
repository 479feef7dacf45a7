//! Loan manager
//!
//! Orchestrates the full checkout-to-checkin lifecycle across the registry
//! and both ledgers. `open` and `close` are all-or-nothing: a failure at
//! any validation step leaves every store untouched.
//!
//! # Concurrency
//!
//! Two hazards exist: concurrent `open` calls for the same bicycle, and for
//! the same user. The bicycle side is serialized inside
//! [`ResourceRegistry::checkout`]; the user side is serialized here by
//! reserving the user's slot in `open_by_user` through the `DashMap` entry
//! API before touching the bicycle. Exactly one contender wins; losers see
//! `UserHasOpenLoan` or `BikeNotAvailable`. `close` holds the loan's map
//! guard for its whole duration, so a double close observes `LoanNotOpen`
//! and never re-issues sanctions or re-docks the bicycle.

use crate::core::clock::Clock;
use crate::core::incident_ledger::IncidentLedger;
use crate::core::penalty::{self, GRACE_MINUTES};
use crate::core::registry::ResourceRegistry;
use crate::core::sanction_ledger::SanctionLedger;
use crate::types::{
    BikeId, FleetError, Incident, IncidentType, Loan, LoanId, LoanStatus, SeverityTier,
    StationId, UserId,
};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Coordinates loans across the registry, ledgers, and clock
pub struct LoanManager {
    registry: Arc<ResourceRegistry>,
    incidents: Arc<IncidentLedger>,
    sanctions: Arc<SanctionLedger>,
    clock: Arc<dyn Clock>,
    loans: DashMap<LoanId, Loan>,
    open_by_user: DashMap<UserId, LoanId>,
    next_id: AtomicU64,
}

impl LoanManager {
    /// Create a manager over the given collaborators
    pub fn new(
        registry: Arc<ResourceRegistry>,
        incidents: Arc<IncidentLedger>,
        sanctions: Arc<SanctionLedger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        LoanManager {
            registry,
            incidents,
            sanctions,
            clock,
            loans: DashMap::new(),
            open_by_user: DashMap::new(),
            next_id: AtomicU64::new(0),
        }
    }

    /// Check a bicycle out to a user
    ///
    /// Fails with `UserBlocked` if a sanction covers the current instant,
    /// `UserHasOpenLoan` if the user already holds a bicycle, and
    /// `BikeNotAvailable` if the bicycle cannot be checked out. On any
    /// failure no loan is created and the bicycle is untouched.
    pub fn open(
        &self,
        user: UserId,
        bike: BikeId,
        origin_station: StationId,
        dest_station: Option<StationId>,
    ) -> Result<Loan, FleetError> {
        let now = self.clock.now();

        if self.sanctions.is_blocking(user, now) {
            return Err(FleetError::user_blocked(user));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;

        // Reserve the user's single-open-loan slot before touching the
        // bicycle; the entry guard makes concurrent opens for the same
        // user observe UserHasOpenLoan instead of racing past it.
        match self.open_by_user.entry(user) {
            Entry::Occupied(entry) => {
                return Err(FleetError::user_has_open_loan(user, *entry.get()));
            }
            Entry::Vacant(entry) => {
                entry.insert(id);
            }
        }

        if let Err(err) = self.registry.checkout(bike) {
            // Roll the reservation back so the failed open leaves no trace
            self.open_by_user.remove(&user);
            return Err(err);
        }

        let loan = Loan {
            id,
            user,
            bike,
            origin_station,
            dest_station,
            opened_at: now,
            closed_at: None,
            status: LoanStatus::Open,
        };

        self.loans.insert(id, loan.clone());
        Ok(loan)
    }

    /// Return a bicycle and close its loan
    ///
    /// Lateness beyond the grace window records an automatic misuse
    /// incident. If the loan carries any incidents (automatic or manually
    /// recorded before close), they are rolled into a return report and one
    /// sanction is issued per incident.
    pub fn close(
        &self,
        id: LoanId,
        dest_station: StationId,
        actor: UserId,
    ) -> Result<Loan, FleetError> {
        let now = self.clock.now();

        // The guard is held for the whole close; a concurrent second close
        // waits here and then fails the status check.
        let mut loan = self
            .loans
            .get_mut(&id)
            .ok_or_else(|| FleetError::not_found("loan", id))?;

        if loan.status.is_terminal() {
            return Err(FleetError::loan_not_open(id));
        }

        let elapsed = now - loan.opened_at;
        if let Some(tier) = penalty::classify_lateness(elapsed) {
            let minutes_late = elapsed.num_minutes() - GRACE_MINUTES;
            self.incidents
                .record_automatic_late(id, loan.bike, actor, minutes_late, tier, now);
        }

        if self.incidents.finalize_report(id, actor, now).is_some() {
            // One sanction per incident, not one per report
            for incident in self.incidents.list_by_loan(id) {
                self.sanctions.issue(
                    loan.user,
                    incident.id,
                    actor,
                    penalty::penalty_days(incident.severity),
                    now,
                )?;
            }
        }

        self.registry.checkin(loan.bike, dest_station)?;

        loan.closed_at = Some(now);
        loan.dest_station = Some(dest_station);
        loan.status = LoanStatus::Closed;
        self.open_by_user.remove(&loan.user);

        Ok(loan.clone())
    }

    /// Record a manual incident against an open loan
    ///
    /// The incident joins the loan's closing report when the bicycle comes
    /// back; sanctions are issued at close, not here.
    pub fn report_incident(
        &self,
        loan_id: LoanId,
        reporter: UserId,
        kind: IncidentType,
        severity: SeverityTier,
        description: String,
    ) -> Result<Incident, FleetError> {
        let now = self.clock.now();

        let loan = self
            .loans
            .get(&loan_id)
            .ok_or_else(|| FleetError::not_found("loan", loan_id))?;

        if loan.status != LoanStatus::Open {
            return Err(FleetError::loan_not_open(loan_id));
        }

        Ok(self
            .incidents
            .record(loan_id, loan.bike, reporter, kind, severity, description, now))
    }

    /// Snapshot of a loan
    pub fn loan(&self, id: LoanId) -> Result<Loan, FleetError> {
        self.loans
            .get(&id)
            .map(|entry| entry.clone())
            .ok_or_else(|| FleetError::not_found("loan", id))
    }

    /// The user's open loan, if any
    pub fn open_loan_for_user(&self, user: UserId) -> Option<Loan> {
        self.open_by_user
            .get(&user)
            .and_then(|id| self.loans.get(&*id).map(|entry| entry.clone()))
    }
}
