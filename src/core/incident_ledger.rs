//! Incident ledger
//!
//! Append-only store of incidents keyed by loan, plus the return reports
//! they roll up into when a loan closes. IDs are handed out from atomic
//! counters; the only mutation ever applied to a stored incident is
//! attaching its report.

use crate::core::penalty;
use crate::types::{
    BikeId, FleetError, Incident, IncidentId, IncidentType, LoanId, ReportId, ReturnReport,
    SeverityTier, UserId,
};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe store of incidents and return reports
#[derive(Debug, Default)]
pub struct IncidentLedger {
    incidents: DashMap<IncidentId, Incident>,
    reports: DashMap<ReportId, ReturnReport>,
    by_loan: DashMap<LoanId, Vec<IncidentId>>,
    report_by_loan: DashMap<LoanId, ReportId>,
    next_incident_id: AtomicU64,
    next_report_id: AtomicU64,
}

impl IncidentLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an incident against a loan
    pub fn record(
        &self,
        loan: LoanId,
        bike: BikeId,
        reporter: UserId,
        kind: IncidentType,
        severity: SeverityTier,
        description: String,
        now: DateTime<Utc>,
    ) -> Incident {
        let id = self.next_incident_id.fetch_add(1, Ordering::SeqCst) + 1;
        let incident = Incident {
            id,
            loan,
            bike,
            reporter,
            kind,
            severity,
            description,
            created_at: now,
            report: None,
        };

        self.incidents.insert(id, incident.clone());
        self.by_loan.entry(loan).or_default().push(id);
        incident
    }

    /// Record the automatic incident for a late return
    ///
    /// Lateness is filed as misuse with a machine-generated description;
    /// the tier comes from the lateness classification, not the reporter.
    pub fn record_automatic_late(
        &self,
        loan: LoanId,
        bike: BikeId,
        reporter: UserId,
        overdue_minutes: i64,
        severity: SeverityTier,
        now: DateTime<Utc>,
    ) -> Incident {
        self.record(
            loan,
            bike,
            reporter,
            IncidentType::Misuse,
            severity,
            format!("late return: {} minutes", overdue_minutes),
            now,
        )
    }

    /// Roll the loan's unreported incidents into a return report
    ///
    /// Called exactly once per loan, when it closes. Returns `None` if the
    /// loan has no incidents; in that case no report exists for it.
    pub fn finalize_report(
        &self,
        loan: LoanId,
        created_by: UserId,
        now: DateTime<Utc>,
    ) -> Option<ReturnReport> {
        let ids = match self.by_loan.get(&loan) {
            Some(ids) if !ids.is_empty() => ids.value().clone(),
            _ => return None,
        };

        let id = self.next_report_id.fetch_add(1, Ordering::SeqCst) + 1;
        let mut total_penalty_days = 0;

        for incident_id in &ids {
            if let Some(mut incident) = self.incidents.get_mut(incident_id) {
                incident.report = Some(id);
                total_penalty_days += penalty::penalty_days(incident.severity);
            }
        }

        let report = ReturnReport {
            id,
            loan,
            created_by,
            created_at: now,
            total_penalty_days,
        };

        self.reports.insert(id, report.clone());
        self.report_by_loan.insert(loan, id);
        Some(report)
    }

    /// Snapshot of an incident
    pub fn get(&self, id: IncidentId) -> Result<Incident, FleetError> {
        self.incidents
            .get(&id)
            .map(|entry| entry.clone())
            .ok_or_else(|| FleetError::not_found("incident", id))
    }

    /// All incidents recorded against a loan, in recording order
    pub fn list_by_loan(&self, loan: LoanId) -> Vec<Incident> {
        self.by_loan
            .get(&loan)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.incidents.get(id).map(|entry| entry.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The return report for a closed loan, if one was created
    pub fn report_by_loan(&self, loan: LoanId) -> Option<ReturnReport> {
        self.report_by_loan
            .get(&loan)
            .and_then(|id| self.reports.get(&*id).map(|entry| entry.clone()))
    }
}
