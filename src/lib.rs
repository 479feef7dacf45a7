//! Bike Fleet Engine Library
//! # Overview
//!
//! This library drives the loan, incident, and sanction lifecycle of a
//! shared bicycle fleet, plus a CSV event replay pipeline over it.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Bicycle, Loan, Incident, Sanction, etc.)
//! - [`cli`] - CLI argument parsing
//! - [`core`] - Business logic components:
//!   - [`core::loan_manager`] - Checkout/checkin orchestration
//!   - [`core::registry`] - Fleet inventory and bicycle state transitions
//!   - [`core::incident_ledger`] - Incident recording and return reports
//!   - [`core::sanction_ledger`] - Sanction issuance and the appeal state machine
//!   - [`core::penalty`] - Lateness classification and penalty table
//!   - [`core::clock`] - Injectable time source
//! - [`io`] - CSV event input and sanction output
//! - [`replay`] - Event replay driver
//!
//! # Lifecycle
//!
//! A loan opens only for an unblocked user on an available bicycle; each
//! user holds at most one open loan and each bicycle at most one. Closing a
//! loan past the 15-minute grace window records an automatic lateness
//! incident; all of a loan's incidents roll into a return report at close
//! and each incident yields one time-bounded sanction. Sanctions can be
//! appealed exactly once: an accepted appeal lifts the restriction
//! immediately, a rejected one leaves the original window to lapse on its
//! own.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod replay;
pub mod types;

pub use core::{Clock, IncidentLedger, LoanManager, ManualClock, ResourceRegistry, SanctionLedger, SystemClock};
pub use io::write_sanctions_csv;
pub use replay::replay_events;
pub use types::{
    Bicycle, BikeId, BikeStatus, FleetError, Incident, IncidentId, IncidentType, Loan, LoanId,
    LoanStatus, ReportId, ReturnReport, Sanction, SanctionId, SanctionStatus, SeverityTier,
    Station, StationId, UserId,
};
