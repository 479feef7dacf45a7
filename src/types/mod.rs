//! Core types for the Bike Fleet Engine

pub mod error;
pub mod fleet;
pub mod incident;
pub mod loan;
pub mod sanction;

pub use error::FleetError;
pub use fleet::{Bicycle, BikeId, BikeStatus, Station, StationId, UserId};
pub use incident::{Incident, IncidentId, IncidentType, ReportId, ReturnReport, SeverityTier};
pub use loan::{Loan, LoanId, LoanStatus};
pub use sanction::{Sanction, SanctionId, SanctionStatus};
