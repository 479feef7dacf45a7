//! Core lifecycle engine
//!
//! The engine is split by responsibility: the [`registry`](registry) owns
//! fleet inventory and bicycle state transitions, the ledgers own incidents
//! and sanctions, and the [`loan_manager`](loan_manager) orchestrates the
//! whole checkout-to-checkin lifecycle on top of them. Everything reads time
//! through the [`clock`](clock) abstraction.

pub mod clock;
pub mod incident_ledger;
pub mod loan_manager;
pub mod penalty;
pub mod registry;
pub mod sanction_ledger;

pub use clock::{Clock, ManualClock, SystemClock};
pub use incident_ledger::IncidentLedger;
pub use loan_manager::LoanManager;
pub use registry::ResourceRegistry;
pub use sanction_ledger::SanctionLedger;
