//! Input/output for the event replay pipeline

pub mod csv_format;
pub mod event_reader;

pub use csv_format::{convert_event_record, write_sanctions_csv, EventRecord, FleetEvent, TimedEvent};
pub use event_reader::EventReader;
