//! CSV format handling for fleet event input and sanction output
//!
//! This module centralizes all CSV format concerns, providing:
//! - EventRecord structure for deserialization
//! - Conversion from CSV records to timed domain events
//! - Sanction output serialization
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{
    BikeId, IncidentType, LoanId, Sanction, SanctionId, SanctionStatus, SeverityTier, StationId,
    UserId,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use std::io::Write;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns:
/// `event, at, user, bike, station, loan, sanction, kind, severity, text`
///
/// Most fields are optional because each event type uses a different
/// subset; `convert_event_record` validates presence per event.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct EventRecord {
    pub event: String,
    pub at: String,
    pub user: Option<UserId>,
    pub bike: Option<BikeId>,
    pub station: Option<StationId>,
    pub loan: Option<LoanId>,
    pub sanction: Option<SanctionId>,
    pub kind: Option<String>,
    pub severity: Option<u8>,
    pub text: Option<String>,
}

/// A fleet lifecycle event parsed from one CSV row
#[derive(Debug, Clone, PartialEq)]
pub enum FleetEvent {
    /// Register a bicycle, available at a station
    Provision { bike: BikeId, station: StationId },
    /// Remove a bicycle from circulation
    Retire { bike: BikeId },
    /// Check a bicycle out to a user
    Open {
        user: UserId,
        bike: BikeId,
        station: StationId,
    },
    /// Return a bicycle and close its loan
    Close {
        loan: LoanId,
        station: StationId,
        actor: UserId,
    },
    /// Record a manual incident against an open loan
    Incident {
        loan: LoanId,
        reporter: UserId,
        kind: IncidentType,
        severity: SeverityTier,
        text: String,
    },
    /// File an appeal against a sanction
    Appeal { sanction: SanctionId, text: String },
    /// Resolve a pending appeal
    ResolveAppeal {
        sanction: SanctionId,
        accept: bool,
        text: String,
    },
}

/// An event together with the instant it occurred
#[derive(Debug, Clone, PartialEq)]
pub struct TimedEvent {
    pub at: DateTime<Utc>,
    pub event: FleetEvent,
}

fn require<T>(field: Option<T>, name: &str, event: &str) -> Result<T, String> {
    field.ok_or_else(|| format!("{} event requires a '{}' field", event, name))
}

/// Convert an EventRecord to a TimedEvent
///
/// This function:
/// - Parses the `at` timestamp as RFC 3339
/// - Dispatches on the event name (case-insensitive)
/// - Validates that the fields each event type needs are present
///
/// Extra fields on a row are ignored; missing required fields and
/// out-of-range severities are reported as errors.
pub fn convert_event_record(record: EventRecord) -> Result<TimedEvent, String> {
    let at = DateTime::parse_from_rfc3339(record.at.trim())
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| format!("Invalid timestamp '{}': {}", record.at, e))?;

    let name = record.event.to_lowercase();
    let event = match name.as_str() {
        "provision" => FleetEvent::Provision {
            bike: require(record.bike, "bike", &name)?,
            station: require(record.station, "station", &name)?,
        },
        "retire" => FleetEvent::Retire {
            bike: require(record.bike, "bike", &name)?,
        },
        "open" => FleetEvent::Open {
            user: require(record.user, "user", &name)?,
            bike: require(record.bike, "bike", &name)?,
            station: require(record.station, "station", &name)?,
        },
        "close" => FleetEvent::Close {
            loan: require(record.loan, "loan", &name)?,
            station: require(record.station, "station", &name)?,
            actor: require(record.user, "user", &name)?,
        },
        "incident" => {
            let kind = match require(record.kind, "kind", &name)?.to_lowercase().as_str() {
                "accident" => IncidentType::Accident,
                "deterioration" => IncidentType::Deterioration,
                "misuse" => IncidentType::Misuse,
                "other" => IncidentType::Other,
                other => return Err(format!("Invalid incident kind: '{}'", other)),
            };
            let rank = require(record.severity, "severity", &name)?;
            let severity = SeverityTier::from_rank(rank)
                .ok_or_else(|| format!("Invalid severity rank: {}", rank))?;

            FleetEvent::Incident {
                loan: require(record.loan, "loan", &name)?,
                reporter: require(record.user, "user", &name)?,
                kind,
                severity,
                text: record.text.unwrap_or_default(),
            }
        }
        "appeal" => FleetEvent::Appeal {
            sanction: require(record.sanction, "sanction", &name)?,
            text: require(record.text, "text", &name)?,
        },
        "resolve_appeal" => {
            let accept = match require(record.kind, "kind", &name)?.to_lowercase().as_str() {
                "accept" => true,
                "reject" => false,
                other => return Err(format!("Invalid appeal verdict: '{}'", other)),
            };

            FleetEvent::ResolveAppeal {
                sanction: require(record.sanction, "sanction", &name)?,
                accept,
                text: record.text.unwrap_or_default(),
            }
        }
        _ => return Err(format!("Invalid event type: '{}'", record.event)),
    };

    Ok(TimedEvent { at, event })
}

fn status_label(status: SanctionStatus) -> &'static str {
    match status {
        SanctionStatus::Active => "active",
        SanctionStatus::Appealed => "appealed",
        SanctionStatus::Expired => "expired",
    }
}

/// Write sanction states to CSV format
///
/// Writes sanctions with columns:
/// `sanction, user, incident, operator, start, end, status, appealed`
/// Sanctions are sorted by ID for deterministic output.
pub fn write_sanctions_csv(sanctions: &[Sanction], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record([
            "sanction", "user", "incident", "operator", "start", "end", "status", "appealed",
        ])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted = sanctions.to_vec();
    sorted.sort_by_key(|sanction| sanction.id);

    for sanction in sorted {
        writer
            .write_record(&[
                sanction.id.to_string(),
                sanction.user.to_string(),
                sanction.incident.to_string(),
                sanction.operator.to_string(),
                sanction.start.to_rfc3339_opts(SecondsFormat::Secs, true),
                sanction.end.to_rfc3339_opts(SecondsFormat::Secs, true),
                status_label(sanction.status).to_string(),
                sanction.appeal_text.is_some().to_string(),
            ])
            .map_err(|e| format!("Failed to write sanction record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
