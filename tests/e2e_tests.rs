//! End-to-end tests for the bike fleet engine
//!
//! Each test writes a CSV event log to a temp file, replays it through the
//! full pipeline, and asserts on the sanction CSV that comes out.

use bike_fleet_engine::replay_events;
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER: &str = "event,at,user,bike,station,loan,sanction,kind,severity,text\n";

fn create_temp_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file.flush().expect("Failed to flush temp file");
    file
}

fn replay(rows: &str) -> String {
    let file = create_temp_csv(&format!("{}{}", HEADER, rows));
    let mut output = Vec::new();
    replay_events(file.path(), &mut output).expect("Replay failed");
    String::from_utf8(output).unwrap()
}

fn output_rows(output: &str) -> Vec<&str> {
    output.lines().skip(1).collect()
}

#[test]
fn test_on_time_return_produces_no_sanctions() {
    let output = replay(
        "provision,2024-05-01T08:00:00Z,,1,5,,,,,\n\
         open,2024-05-01T12:00:00Z,10,1,5,,,,,\n\
         close,2024-05-01T12:14:00Z,10,,8,1,,,,\n",
    );

    assert!(output_rows(&output).is_empty());
}

#[test]
fn test_return_at_grace_boundary_produces_no_sanctions() {
    let output = replay(
        "provision,2024-05-01T08:00:00Z,,1,5,,,,,\n\
         open,2024-05-01T12:00:00Z,10,1,5,,,,,\n\
         close,2024-05-01T12:15:00Z,10,,8,1,,,,\n",
    );

    assert!(output_rows(&output).is_empty());
}

#[test]
fn test_late_return_tiers_map_to_sanction_lengths() {
    // Three users, three bikes, three lateness tiers
    let output = replay(
        "provision,2024-05-01T08:00:00Z,,1,5,,,,,\n\
         provision,2024-05-01T08:00:00Z,,2,5,,,,,\n\
         provision,2024-05-01T08:00:00Z,,3,5,,,,,\n\
         open,2024-05-01T12:00:00Z,10,1,5,,,,,\n\
         open,2024-05-01T12:00:00Z,11,2,5,,,,,\n\
         open,2024-05-01T12:00:00Z,12,3,5,,,,,\n\
         close,2024-05-01T12:30:00Z,30,,8,1,,,,\n\
         close,2024-05-01T12:46:00Z,30,,8,2,,,,\n\
         close,2024-05-02T13:00:00Z,30,,8,3,,,,\n",
    );

    let rows = output_rows(&output);
    assert_eq!(rows.len(), 3);
    // 30 min open → tier 1 → 1 day
    assert_eq!(
        rows[0],
        "1,10,1,30,2024-05-01T12:30:00Z,2024-05-02T12:30:00Z,active,false"
    );
    // 46 min open → tier 2 → 3 days
    assert_eq!(
        rows[1],
        "2,11,2,30,2024-05-01T12:46:00Z,2024-05-04T12:46:00Z,active,false"
    );
    // 1500 min open → tier 4 → 30 days
    assert_eq!(
        rows[2],
        "3,12,3,30,2024-05-02T13:00:00Z,2024-06-01T13:00:00Z,active,false"
    );
}

#[test]
fn test_manual_incidents_yield_one_sanction_each() {
    let output = replay(
        "provision,2024-05-01T08:00:00Z,,1,5,,,,,\n\
         open,2024-05-01T12:00:00Z,10,1,5,,,,,\n\
         incident,2024-05-01T12:05:00Z,10,,,1,,deterioration,1,scuffed frame\n\
         incident,2024-05-01T12:06:00Z,10,,,1,,accident,3,bent fork\n\
         close,2024-05-01T12:10:00Z,30,,8,1,,,,\n",
    );

    let rows = output_rows(&output);
    assert_eq!(rows.len(), 2);
    // Tier 1 → 1 day, tier 3 → 7 days
    assert!(rows[0].ends_with("2024-05-02T12:10:00Z,active,false"));
    assert!(rows[1].ends_with("2024-05-08T12:10:00Z,active,false"));
}

#[test]
fn test_rejected_appeal_leaves_sanction_active() {
    let output = replay(
        "provision,2024-05-01T08:00:00Z,,1,5,,,,,\n\
         open,2024-05-01T12:00:00Z,10,1,5,,,,,\n\
         close,2024-05-01T12:46:00Z,30,,8,1,,,,\n\
         appeal,2024-05-01T13:00:00Z,,,,,1,,,the dock was full\n\
         resolve_appeal,2024-05-01T14:00:00Z,,,,,1,reject,,dock logs say otherwise\n",
    );

    let rows = output_rows(&output);
    assert_eq!(
        rows,
        ["1,10,1,30,2024-05-01T12:46:00Z,2024-05-04T12:46:00Z,active,true"]
    );
}

#[test]
fn test_accepted_appeal_expires_sanction_and_unblocks_user() {
    let output = replay(
        "provision,2024-05-01T08:00:00Z,,1,5,,,,,\n\
         open,2024-05-01T12:00:00Z,10,1,5,,,,,\n\
         close,2024-05-01T12:46:00Z,30,,8,1,,,,\n\
         appeal,2024-05-01T13:00:00Z,,,,,1,,,the dock was full\n\
         resolve_appeal,2024-05-01T14:00:00Z,,,,,1,accept,,confirmed by dock logs\n\
         open,2024-05-01T15:00:00Z,10,1,8,,,,,\n\
         close,2024-05-01T15:05:00Z,10,,5,2,,,,\n",
    );

    // Lifted sanction keeps its original window but stops blocking, so the
    // second loan goes through without adding anything
    let rows = output_rows(&output);
    assert_eq!(
        rows,
        ["1,10,1,30,2024-05-01T12:46:00Z,2024-05-04T12:46:00Z,expired,true"]
    );
}

#[test]
fn test_blocked_user_cannot_open_until_window_lapses() {
    let output = replay(
        "provision,2024-05-01T08:00:00Z,,1,5,,,,,\n\
         provision,2024-05-01T08:00:00Z,,2,5,,,,,\n\
         open,2024-05-01T12:00:00Z,10,1,5,,,,,\n\
         close,2024-05-01T12:46:00Z,30,,8,1,,,,\n\
         open,2024-05-02T10:00:00Z,10,2,5,,,,,\n\
         open,2024-05-05T10:00:00Z,10,2,5,,,,,\n\
         close,2024-05-06T10:46:00Z,30,,8,2,,,,\n",
    );

    let rows = output_rows(&output);
    // The blocked open was rejected; only the post-window loan ran (and was
    // itself 25 hours long, so it earned a second sanction for loan 2)
    assert_eq!(rows.len(), 2);
    assert!(rows[0].starts_with("1,10,1,30,2024-05-01T12:46:00Z"));
    assert!(rows[1].starts_with("2,10,2,30,2024-05-06T10:46:00Z"));
}

#[test]
fn test_double_appeal_is_ignored() {
    let output = replay(
        "provision,2024-05-01T08:00:00Z,,1,5,,,,,\n\
         open,2024-05-01T12:00:00Z,10,1,5,,,,,\n\
         close,2024-05-01T12:46:00Z,30,,8,1,,,,\n\
         appeal,2024-05-01T13:00:00Z,,,,,1,,,first try\n\
         resolve_appeal,2024-05-01T14:00:00Z,,,,,1,reject,,no\n\
         appeal,2024-05-01T15:00:00Z,,,,,1,,,second try\n",
    );

    let rows = output_rows(&output);
    // The second appeal was rejected as a duplicate; status is back to active
    assert_eq!(
        rows,
        ["1,10,1,30,2024-05-01T12:46:00Z,2024-05-04T12:46:00Z,active,true"]
    );
}

#[test]
fn test_retired_bike_cannot_be_opened() {
    let output = replay(
        "provision,2024-05-01T08:00:00Z,,1,5,,,,,\n\
         retire,2024-05-01T09:00:00Z,,1,,,,,,\n\
         open,2024-05-01T12:00:00Z,10,1,5,,,,,\n\
         close,2024-05-01T12:46:00Z,30,,8,1,,,,\n",
    );

    // Both the open and the close of the never-created loan were rejected
    assert!(output_rows(&output).is_empty());
}

#[test]
fn test_malformed_rows_do_not_abort_the_run() {
    let output = replay(
        "provision,2024-05-01T08:00:00Z,,1,5,,,,,\n\
         open,not-a-timestamp,10,1,5,,,,,\n\
         open,2024-05-01T12:00:00Z,10,1,5,,,,,\n\
         incident,2024-05-01T12:05:00Z,10,,,1,,accident,9,bad severity\n\
         close,2024-05-01T12:46:00Z,30,,8,1,,,,\n",
    );

    // Only the automatic lateness incident survived
    let rows = output_rows(&output);
    assert_eq!(rows.len(), 1);
    assert!(rows[0].starts_with("1,10,1,30"));
}
