//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over timed fleet events from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual record parsing errors are yielded as Err variants in the
//!   iterator, with line numbers, so replay can skip the row and continue
//!
//! # Memory Efficiency
//!
//! Records are read one at a time; memory usage is O(1) per record, not
//! O(file size).

use crate::io::csv_format::{convert_event_record, EventRecord, TimedEvent};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Streaming reader over fleet event CSV files
#[derive(Debug)]
pub struct EventReader {
    reader: csv::Reader<File>,
    line_num: usize,
}

impl EventReader {
    /// Create a new EventReader from a file path
    ///
    /// The CSV reader is configured to trim whitespace from all fields and
    /// to allow flexible field counts, since most columns are optional.
    pub fn new(path: &Path) -> Result<Self, String> {
        let file = File::open(path)
            .map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 0,
        })
    }
}

impl Iterator for EventReader {
    type Item = Result<TimedEvent, String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<EventRecord>();

        match deserializer.next()? {
            Ok(record) => {
                self.line_num += 1;
                // Line numbers are offset by one for the header row
                Some(
                    convert_event_record(record)
                        .map_err(|e| format!("Line {}: {}", self.line_num + 1, e)),
                )
            }
            Err(e) => {
                self.line_num += 1;
                Some(Err(format!(
                    "Line {}: CSV parse error: {}",
                    self.line_num + 1,
                    e
                )))
            }
        }
    }
}
