//! Flat-file roster storage.
//!
//! One record per line: `pic,YYYY-MM-DD,contact`. No header, no escaping.
//! Lines that do not split into exactly three fields are skipped; a
//! three-field line with a bad date fails the whole load.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{Result, RosterError};
use crate::{DATE_FORMAT, ScheduleRecord};

/// Roster persisted at a single path.
///
/// There is no locking: callers must not run two writers against the same
/// file at once.
#[derive(Debug, Clone)]
pub struct RosterStore {
    path: PathBuf,
}

impl RosterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every well-formed record, in file order.
    ///
    /// Lines may end in `\n` or `\r\n`. Bytes that are not valid UTF-8 are
    /// replaced with U+FFFD.
    pub fn load(&self) -> Result<Vec<ScheduleRecord>> {
        let file = File::open(&self.path).map_err(|source| RosterError::FileOpen {
            path: self.path.clone(),
            source,
        })?;

        let mut records = Vec::new();
        for line in BufReader::new(file).split(b'\n') {
            let mut line = line.map_err(|source| RosterError::FileRead {
                path: self.path.clone(),
                source,
            })?;
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            // Undecodable bytes only affect the field they appear in.
            if let Some(record) = parse_line(&String::from_utf8_lossy(&line)) {
                records.push(record?);
            }
        }

        debug!(path = %self.path.display(), count = records.len(), "Roster loaded");
        Ok(records)
    }

    /// Truncate the file and write `records` in the order given.
    ///
    /// A failure partway leaves the file truncated.
    pub fn save(&self, records: &[ScheduleRecord]) -> Result<()> {
        let file = File::create(&self.path).map_err(|source| RosterError::FileCreate {
            path: self.path.clone(),
            source,
        })?;

        let mut writer = BufWriter::new(file);
        for record in records {
            writeln!(writer, "{}", format_line(record)).map_err(|source| {
                RosterError::WriteSchedule {
                    pic: record.pic.clone(),
                    source,
                }
            })?;
        }
        writer.flush().map_err(|source| RosterError::WriteSchedule {
            pic: records.last().map(|r| r.pic.clone()).unwrap_or_default(),
            source,
        })?;

        debug!(path = %self.path.display(), count = records.len(), "Roster saved");
        Ok(())
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|source| RosterError::DateParse {
        input: input.to_string(),
        source,
    })
}

/// Parse one roster line.
///
/// Returns `None` for lines that should be skipped.
pub fn parse_line(line: &str) -> Option<Result<ScheduleRecord>> {
    let parts: Vec<&str> = line.split(',').collect();
    let [pic, date, contact] = parts.as_slice() else {
        return None;
    };

    let pic = pic.trim();
    Some(
        parse_date(date.trim())
            .map(|date| ScheduleRecord::new(pic, date, contact.trim()))
            .map_err(|_| RosterError::InvalidDateFormat {
                pic: pic.to_string(),
            }),
    )
}

/// Serialize a record as a roster line, without the trailing newline.
pub fn format_line(record: &ScheduleRecord) -> String {
    format!(
        "{},{},{}",
        record.pic,
        record.date.format(DATE_FORMAT),
        record.contact
    )
}
