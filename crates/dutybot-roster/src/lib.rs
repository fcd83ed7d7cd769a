//! dutybot-roster: the duty roster and its weekly rotation.
//!
//! The roster is a flat file of `pic,YYYY-MM-DD,contact` lines. Each weekly
//! run loads it, shows whoever is on duty in the active Tuesday-to-Monday
//! window, and moves the previous PIC to the tail of the queue.

pub mod error;
pub mod render;
pub mod report;
pub mod rotation;
pub mod store;
pub mod week;

use chrono::NaiveDate;

pub use error::{Result, RosterError};
pub use render::{WindowRender, mention_tag, render_and_rotate, render_full, render_window};
pub use report::{RotationAttempt, WeeklyReport, compose_weekly_report, preview_weekly_report};
pub use rotation::{RotationOutcome, advance_previous_pic};
pub use store::RosterStore;
pub use week::{WeekWindow, current_week, week_window};

/// Date format used on disk and in rendered output.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One line of the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRecord {
    /// Display name of the person in charge.
    pub pic: String,
    /// Duty date.
    pub date: NaiveDate,
    /// Email used for the mention tag.
    pub contact: String,
}

impl ScheduleRecord {
    pub fn new(pic: impl Into<String>, date: NaiveDate, contact: impl Into<String>) -> Self {
        Self {
            pic: pic.into(),
            date,
            contact: contact.into(),
        }
    }
}

/// Stable ascending sort by date. Records sharing a date keep their load order.
pub fn sort_by_date(records: &mut [ScheduleRecord]) {
    records.sort_by_key(|r| r.date);
}
