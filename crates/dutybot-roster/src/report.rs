//! The weekly PIC report posted to the group chat.

use tracing::info;

use crate::error::Result;
use crate::render::{render_and_rotate, render_full, render_window};
use crate::rotation::RotationOutcome;
use crate::store::RosterStore;
use crate::week::WeekWindow;

/// Heading of the report, followed by this week's lines.
pub const REPORT_HEADING: &str = "PICs for this week: \n";

/// Result of rotating for one rendered PIC.
#[derive(Debug)]
pub struct RotationAttempt {
    pub pic: String,
    pub result: Result<RotationOutcome>,
}

#[derive(Debug)]
pub struct WeeklyReport {
    pub text: String,
    pub rotations: Vec<RotationAttempt>,
}

impl WeeklyReport {
    pub fn rotated(&self) -> usize {
        self.rotations.iter().filter(|r| r.result.is_ok()).count()
    }
}

/// Build the report and rotate the roster on disk.
///
/// The full schedule is rendered from a fresh load, so it already reflects
/// this run's rotations. Load failures abort; rotation failures do not.
pub fn compose_weekly_report(store: &RosterStore, window: &WeekWindow) -> Result<WeeklyReport> {
    let records = store.load()?;

    let mut text = String::from(REPORT_HEADING);
    let rendered = render_and_rotate(&records, window, store);
    text.push_str(&rendered.text);

    let mut records = store.load()?;
    text.push_str(&render_full(&mut records));

    let report = WeeklyReport {
        text,
        rotations: rendered.rotations,
    };
    info!(
        path = %store.path().display(),
        on_duty = report.rotations.len(),
        rotated = report.rotated(),
        "Weekly report composed"
    );
    Ok(report)
}

/// Same text layout as [`compose_weekly_report`], without touching the file.
pub fn preview_weekly_report(store: &RosterStore, window: &WeekWindow) -> Result<String> {
    let mut records = store.load()?;
    let mut text = String::from(REPORT_HEADING);
    text.push_str(&render_window(&records, window));
    text.push_str(&render_full(&mut records));
    Ok(text)
}
