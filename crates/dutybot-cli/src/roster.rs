use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, FixedOffset, Utc};

use dutybot_roster::{DATE_FORMAT, RosterStore, preview_weekly_report, week_window};

/// Print this week's window and the full schedule without modifying the file.
pub fn show(
    file: PathBuf,
    offset: FixedOffset,
    now: DateTime<Utc>,
) -> anyhow::Result<String> {
    let store = RosterStore::new(file);
    let window = week_window(now, offset);
    let report = preview_weekly_report(&store, &window)
        .with_context(|| format!("failed to read roster {}", store.path().display()))?;

    Ok(format!(
        "Week: {} .. {}\n\n{report}",
        window.start.format("%Y-%m-%d %H:%M:%S %:z"),
        window.end.format("%Y-%m-%d %H:%M:%S %:z"),
    ))
}

/// Rotate once for `pic` and describe the change.
pub fn rotate(file: PathBuf, pic: &str) -> anyhow::Result<String> {
    let store = RosterStore::new(file);
    let outcome = store
        .rotate(pic)
        .with_context(|| format!("failed to rotate roster {}", store.path().display()))?;

    Ok(format!(
        "{} moved from {} to {} (current PIC: {})",
        outcome.previous_pic,
        outcome.previous_date.format(DATE_FORMAT),
        outcome.new_date.format(DATE_FORMAT),
        outcome.current_pic,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const ROSTER: &str = "A,2024-01-02,a@x.com\nB,2024-01-09,b@x.com\nC,2024-01-16,c@x.com\n";

    fn roster_file() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.txt");
        std::fs::write(&path, ROSTER).unwrap();
        (dir, path)
    }

    #[test]
    fn test_show_prints_window() {
        let (_dir, path) = roster_file();
        let offset = FixedOffset::east_opt(7 * 3600).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 3, 0, 0).unwrap();

        let out = show(path.clone(), offset, now).unwrap();
        assert!(out.starts_with("Week: 2024-01-09 00:00:00 +07:00 .. 2024-01-15 23:59:59 +07:00"));
        assert!(out.contains("PIC: B <mention-tag"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), ROSTER);
    }

    #[test]
    fn test_rotate_reports_move() {
        let (_dir, path) = roster_file();
        let out = rotate(path, "C").unwrap();
        assert_eq!(out, "B moved from 2024-01-09 to 2024-01-23 (current PIC: C)");
    }

    #[test]
    fn test_rotate_unknown_pic() {
        let (_dir, path) = roster_file();
        let err = rotate(path, "Nobody").unwrap_err();
        assert!(format!("{err:#}").contains("PIC not found: Nobody"));
    }
}
