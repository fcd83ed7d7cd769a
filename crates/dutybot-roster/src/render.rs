//! Plain-text rendering of the roster for group chat.

use std::fmt::Write;

use tracing::warn;

use crate::report::RotationAttempt;
use crate::store::RosterStore;
use crate::week::WeekWindow;
use crate::{DATE_FORMAT, ScheduleRecord, sort_by_date};

/// Header line of the full schedule block.
pub const FULL_SCHEDULE_HEADER: &str = "Stock Inventory Schedule for Following Weeks:";

/// SeaTalk mention reference for a user email.
pub fn mention_tag(contact: &str) -> String {
    format!(r#"<mention-tag target="seatalk://user?email={contact}"/>"#)
}

/// Lines for every record inside `window`, in the order given.
pub fn render_window(records: &[ScheduleRecord], window: &WeekWindow) -> String {
    let mut out = String::new();
    for record in records.iter().filter(|r| window.contains(r.date)) {
        push_window_line(&mut out, record);
    }
    out
}

/// Output of [`render_and_rotate`].
#[derive(Debug)]
pub struct WindowRender {
    pub text: String,
    /// One entry per rendered record, in render order.
    pub rotations: Vec<RotationAttempt>,
}

/// Render the window and rotate the persisted roster once per rendered PIC.
///
/// Each rotation reloads `store`, so later rotations see earlier ones.
/// Rotation failures are logged and returned, never raised.
pub fn render_and_rotate(
    records: &[ScheduleRecord],
    window: &WeekWindow,
    store: &RosterStore,
) -> WindowRender {
    let mut text = String::new();
    let mut rotations = Vec::new();

    for record in records.iter().filter(|r| window.contains(r.date)) {
        push_window_line(&mut text, record);

        let result = store.rotate(&record.pic);
        if let Err(e) = &result {
            warn!(pic = %record.pic, "Rotation skipped: {e}");
        }
        rotations.push(RotationAttempt {
            pic: record.pic.clone(),
            result,
        });
    }

    WindowRender { text, rotations }
}

/// The whole roster, sorted ascending by date, under a header line.
pub fn render_full(records: &mut [ScheduleRecord]) -> String {
    sort_by_date(records);

    let mut out = format!("\n{FULL_SCHEDULE_HEADER}\n");
    for record in records.iter() {
        let _ = writeln!(
            out,
            "Date: {} - PIC: {}",
            record.date.format(DATE_FORMAT),
            record.pic
        );
    }
    out
}

fn push_window_line(out: &mut String, record: &ScheduleRecord) {
    let _ = writeln!(
        out,
        "Date: {}- PIC: {} {}",
        record.date.format(DATE_FORMAT),
        record.pic,
        mention_tag(&record.contact)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::week::week_window;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window_of_jan_9() -> WeekWindow {
        let offset = chrono::FixedOffset::east_opt(7 * 3600).unwrap();
        let now = offset
            .with_ymd_and_hms(2024, 1, 10, 9, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        week_window(now, offset)
    }

    fn abc() -> Vec<ScheduleRecord> {
        vec![
            ScheduleRecord::new("A", ymd(2024, 1, 2), "a@x.com"),
            ScheduleRecord::new("B", ymd(2024, 1, 9), "b@x.com"),
            ScheduleRecord::new("C", ymd(2024, 1, 16), "c@x.com"),
        ]
    }

    #[test]
    fn test_mention_tag() {
        assert_eq!(
            mention_tag("bob@x.com"),
            r#"<mention-tag target="seatalk://user?email=bob@x.com"/>"#
        );
    }

    #[test]
    fn test_render_window_only_active_week() {
        let text = render_window(&abc(), &window_of_jan_9());
        assert_eq!(
            text,
            "Date: 2024-01-09- PIC: B <mention-tag target=\"seatalk://user?email=b@x.com\"/>\n"
        );
    }

    #[test]
    fn test_render_window_empty() {
        let records = vec![ScheduleRecord::new("A", ymd(2023, 6, 1), "a@x.com")];
        assert!(render_window(&records, &window_of_jan_9()).is_empty());
    }

    #[test]
    fn test_render_full_sorted() {
        let mut records = vec![
            ScheduleRecord::new("C", ymd(2024, 1, 16), "c@x.com"),
            ScheduleRecord::new("A", ymd(2024, 1, 2), "a@x.com"),
            ScheduleRecord::new("B", ymd(2024, 1, 9), "b@x.com"),
        ];
        let text = render_full(&mut records);
        assert_eq!(
            text,
            "\nStock Inventory Schedule for Following Weeks:\n\
             Date: 2024-01-02 - PIC: A\n\
             Date: 2024-01-09 - PIC: B\n\
             Date: 2024-01-16 - PIC: C\n"
        );
    }

    #[test]
    fn test_render_and_rotate_reports_each_rotation() {
        let dir = tempfile::tempdir().unwrap();
        let store = RosterStore::new(dir.path().join("schedule.txt"));
        store.save(&abc()).unwrap();

        let rendered = render_and_rotate(&abc(), &window_of_jan_9(), &store);

        assert!(rendered.text.contains("PIC: B"));
        assert_eq!(rendered.rotations.len(), 1);
        let outcome = rendered.rotations[0].result.as_ref().unwrap();
        assert_eq!(outcome.previous_pic, "A");
        assert_eq!(store.load().unwrap().last().unwrap().pic, "A");
    }

    #[test]
    fn test_render_and_rotate_swallows_errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = RosterStore::new(dir.path().join("missing.txt"));

        let rendered = render_and_rotate(&abc(), &window_of_jan_9(), &store);

        assert!(rendered.text.contains("PIC: B"));
        assert!(matches!(
            rendered.rotations[0].result,
            Err(crate::RosterError::FileOpen { .. })
        ));
    }
}
