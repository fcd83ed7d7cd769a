//! Rotation: once a PIC is on duty, the person before them moves to the
//! end of the queue, one week after the latest scheduled date.

use chrono::{Duration, NaiveDate};
use tracing::info;

use crate::error::{Result, RosterError};
use crate::store::RosterStore;
use crate::{ScheduleRecord, sort_by_date};

/// Which record moved, and where to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationOutcome {
    pub current_pic: String,
    pub previous_pic: String,
    pub previous_date: NaiveDate,
    pub new_date: NaiveDate,
}

/// Move the PIC preceding `current_pic` to one week after the latest date,
/// then sort `records` ascending by date.
///
/// When `current_pic` appears more than once, its last occurrence in
/// `records` wins. The previous PIC is the last record, in `records` order,
/// dated strictly before the current PIC's date.
pub fn advance_previous_pic(
    records: &mut [ScheduleRecord],
    current_pic: &str,
) -> Result<RotationOutcome> {
    let mut current_date = None;
    let mut latest_date = None;
    for record in records.iter() {
        if record.pic == current_pic {
            current_date = Some(record.date);
        }
        if latest_date.is_none_or(|latest| record.date > latest) {
            latest_date = Some(record.date);
        }
    }

    let (Some(current_date), Some(latest_date)) = (current_date, latest_date) else {
        return Err(RosterError::PicNotFound {
            pic: current_pic.to_string(),
        });
    };

    let previous = records
        .iter_mut()
        .rev()
        .find(|r| r.date < current_date)
        .ok_or_else(|| RosterError::PreviousPicNotFound {
            pic: current_pic.to_string(),
        })?;

    let outcome = RotationOutcome {
        current_pic: current_pic.to_string(),
        previous_pic: previous.pic.clone(),
        previous_date: previous.date,
        new_date: latest_date + Duration::days(7),
    };
    previous.date = outcome.new_date;

    sort_by_date(records);
    Ok(outcome)
}

impl RosterStore {
    /// Load the roster, rotate for `current_pic`, and write it back sorted.
    pub fn rotate(&self, current_pic: &str) -> Result<RotationOutcome> {
        let mut records = self.load()?;
        let outcome = advance_previous_pic(&mut records, current_pic)?;
        self.save(&records)?;

        info!(
            current = %outcome.current_pic,
            previous = %outcome.previous_pic,
            from = %outcome.previous_date,
            to = %outcome.new_date,
            "Rotated previous PIC"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn abc() -> Vec<ScheduleRecord> {
        vec![
            ScheduleRecord::new("A", ymd(2024, 1, 2), "a@x.com"),
            ScheduleRecord::new("B", ymd(2024, 1, 9), "b@x.com"),
            ScheduleRecord::new("C", ymd(2024, 1, 16), "c@x.com"),
        ]
    }

    #[test]
    fn test_rotation_moves_previous_to_tail() {
        let mut records = abc();
        let outcome = advance_previous_pic(&mut records, "B").unwrap();

        assert_eq!(outcome.previous_pic, "A");
        assert_eq!(outcome.previous_date, ymd(2024, 1, 2));
        assert_eq!(outcome.new_date, ymd(2024, 1, 23));

        let order: Vec<&str> = records.iter().map(|r| r.pic.as_str()).collect();
        assert_eq!(order, vec!["B", "C", "A"]);
        assert_eq!(records[2].date, ymd(2024, 1, 23));
    }

    #[test]
    fn test_rotation_unknown_pic() {
        let mut records = abc();
        match advance_previous_pic(&mut records, "Zed") {
            Err(RosterError::PicNotFound { pic }) => assert_eq!(pic, "Zed"),
            other => panic!("expected PicNotFound, got {other:?}"),
        }
        assert_eq!(records, abc());
    }

    #[test]
    fn test_rotation_earliest_pic_has_no_previous() {
        let mut records = abc();
        assert!(matches!(
            advance_previous_pic(&mut records, "A"),
            Err(RosterError::PreviousPicNotFound { .. })
        ));
    }

    #[test]
    fn test_rotation_empty_roster() {
        let mut records: Vec<ScheduleRecord> = Vec::new();
        assert!(matches!(
            advance_previous_pic(&mut records, "A"),
            Err(RosterError::PicNotFound { .. })
        ));
    }

    #[test]
    fn test_previous_is_last_earlier_record_in_load_order() {
        // Unsorted input: reverse scan picks X (last in load order), not the
        // chronologically closest A.
        let mut records = vec![
            ScheduleRecord::new("A", ymd(2024, 1, 9), "a@x.com"),
            ScheduleRecord::new("B", ymd(2024, 1, 16), "b@x.com"),
            ScheduleRecord::new("X", ymd(2024, 1, 2), "x@x.com"),
        ];
        let outcome = advance_previous_pic(&mut records, "B").unwrap();
        assert_eq!(outcome.previous_pic, "X");
        assert_eq!(outcome.new_date, ymd(2024, 1, 23));
    }

    #[test]
    fn test_duplicate_current_pic_uses_last_occurrence() {
        let mut records = vec![
            ScheduleRecord::new("B", ymd(2024, 1, 2), "b@x.com"),
            ScheduleRecord::new("A", ymd(2024, 1, 9), "a@x.com"),
            ScheduleRecord::new("B", ymd(2024, 1, 16), "b@x.com"),
        ];
        let outcome = advance_previous_pic(&mut records, "B").unwrap();
        assert_eq!(outcome.previous_pic, "A");
        assert_eq!(outcome.new_date, ymd(2024, 1, 23));
    }

    #[test]
    fn test_store_rotate_persists_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let store = RosterStore::new(dir.path().join("schedule.txt"));
        store.save(&abc()).unwrap();

        store.rotate("B").unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            content,
            "B,2024-01-09,b@x.com\nC,2024-01-16,c@x.com\nA,2024-01-23,a@x.com\n"
        );
    }

    #[test]
    fn test_store_rotate_failure_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = RosterStore::new(dir.path().join("schedule.txt"));
        store.save(&abc()).unwrap();
        let before = std::fs::read_to_string(store.path()).unwrap();

        assert!(store.rotate("A").is_err());
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), before);
    }
}
