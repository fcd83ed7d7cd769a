//! Active week window: Tuesday 00:00:00 through the following Monday 23:59:59.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Utc, Weekday};

/// Day the duty week starts on.
pub const WEEK_START: Weekday = Weekday::Tue;

/// A seven-day window in a fixed UTC offset, inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl WeekWindow {
    /// Whether `date`, taken as local midnight, falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        let midnight = local_midnight(date, *self.start.offset());
        midnight >= self.start && midnight <= self.end
    }
}

/// Compute the window containing `now`, as seen in `offset`.
pub fn week_window(now: DateTime<Utc>, offset: FixedOffset) -> WeekWindow {
    let today = now.with_timezone(&offset).date_naive();
    let days_back = (7 + today.weekday().num_days_from_monday()
        - WEEK_START.num_days_from_monday())
        % 7;
    let start = local_midnight(today - Duration::days(days_back as i64), offset);
    let end = start + Duration::days(7) - Duration::seconds(1);
    WeekWindow { start, end }
}

/// The window for the current instant.
pub fn current_week(offset: FixedOffset) -> WeekWindow {
    week_window(Utc::now(), offset)
}

fn local_midnight(date: NaiveDate, offset: FixedOffset) -> DateTime<FixedOffset> {
    let local = date.and_time(NaiveTime::MIN);
    let utc = local - Duration::seconds(offset.local_minus_utc() as i64);
    DateTime::from_naive_utc_and_offset(utc, offset)
}
