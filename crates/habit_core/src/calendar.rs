use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Most recent calendar date on or before `reference` that falls on `weekday`.
pub fn last_occurrence_on_or_before(weekday: Weekday, reference: NaiveDate) -> NaiveDate {
    let back = (reference.weekday().num_days_from_sunday() + 7 - weekday.num_days_from_sunday()) % 7;
    reference - Duration::days(i64::from(back))
}

/// Whole-day difference `b - a` computed on calendar dates, so a DST
/// transition between the two can never skew the count.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days()
}
