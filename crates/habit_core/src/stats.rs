//! Lifetime completion-rate accounting.
//!
//! Percentages are counted from the habit's baseline checkpoint, not from
//! creation: the baseline records how many due-periods had elapsed when the
//! recurrence policy last changed, so retroactive policy edits cannot
//! corrupt historical math. Queries here are pure; baselines move only when
//! a policy mutator runs.

use chrono::{Duration, NaiveDate};

use crate::calendar::{days_between, last_occurrence_on_or_before};
use crate::error::HabitError;
use crate::habit::{HabitRecord, RecurrencePolicy};

/// Knobs for percentage reporting.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateOptions {
    /// Cap reported percentages at 100 when a period was completed more
    /// than once. Off by default: over-completion is reported as-is.
    pub clamp_overcompletion: bool,
}

/// Number of due-periods from the baseline anchor (exclusive) through
/// `reference` (inclusive), plus the periods already banked at the anchor.
pub fn elapsed_periods(habit: &HabitRecord, reference: NaiveDate) -> Result<u32, HabitError> {
    let baseline = habit.baseline;
    let anchor = baseline.anchor_date;
    if days_between(anchor, reference) < 0 {
        return Err(HabitError::InvalidState(format!(
            "habit {}: baseline anchor {anchor} lies after the viewing date {reference}",
            habit.id
        )));
    }
    match &habit.recurrence {
        RecurrencePolicy::Daily | RecurrencePolicy::None => {
            let days = u32::try_from(days_between(anchor, reference)).map_err(|_| {
                HabitError::InvalidState(format!(
                    "habit {}: negative elapsed days from {anchor}",
                    habit.id
                ))
            })?;
            Ok(baseline.periods_at_anchor + days)
        }
        RecurrencePolicy::Weekly { days } => {
            let mut total = baseline.periods_at_anchor;
            for &day in days {
                // Walk back by whole weeks from the latest occurrence until
                // passing the anchor; each stop is one elapsed checkpoint.
                let mut occurrence = last_occurrence_on_or_before(day, reference);
                while occurrence > anchor {
                    total += 1;
                    occurrence -= Duration::days(7);
                }
            }
            Ok(total)
        }
    }
}

/// Lifetime completion percentage, rounded to the nearest whole point. May
/// exceed 100 for over-completed habits unless clamping is requested.
pub fn completion_percent(
    habit: &HabitRecord,
    reference: NaiveDate,
    options: RateOptions,
) -> Result<u32, HabitError> {
    let elapsed = elapsed_periods(habit, reference)?;
    if elapsed == 0 {
        return Ok(0);
    }
    let ratio = habit.completions.len() as f64 / f64::from(elapsed);
    let percent = (100.0 * ratio).round() as u32;
    if options.clamp_overcompletion {
        Ok(percent.min(100))
    } else {
        Ok(percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::Baseline;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn brand_new_daily_habit_reports_zero_then_hundred() {
        let mut habit = HabitRecord::new("h", date(2025, 1, 1));
        let today = date(2025, 1, 1);
        assert_eq!(
            completion_percent(&habit, today, RateOptions::default()).unwrap(),
            0
        );
        habit.toggle_completion(today).unwrap();
        assert_eq!(
            completion_percent(&habit, today, RateOptions::default()).unwrap(),
            100
        );
    }

    #[test]
    fn daily_elapsed_grows_one_per_day() {
        let habit = HabitRecord::new("h", date(2025, 1, 1));
        assert_eq!(elapsed_periods(&habit, date(2025, 1, 1)).unwrap(), 1);
        assert_eq!(elapsed_periods(&habit, date(2025, 1, 5)).unwrap(), 5);
    }

    #[test]
    fn weekly_monday_habit_hits_fifty_percent_on_the_second_monday() {
        // Created on a Monday, tracking Mondays. The following Monday two
        // checkpoints have elapsed (creation day plus the new one).
        let creation = date(2025, 10, 20);
        let mut habit = HabitRecord::new("h", creation);
        habit.set_policy(
            RecurrencePolicy::Weekly {
                days: vec![Weekday::Mon],
            },
            creation,
        );
        let next_monday = date(2025, 10, 27);
        assert_eq!(elapsed_periods(&habit, next_monday).unwrap(), 2);
        assert_eq!(
            completion_percent(&habit, next_monday, RateOptions::default()).unwrap(),
            0
        );
        habit.toggle_completion(next_monday).unwrap();
        assert_eq!(
            completion_percent(&habit, next_monday, RateOptions::default()).unwrap(),
            50
        );
    }

    #[test]
    fn weekly_elapsed_sums_every_tracked_weekday() {
        // Anchor Monday 2025-10-20, viewing Sunday 2025-11-02. Checkpoints
        // strictly after the anchor: Mondays 10/27 and Thursdays 10/23,
        // 10/30 — three plus the banked period.
        let mut habit = HabitRecord::new("h", date(2025, 10, 20));
        habit.set_policy(
            RecurrencePolicy::Weekly {
                days: vec![Weekday::Mon, Weekday::Thu],
            },
            date(2025, 10, 20),
        );
        assert_eq!(elapsed_periods(&habit, date(2025, 11, 2)).unwrap(), 4);
    }

    #[test]
    fn weekday_toggle_restarts_accounting_at_one_of_one() {
        let creation = date(2025, 10, 6);
        let mut habit = HabitRecord::new("h", creation);
        habit.set_policy(
            RecurrencePolicy::Weekly {
                days: vec![Weekday::Mon, Weekday::Thu],
            },
            creation,
        );
        habit.toggle_completion(date(2025, 10, 9)).unwrap();
        // Dropping Thursday later must not retroactively unsatisfy history,
        // but accounting starts over from the edit.
        habit
            .toggle_weekday(Weekday::Thu, date(2025, 10, 13))
            .unwrap();
        assert_eq!(elapsed_periods(&habit, date(2025, 10, 13)).unwrap(), 1);
    }

    #[test]
    fn overcompletion_exceeds_hundred_unless_clamped() {
        let mut habit = HabitRecord::new("h", date(2025, 1, 1));
        // Two completions against a single elapsed period, as storage
        // written by older builds can contain.
        habit.completions = vec![date(2025, 1, 1), date(2025, 1, 1)];
        let reference = date(2025, 1, 1);
        assert_eq!(
            completion_percent(&habit, reference, RateOptions::default()).unwrap(),
            200
        );
        let clamped = RateOptions {
            clamp_overcompletion: true,
        };
        assert_eq!(completion_percent(&habit, reference, clamped).unwrap(), 100);
    }

    #[test]
    fn future_anchor_is_surfaced_as_corruption() {
        let mut habit = HabitRecord::new("h", date(2025, 1, 10));
        habit.baseline = Baseline {
            anchor_date: date(2025, 1, 10),
            periods_at_anchor: 1,
        };
        let err = elapsed_periods(&habit, date(2025, 1, 5)).unwrap_err();
        assert!(matches!(err, HabitError::InvalidState(_)));
    }
}
