use chrono::NaiveDate;

use crate::habit::HabitRecord;
use crate::period::is_adjacent_or_same;

/// Length of the consecutive-period run ending at the ledger tail, or
/// `None` when there is no live streak to show.
///
/// The ledger is walked backward, counting pairs that chain with no missed
/// period. A run among past entries is not enough on its own: once the
/// current period itself has been missed (the tail no longer chains to the
/// viewing date) the streak is expired and nothing is shown.
pub fn current_streak(habit: &HabitRecord, reference: NaiveDate) -> Option<u32> {
    let completions = &habit.completions;
    let policy = &habit.recurrence;
    let last = completions.last().copied()?;

    let mut count = 1u32;
    for pair in completions.windows(2).rev() {
        if is_adjacent_or_same(policy, pair[0], pair[1]) {
            count += 1;
        } else {
            break;
        }
    }

    let tail_is_live = is_adjacent_or_same(policy, last, reference);
    if completions.len() >= 2 {
        if !tail_is_live {
            return None;
        }
        let prior = completions[completions.len() - 2];
        if is_adjacent_or_same(policy, prior, last) {
            return Some(count);
        }
    }
    // Single completion, or a run of one after a gap: shown only while the
    // viewing date is still within reach of the tail.
    if tail_is_live {
        Some(count)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::RecurrencePolicy;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn daily_habit(completions: &[NaiveDate]) -> HabitRecord {
        let mut habit = HabitRecord::new("h", date(2025, 1, 1));
        habit.completions = completions.to_vec();
        habit
    }

    #[test]
    fn empty_ledger_has_no_streak() {
        let habit = daily_habit(&[]);
        assert_eq!(current_streak(&habit, date(2025, 1, 1)), None);
    }

    #[test]
    fn consecutive_days_count_up() {
        let habit = daily_habit(&[date(2025, 1, 1), date(2025, 1, 2), date(2025, 1, 3)]);
        assert_eq!(current_streak(&habit, date(2025, 1, 3)), Some(3));
        // Still alive the morning after the last completion.
        assert_eq!(current_streak(&habit, date(2025, 1, 4)), Some(3));
    }

    #[test]
    fn gap_in_the_ledger_resets_the_count() {
        // Jan 3 missed: the Jan 1-2 run no longer counts, Jan 4 stands alone.
        let habit = daily_habit(&[date(2025, 1, 1), date(2025, 1, 2), date(2025, 1, 4)]);
        assert_eq!(current_streak(&habit, date(2025, 1, 4)), Some(1));
    }

    #[test]
    fn missing_the_current_period_expires_the_streak() {
        let habit = daily_habit(&[date(2025, 1, 1), date(2025, 1, 2), date(2025, 1, 3)]);
        assert_eq!(current_streak(&habit, date(2025, 1, 5)), None);
    }

    #[test]
    fn single_completion_streak_expires_too() {
        let habit = daily_habit(&[date(2025, 1, 1)]);
        assert_eq!(current_streak(&habit, date(2025, 1, 1)), Some(1));
        assert_eq!(current_streak(&habit, date(2025, 1, 2)), Some(1));
        assert_eq!(current_streak(&habit, date(2025, 1, 3)), None);
    }

    #[test]
    fn weekly_streak_chains_across_weeks() {
        let mut habit = daily_habit(&[date(2025, 10, 6), date(2025, 10, 13), date(2025, 10, 20)]);
        habit.recurrence = RecurrencePolicy::Weekly {
            days: vec![Weekday::Mon],
        };
        // Viewing the same Monday: three consecutive weekly checkpoints.
        assert_eq!(current_streak(&habit, date(2025, 10, 20)), Some(3));
        // The week after still chains: the Oct 27 checkpoint is the current
        // one and can still be made up.
        assert_eq!(current_streak(&habit, date(2025, 10, 28)), Some(3));
        // By Nov 3 the Oct 27 checkpoint is unreachable and the streak dies.
        assert_eq!(current_streak(&habit, date(2025, 11, 3)), None);
    }
}
