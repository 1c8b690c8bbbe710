//! Period membership checks for a recurrence policy and a viewing date.
//!
//! Two deliberately distinct questions live here: `is_satisfied` ("has the
//! period containing the viewing date been covered?") and
//! `is_adjacent_or_same` ("do two completions chain with no missed period
//! between them?"). Callers must not substitute one for the other.

use chrono::{Datelike, Duration, NaiveDate};

use crate::calendar::{days_between, last_occurrence_on_or_before};
use crate::habit::RecurrencePolicy;

/// Whether the habit is due on `reference` at all. Used for display
/// grouping, not for satisfaction checks: a `None` policy is never due,
/// a weekly one only on its tracked weekdays.
pub fn is_due(policy: &RecurrencePolicy, reference: NaiveDate) -> bool {
    match policy {
        RecurrencePolicy::Daily => true,
        RecurrencePolicy::Weekly { days } => days.contains(&reference.weekday()),
        RecurrencePolicy::None => false,
    }
}

/// Whether the most recent completion covers the period containing
/// `reference`. No completion at all means unsatisfied, whatever the
/// policy. For weekly policies every tracked checkpoint up to the viewing
/// date must be on or before the last completion; an empty day-set is
/// vacuously satisfied.
pub fn is_satisfied(
    policy: &RecurrencePolicy,
    reference: NaiveDate,
    last_completion: Option<NaiveDate>,
) -> bool {
    let Some(last) = last_completion else {
        return false;
    };
    match policy {
        RecurrencePolicy::Daily => last == reference,
        RecurrencePolicy::Weekly { days } => days
            .iter()
            .all(|&day| last_occurrence_on_or_before(day, reference) <= last),
        RecurrencePolicy::None => true,
    }
}

/// Whether `later` directly follows `earlier` with no missed period in
/// between. Daily periods chain when at most one day apart. Weekly periods
/// chain unless some tracked checkpoint strictly between the two was
/// skipped: the checkpoint one full cycle before `later` must not land
/// after `earlier`.
pub fn is_adjacent_or_same(
    policy: &RecurrencePolicy,
    earlier: NaiveDate,
    later: NaiveDate,
) -> bool {
    match policy {
        RecurrencePolicy::Daily => days_between(earlier, later) <= 1,
        RecurrencePolicy::Weekly { days } => days.iter().all(|&day| {
            let latest = last_occurrence_on_or_before(day, later);
            let previous = last_occurrence_on_or_before(day, latest - Duration::days(1));
            previous <= earlier
        }),
        RecurrencePolicy::None => true,
    }
}
