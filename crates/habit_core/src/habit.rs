use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::HabitError;
use crate::period;

pub const DEFAULT_NAME: &str = "New Habit";

/// How often a habit comes due. A weekly policy with an empty day-set is
/// legal and means "never due"; it satisfies and chains vacuously.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "repeat", rename_all = "lowercase")]
pub enum RecurrencePolicy {
    Daily,
    Weekly { days: Vec<Weekday> },
    None,
}

/// Checkpoint recorded whenever the recurrence policy changes: how many
/// due-periods had elapsed as of `anchor_date`. Keeps lifetime percentage
/// accounting stable across retroactive policy edits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Baseline {
    pub anchor_date: NaiveDate,
    pub periods_at_anchor: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HabitRecord {
    pub id: String,
    pub name: String,
    pub created_at: NaiveDate,
    /// Wall-clock reminder, cosmetic only; never actioned by the engine.
    pub reminder_time: NaiveTime,
    pub recurrence: RecurrencePolicy,
    /// Completion ledger: appended in insertion order, removable only from
    /// the tail ("undo the last mark").
    pub completions: Vec<NaiveDate>,
    pub baseline: Baseline,
}

impl HabitRecord {
    /// Fresh record: empty ledger, daily policy, baseline anchored at the
    /// creation date with one period already elapsed (creation day counts).
    pub fn new(id: impl Into<String>, created_at: NaiveDate) -> Self {
        Self {
            id: id.into(),
            name: DEFAULT_NAME.to_string(),
            created_at,
            reminder_time: default_reminder(),
            recurrence: RecurrencePolicy::Daily,
            completions: Vec::new(),
            baseline: Baseline {
                anchor_date: created_at,
                periods_at_anchor: 1,
            },
        }
    }

    pub fn last_completion(&self) -> Option<NaiveDate> {
        self.completions.last().copied()
    }

    /// Whether the period containing `reference` is already covered by the
    /// ledger tail.
    pub fn is_satisfied(&self, reference: NaiveDate) -> bool {
        period::is_satisfied(&self.recurrence, reference, self.last_completion())
    }

    /// Mark or unmark the current period. Returns the new satisfied state.
    ///
    /// Removal only ever touches the ledger tail; appending is refused when
    /// it would land before the tail (a viewing date navigated into the
    /// past of an already-marked day).
    pub fn toggle_completion(&mut self, reference: NaiveDate) -> Result<bool, HabitError> {
        if self.is_satisfied(reference) {
            let Some(tail) = self.last_completion() else {
                return Err(HabitError::InvalidState(format!(
                    "habit {}: period satisfied with an empty ledger",
                    self.id
                )));
            };
            // Undo must remove the entry covering the current period, never
            // a future-dated one left behind by skewed storage.
            if tail > reference {
                return Err(HabitError::InvalidState(format!(
                    "habit {}: ledger tail {tail} lies after the viewing date {reference}",
                    self.id
                )));
            }
            self.completions.pop();
            Ok(false)
        } else {
            if let Some(tail) = self.last_completion() {
                if reference < tail {
                    return Err(HabitError::InvalidArgument(format!(
                        "completion on {reference} predates the ledger tail {tail}"
                    )));
                }
            }
            self.completions.push(reference);
            Ok(true)
        }
    }

    /// Replace the recurrence policy. Completions are retained; the
    /// baseline restarts at the moment of change so percentage accounting
    /// under the new policy begins at 1/1.
    pub fn set_policy(&mut self, policy: RecurrencePolicy, reference: NaiveDate) {
        self.recurrence = policy;
        self.reset_baseline(reference);
    }

    /// Add or remove a tracked weekday on a weekly policy. The ledger is
    /// untouched, but the checkpoint schedule changed, so the baseline
    /// restarts like a full policy replacement.
    pub fn toggle_weekday(
        &mut self,
        weekday: Weekday,
        reference: NaiveDate,
    ) -> Result<(), HabitError> {
        let RecurrencePolicy::Weekly { days } = &mut self.recurrence else {
            return Err(HabitError::InvalidArgument(format!(
                "habit {} does not repeat weekly",
                self.id
            )));
        };
        if let Some(pos) = days.iter().position(|d| *d == weekday) {
            days.remove(pos);
        } else {
            days.push(weekday);
        }
        self.reset_baseline(reference);
        Ok(())
    }

    /// Blank names normalize to the default, matching the save-time
    /// fallback of the card editor.
    pub fn rename(&mut self, name: &str) {
        let trimmed = name.trim();
        self.name = if trimmed.is_empty() {
            DEFAULT_NAME.to_string()
        } else {
            trimmed.to_string()
        };
    }

    pub fn set_reminder(&mut self, time: NaiveTime) {
        self.reminder_time = time;
    }

    /// Sort an out-of-order ledger back into chronological order. Returns
    /// whether anything moved, so the loader can log the repair.
    pub fn repair_ledger(&mut self) -> bool {
        let sorted = self.completions.windows(2).all(|pair| pair[0] <= pair[1]);
        if !sorted {
            self.completions.sort_unstable();
        }
        !sorted
    }

    fn reset_baseline(&mut self, reference: NaiveDate) {
        self.baseline = Baseline {
            anchor_date: reference,
            periods_at_anchor: 1,
        };
    }
}

pub fn default_reminder() -> NaiveTime {
    NaiveTime::from_hms_opt(10, 0, 0).unwrap()
}
