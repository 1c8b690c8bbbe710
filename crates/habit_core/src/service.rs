use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime, Weekday};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::HabitError;
use crate::habit::{HabitRecord, RecurrencePolicy};
use crate::period;
use crate::stats::{self, RateOptions};
use crate::store::{HabitMap, HabitStore, MemoryStore};
use crate::streak;

/// Per-habit view for a given viewing date: everything a card renderer
/// consumed from the engine in one query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HabitSnapshot {
    pub id: String,
    pub name: String,
    pub reminder_time: NaiveTime,
    pub recurrence: RecurrencePolicy,
    pub due: bool,
    pub satisfied: bool,
    pub streak: Option<u32>,
    pub percent: u32,
}

/// Repository owning the habit collection. Mutators run against a working
/// copy and commit only on success, then persist write-through via the
/// injected store.
pub struct HabitService {
    store: Box<dyn HabitStore>,
    habits: RwLock<HabitMap>,
    rate_options: RateOptions,
}

pub struct HabitServiceBuilder {
    store: Box<dyn HabitStore>,
    rate_options: RateOptions,
}

impl HabitServiceBuilder {
    pub fn new() -> Self {
        Self {
            store: Box::new(MemoryStore::default()),
            rate_options: RateOptions::default(),
        }
    }

    pub fn with_store(mut self, store: Box<dyn HabitStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_rate_options(mut self, options: RateOptions) -> Self {
        self.rate_options = options;
        self
    }

    pub fn build(self) -> Result<HabitService, HabitError> {
        let mut habits = self.store.load()?;
        for habit in habits.values_mut() {
            if habit.repair_ledger() {
                tracing::warn!(id = %habit.id, "repaired out-of-order completion ledger");
            }
        }
        Ok(HabitService {
            store: self.store,
            habits: RwLock::new(habits),
            rate_options: self.rate_options,
        })
    }
}

impl Default for HabitServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HabitService {
    pub fn builder() -> HabitServiceBuilder {
        HabitServiceBuilder::new()
    }

    /// Create a habit with defaults, keyed by the viewing date plus a
    /// per-day counter. Returns the new id.
    pub fn create_habit(&self, reference: NaiveDate) -> Result<String, HabitError> {
        let mut habits = self.habits.write();
        let id = allocate_id(&habits, reference);
        let habit = HabitRecord::new(id.clone(), reference);
        tracing::debug!(%id, %reference, "creating habit");
        habits.insert(id.clone(), habit);
        self.persist(&habits)?;
        Ok(id)
    }

    /// Remove a habit outright. No soft-delete.
    pub fn delete_habit(&self, id: &str) -> Result<(), HabitError> {
        let mut habits = self.habits.write();
        if habits.remove(id).is_none() {
            return Err(unknown_habit(id));
        }
        tracing::debug!(%id, "deleted habit");
        self.persist(&habits)
    }

    pub fn rename(&self, id: &str, name: &str) -> Result<(), HabitError> {
        self.with_habit_mut(id, |habit| {
            habit.rename(name);
            Ok(())
        })
    }

    pub fn set_reminder(&self, id: &str, time: NaiveTime) -> Result<(), HabitError> {
        self.with_habit_mut(id, |habit| {
            habit.set_reminder(time);
            Ok(())
        })
    }

    /// Mark or unmark the period containing `reference`; returns the new
    /// satisfied state.
    pub fn toggle_completion(&self, id: &str, reference: NaiveDate) -> Result<bool, HabitError> {
        self.with_habit_mut(id, |habit| {
            let satisfied = habit.toggle_completion(reference)?;
            tracing::debug!(id = %habit.id, %reference, satisfied, "toggled completion");
            Ok(satisfied)
        })
    }

    pub fn set_policy(
        &self,
        id: &str,
        policy: RecurrencePolicy,
        reference: NaiveDate,
    ) -> Result<(), HabitError> {
        self.with_habit_mut(id, |habit| {
            habit.set_policy(policy, reference);
            tracing::debug!(id = %habit.id, %reference, "recurrence policy replaced");
            Ok(())
        })
    }

    pub fn toggle_weekday(
        &self,
        id: &str,
        weekday: Weekday,
        reference: NaiveDate,
    ) -> Result<(), HabitError> {
        self.with_habit_mut(id, |habit| habit.toggle_weekday(weekday, reference))
    }

    pub fn habit(&self, id: &str) -> Result<HabitRecord, HabitError> {
        self.habits
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| unknown_habit(id))
    }

    /// Every habit's card view as of the viewing date, ordered by id
    /// (which embeds the creation date).
    pub fn snapshot(&self, reference: NaiveDate) -> Result<Vec<HabitSnapshot>, HabitError> {
        let habits = self.habits.read();
        let mut views = Vec::with_capacity(habits.len());
        for habit in habits.values() {
            views.push(HabitSnapshot {
                id: habit.id.clone(),
                name: habit.name.clone(),
                reminder_time: habit.reminder_time,
                recurrence: habit.recurrence.clone(),
                due: period::is_due(&habit.recurrence, reference),
                satisfied: habit.is_satisfied(reference),
                streak: streak::current_streak(habit, reference),
                percent: stats::completion_percent(habit, reference, self.rate_options)?,
            });
        }
        views.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(views)
    }

    fn with_habit_mut<T>(
        &self,
        id: &str,
        mutate: impl FnOnce(&mut HabitRecord) -> Result<T, HabitError>,
    ) -> Result<T, HabitError> {
        let mut habits = self.habits.write();
        let habit = habits.get_mut(id).ok_or_else(|| unknown_habit(id))?;
        // Mutate a working copy so a failure leaves nothing half-applied.
        let mut working = habit.clone();
        let value = mutate(&mut working)?;
        *habit = working;
        self.persist(&habits)?;
        Ok(value)
    }

    fn persist(&self, habits: &HabitMap) -> Result<(), HabitError> {
        self.store.save(habits)?;
        Ok(())
    }
}

fn allocate_id(habits: &HashMap<String, HabitRecord>, reference: NaiveDate) -> String {
    let stem = reference.format("%Y%m%d");
    let mut n = 1u32;
    loop {
        let id = format!("{stem}-{n:02}");
        if !habits.contains_key(&id) {
            return id;
        }
        n += 1;
    }
}

fn unknown_habit(id: &str) -> HabitError {
    HabitError::InvalidArgument(format!("unknown habit id: {id}"))
}
