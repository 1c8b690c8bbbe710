//! Persistence for the habit collection.
//!
//! The whole collection travels as one JSON document, a map keyed by habit
//! id. Stores are injected into [`crate::HabitService`], which saves
//! write-through after every mutation.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use parking_lot::Mutex;

use crate::habit::HabitRecord;

pub type HabitMap = HashMap<String, HabitRecord>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub trait HabitStore: Send + Sync {
    fn load(&self) -> Result<HabitMap, StoreError>;
    fn save(&self, habits: &HabitMap) -> Result<(), StoreError>;
}

/// Whole-document JSON file on disk. A missing file loads as an empty
/// collection (first run); saving creates parent directories as needed.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HabitStore for JsonFileStore {
    fn load(&self) -> Result<HabitMap, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(HabitMap::new()),
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, habits: &HabitMap) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(habits)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-process store for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryStore {
    habits: Mutex<HabitMap>,
}

impl HabitStore for MemoryStore {
    fn load(&self) -> Result<HabitMap, StoreError> {
        Ok(self.habits.lock().clone())
    }

    fn save(&self, habits: &HabitMap) -> Result<(), StoreError> {
        *self.habits.lock() = habits.clone();
        Ok(())
    }
}
