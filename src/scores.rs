use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage key holding the whole score list
pub const SCORES_KEY: &str = "numtap_scores";
/// Entries kept after every insertion
pub const MAX_SCORES: usize = 50;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("score store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("score list could not be encoded: {0}")]
    Json(#[from] serde_json::Error),
}

/// String-keyed store with whole-value replace as its only write primitive
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        // readers only ever see a complete file
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// In-memory store for tests and headless runs
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A persisted finishing time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub mode_key: String,
    pub elapsed_seconds: f64,
    pub date: String,
}

impl ScoreRecord {
    /// Record dated today (local time)
    pub fn today(mode_key: impl Into<String>, elapsed_seconds: f64) -> Self {
        Self {
            mode_key: mode_key.into(),
            elapsed_seconds,
            date: Local::now().format("%Y/%m/%d").to_string(),
        }
    }
}

/// What a single insertion did to the board
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Insertion {
    pub previous_best: Option<f64>,
    pub is_new_record: bool,
}

/// Fastest times across every mode, ascending and capped at [`MAX_SCORES`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreBoard {
    records: Vec<ScoreRecord>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from arbitrary records, restoring the ordering and cap
    pub fn from_records(mut records: Vec<ScoreRecord>) -> Self {
        records.retain(|r| r.elapsed_seconds.is_finite() && r.elapsed_seconds > 0.0);
        sort_ascending(&mut records);
        records.truncate(MAX_SCORES);
        Self { records }
    }

    /// Read the list from `store`. Missing or malformed data yields an empty board.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let Some(raw) = store.get(SCORES_KEY) else {
            log::info!("no saved scores, starting fresh");
            return Self::new();
        };

        match serde_json::from_str::<Vec<ScoreRecord>>(&raw) {
            Ok(records) => {
                let board = Self::from_records(records);
                log::info!("loaded {} scores", board.len());
                board
            }
            Err(e) => {
                log::warn!("ignoring malformed score data: {}", e);
                Self::new()
            }
        }
    }

    /// Overwrite the stored list with this board
    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.records)?;
        store.set(SCORES_KEY, &json)
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Lowest time recorded under `mode_key`
    pub fn best_for(&self, mode_key: &str) -> Option<f64> {
        self.records
            .iter()
            .find(|r| r.mode_key == mode_key)
            .map(|r| r.elapsed_seconds)
    }

    /// Whether `elapsed` would beat the current best for `mode_key`
    pub fn is_new_record(&self, mode_key: &str, elapsed: f64) -> bool {
        match self.best_for(mode_key) {
            Some(best) => elapsed < best,
            None => true,
        }
    }

    /// Add `record`, keeping the list sorted and capped. The record check is
    /// made against the board as it was before the insertion.
    pub fn insert(&mut self, record: ScoreRecord) -> Insertion {
        let previous_best = self.best_for(&record.mode_key);
        let is_new_record = self.is_new_record(&record.mode_key, record.elapsed_seconds);

        self.records.push(record);
        sort_ascending(&mut self.records);
        self.records.truncate(MAX_SCORES);

        Insertion {
            previous_best,
            is_new_record,
        }
    }
}

// stable, so equal times keep insertion order
fn sort_ascending(records: &mut [ScoreRecord]) {
    records.sort_by(|a, b| {
        a.elapsed_seconds
            .partial_cmp(&b.elapsed_seconds)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
