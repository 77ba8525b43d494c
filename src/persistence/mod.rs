//! Record collection persistence
//!
//! Features:
//! - Single JSON array under one storage key
//! - Grades accepted as numbers or numeric text on load
//! - Corruption detection and recovery (corrupt blob -> empty collection)
//! - Write-through saves, last writer wins

mod memory;

pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{CorruptState, StorageError};
use crate::record::Record;
use crate::validate::validate_record;

/// Textual key-value storage (LocalStorage on web)
pub trait KeyValueStore {
    /// Read a slot. `Ok(None)` when the key is absent.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite a slot unconditionally
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Shared stores behave like the underlying store
impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

/// Grade as found on disk
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredGrade {
    Number(f64),
    Text(String),
}

impl StoredGrade {
    fn coerce(&self) -> Option<f64> {
        match self {
            StoredGrade::Number(n) => Some(*n),
            StoredGrade::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Entry shape accepted on load
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecord {
    name: String,
    #[serde(default)]
    last_name: Option<String>,
    subject: String,
    grade: StoredGrade,
}

/// Result of decoding a stored blob
#[derive(Debug, Default, PartialEq)]
pub struct Decoded {
    pub records: Vec<Record>,
    /// Raw entries that are malformed or invalid under the active profile
    pub held_back: Vec<serde_json::Value>,
}

impl Decoded {
    pub fn skipped(&self) -> usize {
        self.held_back.len()
    }
}

/// Decode a stored blob, holding back entries that do not hold a valid record
pub fn decode(json: &str, config: &Config) -> Result<Decoded, CorruptState> {
    let entries: Vec<serde_json::Value> =
        serde_json::from_str(json).map_err(|e| CorruptState(e.to_string()))?;

    let mut decoded = Decoded::default();
    for entry in entries {
        match decode_entry(&entry, config) {
            Some(record) => decoded.records.push(record),
            None => decoded.held_back.push(entry),
        }
    }
    Ok(decoded)
}

fn decode_entry(entry: &serde_json::Value, config: &Config) -> Option<Record> {
    let stored = StoredRecord::deserialize(entry).ok()?;
    let record = Record {
        name: stored.name,
        last_name: stored.last_name.filter(|_| config.has_last_name_field),
        subject: stored.subject,
        grade: stored.grade.coerce()?,
    };
    validate_record(&record, config).ok()?;
    Some(record)
}

/// One element of the stored array
#[derive(Serialize)]
#[serde(untagged)]
enum Entry<'a> {
    Record(&'a Record),
    Raw(&'a serde_json::Value),
}

/// Encode the collection for storage, followed by any held-back raw entries
pub fn encode(records: &[Record], held_back: &[serde_json::Value]) -> Result<String, StorageError> {
    let entries: Vec<Entry<'_>> = records
        .iter()
        .map(Entry::Record)
        .chain(held_back.iter().map(Entry::Raw))
        .collect();
    Ok(serde_json::to_string(&entries)?)
}

/// Loads and saves the record collection in one storage slot.
///
/// Entries the active profile cannot read are kept and written back after
/// the collection on every save, so opening a slot under a different
/// profile never erases them.
pub struct Repository<S> {
    storage: S,
    key: String,
    held_back: Vec<serde_json::Value>,
}

impl<S: KeyValueStore> Repository<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            held_back: Vec::new(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Slot receiving a copy of a blob that could not be parsed at all
    pub fn backup_key(&self) -> String {
        format!("{}.corrupt", self.key)
    }

    /// Entries held back by the last load
    pub fn held_back(&self) -> &[serde_json::Value] {
        &self.held_back
    }

    /// Load the collection. Never fails: absent, unreadable or corrupt
    /// state yields an empty collection.
    pub fn load(&mut self, config: &Config) -> Vec<Record> {
        self.held_back.clear();
        let json = match self.storage.get_item(&self.key) {
            Ok(Some(json)) => json,
            Ok(None) => {
                log::info!("No saved records in '{}', starting fresh", self.key);
                return Vec::new();
            }
            Err(e) => {
                log::error!("Failed to read saved records from '{}': {}", self.key, e);
                return Vec::new();
            }
        };

        match decode(&json, config) {
            Ok(decoded) => {
                if decoded.skipped() > 0 {
                    log::warn!(
                        "Holding back {} saved entries this profile cannot read",
                        decoded.skipped()
                    );
                }
                log::info!("Loaded {} records from '{}'", decoded.records.len(), self.key);
                self.held_back = decoded.held_back;
                decoded.records
            }
            Err(e) => {
                let backup = self.backup_key();
                match self.storage.set_item(&backup, &json) {
                    Ok(()) => log::warn!("{}; copied to '{}', starting empty", e, backup),
                    Err(write) => log::error!("{}; backup to '{}' failed: {}", e, backup, write),
                }
                Vec::new()
            }
        }
    }

    /// Overwrite the slot with the full collection and the held-back entries
    pub fn save(&self, records: &[Record]) -> Result<(), StorageError> {
        let json = encode(records, &self.held_back)?;
        self.storage.set_item(&self.key, &json)?;
        log::debug!("Records saved to '{}' ({} entries)", self.key, records.len());
        Ok(())
    }
}
