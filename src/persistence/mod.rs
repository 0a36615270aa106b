//! Save data persistence
//!
//! The game keeps one small record: best score and the two audio toggles.
//! Storage backends are collaborators; a failure never reaches the tick
//! loop, callers log it and carry on with in-memory values.

#[cfg(target_arch = "wasm32")]
mod local;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

use std::cell::RefCell;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Persisted record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveData {
    pub high_score: u32,
    pub sound_enabled: bool,
    pub music_enabled: bool,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            high_score: 0,
            sound_enabled: true,
            music_enabled: true,
        }
    }
}

impl SaveData {
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("malformed save data: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("write failed: {0}")]
    WriteFailed(String),
}

/// Backend for the save record
pub trait Storage {
    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> Result<Option<SaveData>, PersistenceError>;

    fn save(&self, data: &SaveData) -> Result<(), PersistenceError>;
}

/// Load the record, falling back to defaults on absence or failure
pub fn load_or_default(storage: &dyn Storage) -> SaveData {
    match storage.load() {
        Ok(Some(data)) => {
            log::info!("Loaded save data (high score {})", data.high_score);
            data
        }
        Ok(None) => {
            log::info!("No save data found, starting fresh");
            SaveData::default()
        }
        Err(e) => {
            log::warn!("Ignoring save data: {}", e);
            SaveData::default()
        }
    }
}

/// JSON kept in memory; used natively and in tests
#[derive(Debug, Default)]
pub struct MemoryStorage {
    json: RefCell<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with raw text, e.g. a corrupted record
    pub fn with_raw(json: impl Into<String>) -> Self {
        Self {
            json: RefCell::new(Some(json.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.json.borrow().clone()
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<SaveData>, PersistenceError> {
        self.json
            .borrow()
            .as_deref()
            .map(SaveData::from_json)
            .transpose()
    }

    fn save(&self, data: &SaveData) -> Result<(), PersistenceError> {
        *self.json.borrow_mut() = Some(data.to_json()?);
        Ok(())
    }
}

/// Two backends in priority order. `primary` is tried first; the
/// `secondary` is used when it fails or has nothing stored.
#[derive(Debug)]
pub struct FallbackStorage<P, S> {
    primary: P,
    secondary: S,
}

impl<P: Storage, S: Storage> FallbackStorage<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }
}

impl<P: Storage, S: Storage> Storage for FallbackStorage<P, S> {
    fn load(&self) -> Result<Option<SaveData>, PersistenceError> {
        match self.primary.load() {
            Ok(Some(data)) => return Ok(Some(data)),
            Ok(None) => {}
            Err(e) => log::warn!("Primary storage load failed, falling back: {}", e),
        }
        self.secondary.load()
    }

    fn save(&self, data: &SaveData) -> Result<(), PersistenceError> {
        match self.primary.save(data) {
            Ok(()) => Ok(()),
            Err(e) => {
                log::warn!("Primary storage save failed, falling back: {}", e);
                self.secondary.save(data)
            }
        }
    }
}

/// Backend used when no storage exists
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStorage;

impl Storage for NullStorage {
    fn load(&self) -> Result<Option<SaveData>, PersistenceError> {
        Ok(None)
    }

    fn save(&self, _data: &SaveData) -> Result<(), PersistenceError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn json_uses_camel_case() {
        let json = SaveData {
            high_score: 12,
            sound_enabled: false,
            music_enabled: true,
        }
        .to_json()
        .unwrap();
        assert!(json.contains("\"highScore\":12"));
        assert!(json.contains("\"soundEnabled\":false"));
        assert!(json.contains("\"musicEnabled\":true"));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let data = SaveData::from_json(r#"{"highScore":5}"#).unwrap();
        assert_eq!(data.high_score, 5);
        assert!(data.sound_enabled);
        assert!(data.music_enabled);

        assert_eq!(SaveData::from_json("{}").unwrap(), SaveData::default());
    }

    #[test]
    fn empty_storage_loads_none() {
        let storage = MemoryStorage::new();
        assert!(storage.load().unwrap().is_none());
        assert_eq!(load_or_default(&storage), SaveData::default());
    }

    #[test]
    fn malformed_data_is_reported_and_defaulted() {
        let storage = MemoryStorage::with_raw("{not json");
        assert!(matches!(storage.load(), Err(PersistenceError::Malformed(_))));
        assert_eq!(load_or_default(&storage), SaveData::default());
    }

    #[test]
    fn null_storage_accepts_everything() {
        let storage = NullStorage;
        storage.save(&SaveData::default()).unwrap();
        assert!(storage.load().unwrap().is_none());
    }

    struct Unreachable;

    impl Storage for Unreachable {
        fn load(&self) -> Result<Option<SaveData>, PersistenceError> {
            Err(PersistenceError::Unavailable("offline".into()))
        }

        fn save(&self, _data: &SaveData) -> Result<(), PersistenceError> {
            Err(PersistenceError::WriteFailed("offline".into()))
        }
    }

    fn record(high_score: u32) -> SaveData {
        SaveData {
            high_score,
            ..SaveData::default()
        }
    }

    #[test]
    fn failing_primary_falls_back_to_secondary() {
        let storage = FallbackStorage::new(Unreachable, MemoryStorage::new());
        assert!(storage.load().unwrap().is_none());

        storage.save(&record(11)).unwrap();
        assert_eq!(storage.load().unwrap(), Some(record(11)));
        assert!(storage.secondary.raw().is_some());
    }

    #[test]
    fn working_primary_takes_precedence() {
        let primary = MemoryStorage::new();
        primary.save(&record(20)).unwrap();
        let secondary = MemoryStorage::new();
        secondary.save(&record(5)).unwrap();

        let storage = FallbackStorage::new(primary, secondary);
        assert_eq!(storage.load().unwrap(), Some(record(20)));

        storage.save(&record(21)).unwrap();
        assert_eq!(storage.primary.load().unwrap(), Some(record(21)));
        assert_eq!(storage.secondary.load().unwrap(), Some(record(5)));
    }

    #[test]
    fn empty_primary_reads_secondary() {
        let secondary = MemoryStorage::new();
        secondary.save(&record(3)).unwrap();
        let storage = FallbackStorage::new(MemoryStorage::new(), secondary);
        assert_eq!(storage.load().unwrap(), Some(record(3)));
    }

    proptest! {
        #[test]
        fn load_returns_what_was_saved(high_score in any::<u32>(), sound in any::<bool>(), music in any::<bool>()) {
            let data = SaveData { high_score, sound_enabled: sound, music_enabled: music };
            let storage = MemoryStorage::new();
            storage.save(&data).unwrap();
            prop_assert_eq!(storage.load().unwrap(), Some(data));
        }
    }
}
