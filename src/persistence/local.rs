//! Browser LocalStorage backend

use super::{PersistenceError, SaveData, Storage};

/// Save record in `window.localStorage`
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl LocalStorage {
    const STORAGE_KEY: &'static str = "flappyCrocoData";

    fn storage() -> Result<web_sys::Storage, PersistenceError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| PersistenceError::Unavailable("localStorage".into()))
    }
}

impl Storage for LocalStorage {
    fn load(&self) -> Result<Option<SaveData>, PersistenceError> {
        let storage = Self::storage()?;
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => SaveData::from_json(&json).map(Some),
            Ok(None) => Ok(None),
            Err(e) => Err(PersistenceError::Unavailable(format!("{:?}", e))),
        }
    }

    fn save(&self, data: &SaveData) -> Result<(), PersistenceError> {
        let json = data.to_json()?;
        Self::storage()?
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| PersistenceError::WriteFailed(format!("{:?}", e)))?;
        log::info!("Save data written (high score {})", data.high_score);
        Ok(())
    }
}
