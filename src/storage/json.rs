// JsonThresholdStore - thresholds as a pretty-printed JSON file
//
// Writes go to a sibling temp file that is renamed over the target, so a
// crash mid-write never leaves a truncated table behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::calibration::ThresholdTable;
use crate::error::StorageError;
use crate::storage::{require_complete, ThresholdStore};

#[derive(Debug, Clone)]
pub struct JsonThresholdStore {
    path: PathBuf,
}

impl JsonThresholdStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl ThresholdStore for JsonThresholdStore {
    fn load(&self) -> Result<Option<ThresholdTable>, StorageError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::info!("[Storage] No thresholds at {:?}", self.path);
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let table: ThresholdTable = serde_json::from_str(&contents)?;
        let table = require_complete(table)?;
        log::info!("[Storage] Loaded {} thresholds from {:?}", table.len(), self.path);
        Ok(Some(table))
    }

    fn save(&mut self, table: &ThresholdTable) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = serde_json::to_string_pretty(table)?;
        let temp_path = self.temp_path();
        fs::write(&temp_path, contents)?;
        fs::rename(&temp_path, &self.path)?;

        log::debug!("[Storage] Saved {} thresholds to {:?}", table.len(), self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::GestureLabel;

    #[test]
    fn test_missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonThresholdStore::new(dir.path().join("thresholds.json"));
        assert_eq!(store.load(), Ok(None));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("thresholds.json");
        let mut store = JsonThresholdStore::new(&path);

        let mut table = ThresholdTable::uniform(0.55);
        table.insert(GestureLabel::Victory, 0.72);
        store.save(&table).unwrap();

        assert!(path.exists());
        assert!(!store.temp_path().exists());
        assert_eq!(store.load(), Ok(Some(table)));
    }

    #[test]
    fn test_file_uses_wire_labels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thresholds.json");
        let mut store = JsonThresholdStore::new(&path);
        store.save(&ThresholdTable::uniform(0.5)).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["Thumb_Up"], 0.5);
        assert_eq!(raw["Pointing_Up"], 0.5);
    }

    #[test]
    fn test_partial_file_is_incomplete() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thresholds.json");
        fs::write(&path, r#"{"Thumb_Up": 0.5, "Victory": 0.6}"#).unwrap();

        let store = JsonThresholdStore::new(&path);
        match store.load() {
            Err(StorageError::Incomplete { missing }) => {
                assert_eq!(missing.len(), 4);
                assert!(missing.contains(&"Open_Palm".to_string()));
            }
            other => panic!("Expected Incomplete, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("thresholds.json");
        fs::write(&path, "not json").unwrap();

        let store = JsonThresholdStore::new(&path);
        assert!(matches!(store.load(), Err(StorageError::Parse { .. })));
        assert!(store.load_usable().is_none());
    }
}
