// In-memory threshold store

use crate::calibration::ThresholdTable;
use crate::error::StorageError;
use crate::storage::{require_complete, ThresholdStore};

#[derive(Debug, Clone, Default)]
pub struct MemoryThresholdStore {
    table: Option<ThresholdTable>,
    saves: usize,
}

impl MemoryThresholdStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a table
    pub fn with_table(table: ThresholdTable) -> Self {
        Self {
            table: Some(table),
            saves: 0,
        }
    }

    /// Raw stored table, complete or not
    pub fn stored(&self) -> Option<&ThresholdTable> {
        self.table.as_ref()
    }

    /// Number of `save` calls so far
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl ThresholdStore for MemoryThresholdStore {
    fn load(&self) -> Result<Option<ThresholdTable>, StorageError> {
        self.table.clone().map(require_complete).transpose()
    }

    fn save(&mut self, table: &ThresholdTable) -> Result<(), StorageError> {
        self.table = Some(table.clone());
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::GestureLabel;

    #[test]
    fn test_empty_store_loads_none() {
        let store = MemoryThresholdStore::new();
        assert_eq!(store.load(), Ok(None));
        assert!(store.load_usable().is_none());
    }

    #[test]
    fn test_partial_table_is_incomplete() {
        let mut table = ThresholdTable::new();
        table.insert(GestureLabel::ThumbUp, 0.5);
        let mut store = MemoryThresholdStore::new();
        store.save(&table).unwrap();

        match store.load() {
            Err(StorageError::Incomplete { missing }) => assert_eq!(missing.len(), 5),
            other => panic!("Expected Incomplete, got {:?}", other),
        }
        assert!(store.load_usable().is_none());
        assert_eq!(store.stored(), Some(&table));
    }

    #[test]
    fn test_complete_table_loads() {
        let store = MemoryThresholdStore::with_table(ThresholdTable::uniform(0.6));
        assert_eq!(store.load(), Ok(Some(ThresholdTable::uniform(0.6))));
    }
}
