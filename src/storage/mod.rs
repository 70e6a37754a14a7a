//! Threshold persistence.
//!
//! A store holds one flat `{label: threshold}` table. Writes overwrite the
//! whole table (single writer); loads only hand back tables covering every
//! gesture, anything partial is reported as [`StorageError::Incomplete`] so
//! the caller forces a recalibration.

pub mod json;
pub mod memory;

pub use json::JsonThresholdStore;
pub use memory::MemoryThresholdStore;

use crate::calibration::ThresholdTable;
use crate::error::{log_storage_error, StorageError};

/// Load/save seam for persisted thresholds
pub trait ThresholdStore {
    /// Read the stored table
    ///
    /// # Returns
    /// * `Ok(Some(table))` - Complete table
    /// * `Ok(None)` - Nothing stored yet
    /// * `Err(StorageError::Incomplete)` - Stored table misses gestures
    fn load(&self) -> Result<Option<ThresholdTable>, StorageError>;

    /// Overwrite the stored table; partial tables are allowed
    fn save(&mut self, table: &ThresholdTable) -> Result<(), StorageError>;

    /// Complete table if one is stored, logging and swallowing failures
    fn load_usable(&self) -> Option<ThresholdTable> {
        match self.load() {
            Ok(table) => table,
            Err(err) => {
                log_storage_error(&err, "load_usable");
                None
            }
        }
    }
}

/// Reject tables that do not cover every gesture
pub(crate) fn require_complete(table: ThresholdTable) -> Result<ThresholdTable, StorageError> {
    if table.is_complete() {
        Ok(table)
    } else {
        Err(StorageError::Incomplete {
            missing: table
                .missing()
                .iter()
                .map(|gesture| gesture.as_str().to_string())
                .collect(),
        })
    }
}
