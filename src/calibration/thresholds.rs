// ThresholdTable - per-gesture confidence thresholds
//
// Produced by the CalibrationEngine (incrementally and on completion) and
// handed by value to the GestureDispatcher, which never mutates it.
//
// On the wire the table is a flat `{ "Thumb_Up": 0.62, ... }` map. Unknown
// keys and non-finite values are dropped on load rather than rejected, so a
// table written by a newer build with more gestures still loads; whether it
// is usable is decided by `is_complete()`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::CalibrationError;
use crate::gesture::GestureLabel;

/// Confidence threshold per gesture
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, f32>", into = "BTreeMap<String, f32>")]
pub struct ThresholdTable {
    entries: BTreeMap<GestureLabel, f32>,
}

impl ThresholdTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with the same threshold for every gesture
    pub fn uniform(threshold: f32) -> Self {
        let mut table = Self::new();
        for gesture in GestureLabel::ALL {
            table.insert(gesture, threshold);
        }
        table
    }

    /// Record a threshold, clamped to [0, 1]
    pub fn insert(&mut self, gesture: GestureLabel, threshold: f32) {
        self.entries.insert(gesture, threshold.clamp(0.0, 1.0));
    }

    pub fn get(&self, gesture: GestureLabel) -> Option<f32> {
        self.entries.get(&gesture).copied()
    }

    /// Threshold for a gesture, or `default` when the table has no entry
    pub fn threshold_or(&self, gesture: GestureLabel, default: f32) -> f32 {
        self.get(gesture).unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when every enumerated gesture has an entry
    pub fn is_complete(&self) -> bool {
        GestureLabel::ALL
            .iter()
            .all(|gesture| self.entries.contains_key(gesture))
    }

    /// Gestures without an entry, in calibration order
    pub fn missing(&self) -> Vec<GestureLabel> {
        GestureLabel::ALL
            .iter()
            .filter(|gesture| !self.entries.contains_key(gesture))
            .copied()
            .collect()
    }

    /// Accept the table only if it covers every gesture
    pub fn into_complete(self) -> Result<Self, CalibrationError> {
        if self.is_complete() {
            Ok(self)
        } else {
            Err(CalibrationError::IncompleteTable {
                missing: self
                    .missing()
                    .iter()
                    .map(|g| g.as_str().to_string())
                    .collect(),
            })
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (GestureLabel, f32)> + '_ {
        self.entries.iter().map(|(gesture, value)| (*gesture, *value))
    }
}

impl From<BTreeMap<String, f32>> for ThresholdTable {
    fn from(raw: BTreeMap<String, f32>) -> Self {
        let mut table = ThresholdTable::new();
        for (key, value) in raw {
            match GestureLabel::parse(&key) {
                Some(gesture) if value.is_finite() => table.insert(gesture, value),
                _ => log::warn!("[Thresholds] Dropping entry {}={}", key, value),
            }
        }
        table
    }
}

impl From<ThresholdTable> for BTreeMap<String, f32> {
    fn from(table: ThresholdTable) -> Self {
        table
            .entries
            .into_iter()
            .map(|(gesture, value)| (gesture.as_str().to_string(), value))
            .collect()
    }
}
