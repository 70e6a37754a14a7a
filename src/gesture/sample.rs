// GestureSample - one classified video frame
//
// Samples are ephemeral: produced once per processed frame, consumed by
// exactly one of the calibration engine or the dispatcher, never persisted.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::GestureLabel;

/// Top-ranked classifier output for one frame, before validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawClassification {
    pub label: String,
    pub confidence: f32,
}

impl RawClassification {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// A validated gesture observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    pub label: GestureLabel,
    /// Classifier confidence in [0, 1]
    pub confidence: f32,
    pub observed_at: Instant,
}

impl GestureSample {
    pub fn new(label: GestureLabel, confidence: f32, observed_at: Instant) -> Self {
        Self {
            label,
            confidence: confidence.clamp(0.0, 1.0),
            observed_at,
        }
    }

    /// Narrow raw classifier output to a sample
    ///
    /// # Returns
    /// * `Some(GestureSample)` - Known label with a finite confidence
    /// * `None` - "None" category, unknown label, or NaN confidence
    pub fn from_raw(raw: &RawClassification, observed_at: Instant) -> Option<Self> {
        if !raw.confidence.is_finite() {
            return None;
        }
        let label = GestureLabel::parse(&raw.label)?;
        Some(Self::new(label, raw.confidence, observed_at))
    }
}
