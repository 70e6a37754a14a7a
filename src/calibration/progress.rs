// Progress tracking for calibration workflow
//
// This module provides the snapshot types published to the UI while the
// calibration engine walks through the six gestures.

use serde::{Deserialize, Serialize};

use crate::gesture::GestureLabel;

/// Coarse calibration state, without the per-gesture index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationPhase {
    /// No session running
    Idle,
    /// Collecting samples for the prompted gesture
    AwaitingSample,
    /// Settle pause between gestures
    Paused,
    /// Every gesture calibrated; the engine is inert until restarted
    Complete,
}

/// Reasons for providing calibration guidance to the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationGuidanceReason {
    /// No matching sample accepted for longer than the stall timeout
    Stalled,
}

/// Guidance payload accompanying calibration progress updates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationGuidance {
    /// Gesture currently being prompted
    pub gesture: GestureLabel,
    pub reason: CalibrationGuidanceReason,
    /// Time since the last accepted sample
    pub waited_ms: u64,
}

/// Progress information for the current calibration step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationProgress {
    pub phase: CalibrationPhase,
    /// Gesture being prompted (or just finished, while paused)
    pub current_gesture: Option<GestureLabel>,
    /// Samples collected for the current gesture
    pub samples_collected: usize,
    /// Samples needed per gesture
    pub samples_needed: usize,
    /// Gestures with a recorded threshold
    pub gestures_done: usize,
}

impl CalibrationProgress {
    /// Check if the current gesture has reached its quota
    pub fn is_gesture_complete(&self) -> bool {
        self.samples_collected >= self.samples_needed
    }

    /// Check if entire calibration is complete
    pub fn is_calibration_complete(&self) -> bool {
        self.phase == CalibrationPhase::Complete
    }

    /// Overall progress percentage (0-100) across all gestures
    pub fn percentage(&self) -> u8 {
        let total = GestureLabel::ALL.len() * self.samples_needed;
        if total == 0 {
            return 0;
        }
        let collected = if self.phase == CalibrationPhase::AwaitingSample {
            self.gestures_done * self.samples_needed + self.samples_collected
        } else {
            self.gestures_done * self.samples_needed
        };
        ((collected as f32 / total as f32) * 100.0).min(100.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(phase: CalibrationPhase, collected: usize, done: usize) -> CalibrationProgress {
        CalibrationProgress {
            phase,
            current_gesture: GestureLabel::from_index(done),
            samples_collected: collected,
            samples_needed: 10,
            gestures_done: done,
        }
    }

    #[test]
    fn test_is_gesture_complete() {
        assert!(progress(CalibrationPhase::Paused, 10, 1).is_gesture_complete());
        assert!(!progress(CalibrationPhase::AwaitingSample, 5, 0).is_gesture_complete());
    }

    #[test]
    fn test_percentage() {
        assert_eq!(progress(CalibrationPhase::AwaitingSample, 0, 0).percentage(), 0);
        assert_eq!(progress(CalibrationPhase::AwaitingSample, 0, 3).percentage(), 50);
        assert_eq!(progress(CalibrationPhase::AwaitingSample, 6, 0).percentage(), 10);
        assert_eq!(progress(CalibrationPhase::Complete, 0, 6).percentage(), 100);
    }

    #[test]
    fn test_percentage_zero_needed() {
        let mut p = progress(CalibrationPhase::AwaitingSample, 0, 0);
        p.samples_needed = 0;
        assert_eq!(p.percentage(), 0);
    }
}
