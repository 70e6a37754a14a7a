// Calibration module - per-user gesture thresholds
//
// This module provides two main components:
// 1. ThresholdTable: confidence thresholds consumed read-only by the dispatcher
// 2. CalibrationEngine: the sample collection state machine that builds them
//
// The calibration workflow:
// 1. Start the engine (AwaitingSample for THUMB UP)
// 2. Feed classified samples; only the prompted gesture counts
// 3. After each gesture's quota, settle for a moment, then prompt the next
// 4. After the sixth gesture the engine emits a complete ThresholdTable

pub mod engine;
pub mod progress;
pub mod thresholds;

pub use engine::{CalibrationEngine, CalibrationStep, IgnoreReason, SampleOutcome};
pub use progress::{
    CalibrationGuidance, CalibrationGuidanceReason, CalibrationPhase, CalibrationProgress,
};
pub use thresholds::ThresholdTable;
