// Calibration error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Calibration error code constants
///
/// Error code range: 2001-2004
pub struct CalibrationErrorCodes {}

impl CalibrationErrorCodes {
    /// Sample submitted while no calibration session is running
    pub const NOT_STARTED: i32 = 2001;

    /// Calibration has not reached its terminal state
    pub const NOT_COMPLETE: i32 = 2002;

    /// Threshold table is missing one or more gestures
    pub const INCOMPLETE_TABLE: i32 = 2003;

    /// Calibration configuration is inconsistent
    pub const INVALID_CONFIG: i32 = 2004;
}

/// Log a calibration error with structured context
///
/// The logging is non-blocking and will not panic on failure.
pub fn log_calibration_error(err: &CalibrationError, context: &str) {
    error!(
        "Calibration error in {}: code={}, component=CalibrationEngine, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Calibration-related errors
///
/// Only integration bugs surface here. Samples for the wrong gesture, late
/// samples and samples during the settle pause are dropped silently by the
/// engine instead.
#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// `submit_sample` called before `start`
    NotStarted,

    /// Final table requested before every gesture was calibrated
    NotComplete,

    /// Threshold table lacks entries for the listed gestures
    IncompleteTable { missing: Vec<String> },

    /// Configuration values out of range
    InvalidConfig { reason: String },
}

impl ErrorCode for CalibrationError {
    fn code(&self) -> i32 {
        match self {
            CalibrationError::NotStarted => CalibrationErrorCodes::NOT_STARTED,
            CalibrationError::NotComplete => CalibrationErrorCodes::NOT_COMPLETE,
            CalibrationError::IncompleteTable { .. } => CalibrationErrorCodes::INCOMPLETE_TABLE,
            CalibrationError::InvalidConfig { .. } => CalibrationErrorCodes::INVALID_CONFIG,
        }
    }

    fn message(&self) -> String {
        match self {
            CalibrationError::NotStarted => {
                "Calibration not started. Call start() before submitting samples.".to_string()
            }
            CalibrationError::NotComplete => "Calibration not complete".to_string(),
            CalibrationError::IncompleteTable { missing } => {
                format!("Threshold table missing gestures: {}", missing.join(", "))
            }
            CalibrationError::InvalidConfig { reason } => {
                format!("Invalid calibration config: {}", reason)
            }
        }
    }
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CalibrationError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for CalibrationError {}
