// Classifier adapter error types and constants

use crate::error::ErrorCode;
use log::warn;
use std::fmt;

/// Classifier error code constants
///
/// Error code range: 5001-5002
pub struct ClassifierErrorCodes {}

impl ClassifierErrorCodes {
    /// Classifier backend not ready (model loading, camera closed)
    pub const UNAVAILABLE: i32 = 5001;

    /// Classification of a frame failed
    pub const FAILED: i32 = 5002;
}

/// Log a classifier error with structured context
///
/// Logged at warn level: a failed frame is treated as "no gesture" and the
/// loop carries on.
pub fn log_classifier_error(err: &ClassifierError, context: &str) {
    warn!(
        "Classifier error in {}: code={}, component=GestureClassifier, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Errors a classifier adapter may report for one frame
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// Backend cannot classify right now
    Unavailable { reason: String },

    /// Classification of this frame failed
    Failed { reason: String },
}

impl ErrorCode for ClassifierError {
    fn code(&self) -> i32 {
        match self {
            ClassifierError::Unavailable { .. } => ClassifierErrorCodes::UNAVAILABLE,
            ClassifierError::Failed { .. } => ClassifierErrorCodes::FAILED,
        }
    }

    fn message(&self) -> String {
        match self {
            ClassifierError::Unavailable { reason } => {
                format!("Gesture classifier unavailable: {}", reason)
            }
            ClassifierError::Failed { reason } => format!("Frame classification failed: {}", reason),
        }
    }
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ClassifierError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for ClassifierError {}
