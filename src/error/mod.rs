// Error types for the gesture presenter
//
// This module defines typed error enums for calibration, workflow graph
// loading, threshold persistence and the classifier adapter. Each carries
// a numeric code so the rendering layer can branch on failures without
// string matching.
//
// Expected runtime conditions (no gesture this frame, confidence below
// threshold, no binding on the current slide) are not errors and never
// show up here.

mod calibration;
mod classifier;
mod graph;
mod storage;

pub use calibration::{log_calibration_error, CalibrationError, CalibrationErrorCodes};
pub use classifier::{log_classifier_error, ClassifierError, ClassifierErrorCodes};
pub use graph::{log_graph_error, GraphError, GraphErrorCodes};
pub use storage::{log_storage_error, StorageError, StorageErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the core/UI boundary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
