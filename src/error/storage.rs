// Threshold persistence error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Storage error code constants
///
/// Error code range: 4001-4003
pub struct StorageErrorCodes {}

impl StorageErrorCodes {
    /// Reading or writing the backing medium failed
    pub const IO: i32 = 4001;

    /// Stored payload is not a threshold table
    pub const PARSE: i32 = 4002;

    /// Stored table lacks one or more gestures
    pub const INCOMPLETE: i32 = 4003;
}

/// Log a storage error with structured context
pub fn log_storage_error(err: &StorageError, context: &str) {
    error!(
        "Storage error in {}: code={}, component=ThresholdStore, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Errors raised by threshold stores
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// IO failure on the backing medium
    Io { reason: String },

    /// Payload could not be decoded
    Parse { reason: String },

    /// Payload decoded but does not cover every gesture
    Incomplete { missing: Vec<String> },
}

impl ErrorCode for StorageError {
    fn code(&self) -> i32 {
        match self {
            StorageError::Io { .. } => StorageErrorCodes::IO,
            StorageError::Parse { .. } => StorageErrorCodes::PARSE,
            StorageError::Incomplete { .. } => StorageErrorCodes::INCOMPLETE,
        }
    }

    fn message(&self) -> String {
        match self {
            StorageError::Io { reason } => format!("Threshold storage IO failed: {}", reason),
            StorageError::Parse { reason } => {
                format!("Stored thresholds could not be parsed: {}", reason)
            }
            StorageError::Incomplete { missing } => format!(
                "Stored thresholds incomplete, recalibration required (missing: {})",
                missing.join(", ")
            ),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StorageError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for StorageError {}

/// Convert from std::io::Error to StorageError
impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Parse {
            reason: err.to_string(),
        }
    }
}
