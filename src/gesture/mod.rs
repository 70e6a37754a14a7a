//! Gesture vocabulary shared by calibration, dispatch and the graph.
//!
//! The classifier adapter speaks in raw `(label, confidence)` strings; this
//! module narrows them to the closed [`GestureLabel`] set and the
//! [`GestureSample`] consumed by the rest of the core.

pub mod label;
pub mod sample;

pub use label::GestureLabel;
pub use sample::{GestureSample, RawClassification};
