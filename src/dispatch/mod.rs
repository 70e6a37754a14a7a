//! Gesture dispatch: one live sample in, at most one action out.
//!
//! The dispatcher owns no presentation state. It reads the current slide's
//! [`SlideActions`](crate::graph::SlideActions), applies thresholds, hold
//! debouncing and media cooldowns, and returns a [`DispatchOutcome`] that
//! the presentation state machine applies.

pub mod action;
pub mod dispatcher;

pub use action::{DispatchAction, DispatchOutcome, MediaCommand, RejectReason, ZoomDirection};
pub use dispatcher::GestureDispatcher;
