//! Presentation state machine: which slide is showing and how far it is
//! zoomed.
//!
//! The machine is the only writer of [`PresentationState`]. Every change is
//! published as a [`PresentationEvent`] on a broadcast channel that the
//! rendering layer subscribes to.

pub mod events;
pub mod machine;
pub mod state;

pub use events::PresentationEvent;
pub use machine::PresentationStateMachine;
pub use state::{PresentationState, ZoomAnimation};
