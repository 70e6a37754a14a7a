//! Engine module housing the per-frame gesture loop.
//!
//! `classifier` is the adapter seam to the external gesture classifier,
//! `scheduler` keeps at most one classification in flight, `channels` owns
//! the broadcast channels and `session` ties calibration, dispatch and the
//! presentation together behind a single `tick`.

pub mod channels;
pub mod classifier;
pub mod scheduler;
pub mod session;

pub use channels::{CalibrationUpdate, ChannelHub};
pub use classifier::{
    ClassifierOutput, GestureClassifier, NoisyClassifier, ScriptedClassifier, VideoFrame,
};
pub use scheduler::{FrameScheduler, FrameTick, Resolution};
pub use session::{FrameOutcome, GestureSession, Mode, SessionTick};
