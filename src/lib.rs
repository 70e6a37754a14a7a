// Gesture Presenter Core - gesture-to-action decision engine
// Per-user calibration, debounced dispatch and a slide graph state machine

// Module declarations
pub mod calibration;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod fixtures;
pub mod gesture;
pub mod graph;
pub mod presentation;
pub mod storage;
pub mod telemetry;

// Re-exports for convenience
pub use calibration::{CalibrationEngine, ThresholdTable};
pub use config::AppConfig;
pub use dispatch::{DispatchAction, DispatchOutcome, GestureDispatcher, RejectReason};
pub use engine::{ChannelHub, GestureClassifier, GestureSession, Mode, VideoFrame};
pub use gesture::{GestureLabel, GestureSample, RawClassification};
pub use graph::{GestureEdge, SlideNode, StartNodePolicy, WorkflowGraph};
pub use presentation::{PresentationEvent, PresentationStateMachine};
pub use storage::{JsonThresholdStore, MemoryThresholdStore, ThresholdStore};
