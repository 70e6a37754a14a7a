//! Metric event types exposed to the CLI and any subscriber of the
//! telemetry broadcast.

use serde::{Deserialize, Serialize};

use crate::dispatch::RejectReason;
use crate::gesture::GestureLabel;

/// Per-frame and per-decision metrics of a gesture session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum MetricEvent {
    /// Live sample that produced no action
    SampleRejected {
        gesture: Option<GestureLabel>,
        reason: RejectReason,
    },
    ActionDispatched {
        gesture: GestureLabel,
        action: String,
        node_id: String,
    },
    /// Tick dropped because a classification was still in flight
    FrameSkipped { skipped_total: u64 },
    /// Classifier error, treated as "no gesture" for the frame
    ClassifierFailed { reason: String },
    ThresholdUpdated {
        gesture: GestureLabel,
        threshold: f32,
        complete: bool,
    },
}

impl MetricEvent {
    /// Stable key used for counters
    pub fn name(&self) -> &'static str {
        match self {
            MetricEvent::SampleRejected { .. } => "sample_rejected",
            MetricEvent::ActionDispatched { .. } => "action_dispatched",
            MetricEvent::FrameSkipped { .. } => "frame_skipped",
            MetricEvent::ClassifierFailed { .. } => "classifier_failed",
            MetricEvent::ThresholdUpdated { .. } => "threshold_updated",
        }
    }
}
