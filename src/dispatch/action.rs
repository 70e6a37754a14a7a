// Dispatch actions and rejection reasons

use serde::{Deserialize, Serialize};

use crate::gesture::GestureLabel;
use crate::graph::{GestureEdge, ZoomPoint};

/// Media control on a video slide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MediaCommand {
    PlayPause,
    ScrubForward,
    ScrubBackward,
}

impl MediaCommand {
    pub fn is_scrub(&self) -> bool {
        matches!(self, MediaCommand::ScrubForward | MediaCommand::ScrubBackward)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomDirection {
    In,
    Out,
}

/// The single effect chosen for a sample
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchAction {
    Media {
        gesture: GestureLabel,
        command: MediaCommand,
    },
    Zoom {
        gesture: GestureLabel,
        direction: ZoomDirection,
        point: ZoomPoint,
    },
    Navigate {
        gesture: GestureLabel,
        edge: GestureEdge,
    },
}

impl DispatchAction {
    pub fn gesture(&self) -> GestureLabel {
        match self {
            DispatchAction::Media { gesture, .. }
            | DispatchAction::Zoom { gesture, .. }
            | DispatchAction::Navigate { gesture, .. } => *gesture,
        }
    }

    /// Short name for logs and telemetry
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchAction::Media { .. } => "media",
            DispatchAction::Zoom { .. } => "zoom",
            DispatchAction::Navigate { .. } => "navigate",
        }
    }
}

/// Why a sample produced no action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    /// Calibration owns the sample stream
    Calibrating,
    /// Classifier reported no usable gesture this frame
    NoGesture,
    BelowThreshold { confidence: f32, threshold: f32 },
    /// Same gesture still held since it last fired a one-shot action
    Held,
    /// Media command inside its repeat delay
    Cooldown,
    /// Nothing on the current slide is bound to the gesture
    NoBinding,
}

/// Result of dispatching one sample
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Action(DispatchAction),
    Rejected(RejectReason),
}

impl DispatchOutcome {
    pub fn action(&self) -> Option<&DispatchAction> {
        match self {
            DispatchOutcome::Action(action) => Some(action),
            DispatchOutcome::Rejected(_) => None,
        }
    }

    pub fn is_action(&self) -> bool {
        self.action().is_some()
    }
}
