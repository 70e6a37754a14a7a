// PresentationState - current slide plus zoom

use serde::{Deserialize, Serialize};

use crate::dispatch::ZoomDirection;
use crate::graph::ZoomPoint;

/// Snapshot of what the audience sees
///
/// `current_node_id` is `None` only in the no-content state.
/// `zoom_point` is set iff a zoom was requested since the last slide change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationState {
    pub current_node_id: Option<String>,
    pub zoom_level: f32,
    pub zoom_point: Option<ZoomPoint>,
}

impl PresentationState {
    pub fn at(node_id: impl Into<String>, zoom_level: f32) -> Self {
        Self {
            current_node_id: Some(node_id.into()),
            zoom_level,
            zoom_point: None,
        }
    }

    pub fn no_content(zoom_level: f32) -> Self {
        Self {
            current_node_id: None,
            zoom_level,
            zoom_point: None,
        }
    }

    pub fn has_content(&self) -> bool {
        self.current_node_id.is_some()
    }
}

/// In-flight zoom ramp; at most one exists at a time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomAnimation {
    pub direction: ZoomDirection,
    pub target: f32,
}

impl ZoomAnimation {
    /// Next level one step toward the target, never overshooting
    pub fn step(&self, level: f32, step: f32) -> f32 {
        match self.direction {
            ZoomDirection::In => (level + step).min(self.target),
            ZoomDirection::Out => (level - step).max(self.target),
        }
    }

    pub fn is_finished(&self, level: f32) -> bool {
        match self.direction {
            ZoomDirection::In => level >= self.target,
            ZoomDirection::Out => level <= self.target,
        }
    }
}
