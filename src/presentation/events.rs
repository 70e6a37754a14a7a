// PresentationEvent - closed set of notifications for the rendering layer

use serde::{Deserialize, Serialize};

use crate::dispatch::MediaCommand;
use crate::graph::{SlideKind, ZoomPoint};

/// Published on every observable presentation change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PresentationEvent {
    SlideChanged {
        node_id: String,
        kind: SlideKind,
    },
    ZoomChanged {
        level: f32,
        point: Option<ZoomPoint>,
    },
    MediaCommand {
        node_id: String,
        command: MediaCommand,
        /// Signed seek for scrub commands, zero for play/pause
        seek_seconds: f32,
    },
    /// Entered slide asks the outer layer to call an endpoint
    ApiActionRequested {
        node_id: String,
        endpoint: String,
        method: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        payload: Option<serde_json::Value>,
    },
    /// No slide can be shown
    NoContent {
        reason: String,
    },
}

impl PresentationEvent {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            PresentationEvent::SlideChanged { .. } => "slide_changed",
            PresentationEvent::ZoomChanged { .. } => "zoom_changed",
            PresentationEvent::MediaCommand { .. } => "media_command",
            PresentationEvent::ApiActionRequested { .. } => "api_action_requested",
            PresentationEvent::NoContent { .. } => "no_content",
        }
    }
}
