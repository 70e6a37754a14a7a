// SlideNode - one authored slide
//
// Nodes are immutable during playback; the presentation state machine only
// tracks which node is current.

use serde::{Deserialize, Serialize};

use crate::gesture::label::deserialize_lenient;
use crate::gesture::GestureLabel;

/// Zoom anchor in percent of the slide (0-100 on both axes)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomPoint {
    pub x: f32,
    pub y: f32,
}

impl ZoomPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_in_range(&self) -> bool {
        (0.0..=100.0).contains(&self.x) && (0.0..=100.0).contains(&self.y)
    }

    /// Same point forced into [0, 100]
    pub fn clamped(&self) -> Self {
        Self {
            x: self.x.clamp(0.0, 100.0),
            y: self.y.clamp(0.0, 100.0),
        }
    }
}

/// Authored editor coordinates of a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// Gestures bound to media controls of a video slide
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MediaBindings {
    pub play_pause: Option<GestureLabel>,
    pub scrub_forward: Option<GestureLabel>,
    pub scrub_backward: Option<GestureLabel>,
}

/// Slide kind without its content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlideKind {
    Text,
    Image,
    Video,
    ApiAction,
}

fn default_method() -> String {
    "POST".to_string()
}

/// Kind-specific slide content, tagged by `kind` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SlideContent {
    Text {
        #[serde(default)]
        title: String,
        #[serde(default)]
        body: String,
    },
    Image {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    Video {
        url: String,
        #[serde(
            rename = "playPauseGesture",
            default,
            deserialize_with = "deserialize_lenient",
            skip_serializing_if = "Option::is_none"
        )]
        play_pause_gesture: Option<GestureLabel>,
        #[serde(
            rename = "scrubForwardGesture",
            default,
            deserialize_with = "deserialize_lenient",
            skip_serializing_if = "Option::is_none"
        )]
        scrub_forward_gesture: Option<GestureLabel>,
        #[serde(
            rename = "scrubBackwardGesture",
            default,
            deserialize_with = "deserialize_lenient",
            skip_serializing_if = "Option::is_none"
        )]
        scrub_backward_gesture: Option<GestureLabel>,
    },
    /// Slide that asks the outer layer to call an endpoint when entered
    ApiAction {
        endpoint: String,
        #[serde(default = "default_method")]
        method: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        payload: Option<serde_json::Value>,
    },
}

/// One slide of the workflow graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideNode {
    pub id: String,
    #[serde(flatten)]
    pub content: SlideContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom_point: Option<ZoomPoint>,
    #[serde(
        default,
        deserialize_with = "deserialize_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub zoom_in_gesture: Option<GestureLabel>,
    #[serde(
        default,
        deserialize_with = "deserialize_lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub zoom_out_gesture: Option<GestureLabel>,
}

impl SlideNode {
    /// Plain text slide with no zoom configuration
    pub fn text(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: SlideContent::Text {
                title: title.into(),
                body: String::new(),
            },
            position: None,
            zoom_point: None,
            zoom_in_gesture: None,
            zoom_out_gesture: None,
        }
    }

    /// Video slide with media bindings
    pub fn video(id: impl Into<String>, url: impl Into<String>, media: MediaBindings) -> Self {
        Self {
            content: SlideContent::Video {
                url: url.into(),
                play_pause_gesture: media.play_pause,
                scrub_forward_gesture: media.scrub_forward,
                scrub_backward_gesture: media.scrub_backward,
            },
            ..Self::text(id, "")
        }
    }

    pub fn with_zoom(
        mut self,
        point: ZoomPoint,
        zoom_in: Option<GestureLabel>,
        zoom_out: Option<GestureLabel>,
    ) -> Self {
        self.zoom_point = Some(point);
        self.zoom_in_gesture = zoom_in;
        self.zoom_out_gesture = zoom_out;
        self
    }

    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Some(Position { x, y });
        self
    }

    pub fn kind(&self) -> SlideKind {
        match self.content {
            SlideContent::Text { .. } => SlideKind::Text,
            SlideContent::Image { .. } => SlideKind::Image,
            SlideContent::Video { .. } => SlideKind::Video,
            SlideContent::ApiAction { .. } => SlideKind::ApiAction,
        }
    }

    /// Media bindings, only for video slides
    pub fn media_bindings(&self) -> Option<MediaBindings> {
        match &self.content {
            SlideContent::Video {
                play_pause_gesture,
                scrub_forward_gesture,
                scrub_backward_gesture,
                ..
            } => Some(MediaBindings {
                play_pause: *play_pause_gesture,
                scrub_forward: *scrub_forward_gesture,
                scrub_backward: *scrub_backward_gesture,
            }),
            _ => None,
        }
    }

    /// Gestures this node binds outside of its outgoing edges
    pub fn bound_gestures(&self) -> Vec<GestureLabel> {
        let mut gestures = Vec::new();
        if let Some(media) = self.media_bindings() {
            gestures.extend(
                [media.play_pause, media.scrub_forward, media.scrub_backward]
                    .into_iter()
                    .flatten(),
            );
        }
        gestures.extend([self.zoom_in_gesture, self.zoom_out_gesture].into_iter().flatten());
        gestures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_video_node() {
        let json = r#"{
            "id": "clip",
            "kind": "video",
            "url": "intro.mp4",
            "playPauseGesture": "Open_Palm",
            "scrubForwardGesture": "Thumb_Up",
            "zoomPoint": {"x": 25, "y": 75},
            "zoomInGesture": "Victory"
        }"#;
        let node: SlideNode = serde_json::from_str(json).unwrap();

        assert_eq!(node.kind(), SlideKind::Video);
        let media = node.media_bindings().unwrap();
        assert_eq!(media.play_pause, Some(GestureLabel::OpenPalm));
        assert_eq!(media.scrub_forward, Some(GestureLabel::ThumbUp));
        assert_eq!(media.scrub_backward, None);
        assert_eq!(node.zoom_point, Some(ZoomPoint::new(25.0, 75.0)));
        assert_eq!(node.zoom_in_gesture, Some(GestureLabel::Victory));
    }

    #[test]
    fn test_parse_api_action_defaults_method() {
        let json = r#"{"id": "hook", "kind": "apiAction", "endpoint": "https://example.test/next"}"#;
        let node: SlideNode = serde_json::from_str(json).unwrap();
        match node.content {
            SlideContent::ApiAction { method, payload, .. } => {
                assert_eq!(method, "POST");
                assert!(payload.is_none());
            }
            other => panic!("Expected ApiAction, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_gesture_binding_is_unbound() {
        let json = r#"{"id": "a", "kind": "text", "title": "Hi", "zoomInGesture": "Wave"}"#;
        let node: SlideNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.zoom_in_gesture, None);
    }

    #[test]
    fn test_text_node_has_no_media() {
        let node = SlideNode::text("a", "Intro");
        assert!(node.media_bindings().is_none());
        assert!(node.bound_gestures().is_empty());
    }

    #[test]
    fn test_bound_gestures() {
        let node = SlideNode::video(
            "v",
            "clip.mp4",
            MediaBindings {
                play_pause: Some(GestureLabel::OpenPalm),
                ..MediaBindings::default()
            },
        )
        .with_zoom(
            ZoomPoint::new(50.0, 50.0),
            Some(GestureLabel::Victory),
            None,
        );
        assert_eq!(
            node.bound_gestures(),
            vec![GestureLabel::OpenPalm, GestureLabel::Victory]
        );
    }

    #[test]
    fn test_zoom_point_range() {
        assert!(ZoomPoint::new(0.0, 100.0).is_in_range());
        assert!(!ZoomPoint::new(-1.0, 50.0).is_in_range());
        assert_eq!(
            ZoomPoint::new(120.0, -5.0).clamped(),
            ZoomPoint::new(100.0, 0.0)
        );
    }
}
