// SlideActions - the gesture bindings active on one slide
//
// Derived from the authored graph for the current slide and handed to the
// dispatcher. Navigation edges keep authored order so that the first
// declared edge wins when several share a gesture.

use crate::dispatch::{MediaCommand, ZoomDirection};
use crate::gesture::GestureLabel;
use crate::graph::{GestureEdge, MediaBindings, ZoomPoint};

/// Zoom configuration of a slide that declares a zoom point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomBinding {
    pub point: ZoomPoint,
    pub zoom_in: Option<GestureLabel>,
    pub zoom_out: Option<GestureLabel>,
}

/// Everything a gesture can trigger on the current slide
#[derive(Debug, Clone, PartialEq)]
pub struct SlideActions<'g> {
    pub node_id: &'g str,
    /// Video slides only
    pub media: Option<MediaBindings>,
    /// Only when the slide declares a zoom point
    pub zoom: Option<ZoomBinding>,
    /// Outgoing edges in authored order
    pub navigation: Vec<&'g GestureEdge>,
}

impl<'g> SlideActions<'g> {
    pub fn media_command(&self, gesture: GestureLabel) -> Option<MediaCommand> {
        let media = self.media?;
        if media.play_pause == Some(gesture) {
            Some(MediaCommand::PlayPause)
        } else if media.scrub_forward == Some(gesture) {
            Some(MediaCommand::ScrubForward)
        } else if media.scrub_backward == Some(gesture) {
            Some(MediaCommand::ScrubBackward)
        } else {
            None
        }
    }

    pub fn zoom_for(&self, gesture: GestureLabel) -> Option<(ZoomDirection, ZoomPoint)> {
        let zoom = self.zoom?;
        if zoom.zoom_in == Some(gesture) {
            Some((ZoomDirection::In, zoom.point))
        } else if zoom.zoom_out == Some(gesture) {
            Some((ZoomDirection::Out, zoom.point))
        } else {
            None
        }
    }

    /// First outgoing edge bound to the gesture
    pub fn edge_for(&self, gesture: GestureLabel) -> Option<&'g GestureEdge> {
        self.navigation
            .iter()
            .find(|edge| edge.fires_on(gesture))
            .copied()
    }
}
