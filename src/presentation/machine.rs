// PresentationStateMachine - AtSlide(node) with zoom level and point
//
// Transitions:
//   apply_transition(edge) -> AtSlide(edge.target), zoom reset to minimum
//   apply_zoom(dir, point) -> same slide, new zoom animation toward max/min
//   tick_zoom()            -> one animation step
//   restart()              -> start node again
//
// A graph whose start node cannot be resolved leaves the machine in the
// no-content state; every operation except `restart` is then a no-op.

use std::sync::Arc;
use tokio::sync::broadcast;

use crate::config::PresentationConfig;
use crate::dispatch::{DispatchAction, MediaCommand, ZoomDirection};
use crate::error::log_graph_error;
use crate::graph::{GestureEdge, SlideActions, SlideContent, SlideNode, WorkflowGraph, ZoomPoint};
use crate::presentation::events::PresentationEvent;
use crate::presentation::state::{PresentationState, ZoomAnimation};

pub struct PresentationStateMachine {
    graph: Arc<WorkflowGraph>,
    config: PresentationConfig,
    state: PresentationState,
    animation: Option<ZoomAnimation>,
    events: broadcast::Sender<PresentationEvent>,
}

impl PresentationStateMachine {
    /// Create the machine and enter the start node
    ///
    /// # Arguments
    /// * `graph` - Shared read-only workflow document
    /// * `config` - Zoom bounds, pacing and start node policy
    /// * `events` - Channel the rendering layer subscribes to
    pub fn new(
        graph: Arc<WorkflowGraph>,
        config: PresentationConfig,
        events: broadcast::Sender<PresentationEvent>,
    ) -> Self {
        let min_zoom = config.min_zoom;
        let mut machine = Self {
            graph,
            config,
            state: PresentationState::no_content(min_zoom),
            animation: None,
            events,
        };
        machine.enter_start();
        machine
    }

    pub fn state(&self) -> &PresentationState {
        &self.state
    }

    pub fn graph(&self) -> &Arc<WorkflowGraph> {
        &self.graph
    }

    pub fn current_node(&self) -> Option<&SlideNode> {
        let id = self.state.current_node_id.as_deref()?;
        self.graph.node(id)
    }

    /// Bindings of the current slide, for the dispatcher
    pub fn current_actions(&self) -> Option<SlideActions<'_>> {
        let id = self.state.current_node_id.as_deref()?;
        self.graph.slide_actions(id)
    }

    pub fn zoom_animation(&self) -> Option<ZoomAnimation> {
        self.animation
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PresentationEvent> {
        self.events.subscribe()
    }

    /// Apply a dispatcher action
    ///
    /// # Returns
    /// `true` when the state changed or a command was published
    pub fn apply(&mut self, action: &DispatchAction) -> bool {
        match action {
            DispatchAction::Navigate { edge, .. } => self.apply_transition(edge),
            DispatchAction::Zoom {
                direction, point, ..
            } => self.apply_zoom(*direction, *point),
            DispatchAction::Media { command, .. } => self.apply_media(*command),
        }
    }

    /// Move to `edge.target`, resetting zoom
    ///
    /// Refused (state unchanged) when the target does not exist.
    pub fn apply_transition(&mut self, edge: &GestureEdge) -> bool {
        if !self.state.has_content() {
            return false;
        }
        if !self.graph.contains(&edge.target) {
            log::warn!(
                "[Presentation] Edge {} targets missing node {}, staying put",
                edge.id,
                edge.target
            );
            return false;
        }

        log::info!(
            "[Presentation] {} -> {} via {}",
            self.state.current_node_id.as_deref().unwrap_or("-"),
            edge.target,
            edge.id
        );
        self.enter(&edge.target);
        true
    }

    /// Set the zoom point and start a ramp toward max (in) or min (out)
    ///
    /// Any in-flight animation is cancelled first.
    pub fn apply_zoom(&mut self, direction: ZoomDirection, point: ZoomPoint) -> bool {
        if !self.state.has_content() {
            return false;
        }

        self.animation = None;
        self.state.zoom_point = Some(point.clamped());

        let target = match direction {
            ZoomDirection::In => self.config.max_zoom,
            ZoomDirection::Out => self.config.min_zoom,
        };
        let animation = ZoomAnimation { direction, target };
        if !animation.is_finished(self.state.zoom_level) {
            self.animation = Some(animation);
        }

        log::debug!(
            "[Presentation] Zoom {:?} toward {:.1} at ({:.0}, {:.0})",
            direction,
            target,
            point.x,
            point.y
        );
        self.publish_zoom();
        true
    }

    /// Advance the zoom animation one step
    ///
    /// # Returns
    /// The new zoom level, or `None` when no animation is in flight
    pub fn tick_zoom(&mut self) -> Option<f32> {
        let animation = self.animation?;
        let level = animation
            .step(self.state.zoom_level, self.config.zoom_step)
            .clamp(self.config.min_zoom, self.config.max_zoom);
        self.state.zoom_level = level;
        if animation.is_finished(level) {
            self.animation = None;
        }
        self.publish_zoom();
        Some(level)
    }

    /// Return to the start node with zoom reset
    pub fn restart(&mut self) {
        log::info!("[Presentation] Restarting");
        self.enter_start();
    }

    fn apply_media(&mut self, command: MediaCommand) -> bool {
        let node_id = match self.current_node() {
            Some(node) if node.media_bindings().is_some() => node.id.clone(),
            _ => return false,
        };
        let seek_seconds = match command {
            MediaCommand::PlayPause => 0.0,
            MediaCommand::ScrubForward => self.config.scrub_step_seconds,
            MediaCommand::ScrubBackward => -self.config.scrub_step_seconds,
        };
        self.publish(PresentationEvent::MediaCommand {
            node_id,
            command,
            seek_seconds,
        });
        true
    }

    fn enter_start(&mut self) {
        let graph = Arc::clone(&self.graph);
        match self.config.start_node.resolve(&graph) {
            Ok(node) => self.enter(&node.id),
            Err(err) => {
                log_graph_error(&err, "enter_start");
                self.animation = None;
                self.state = PresentationState::no_content(self.config.min_zoom);
                self.publish(PresentationEvent::NoContent {
                    reason: err.to_string(),
                });
            }
        }
    }

    fn enter(&mut self, node_id: &str) {
        let graph = Arc::clone(&self.graph);
        let node = match graph.node(node_id) {
            Some(node) => node,
            None => return,
        };

        self.animation = None;
        self.state = PresentationState::at(node.id.clone(), self.config.min_zoom);
        self.publish(PresentationEvent::SlideChanged {
            node_id: node.id.clone(),
            kind: node.kind(),
        });

        if let SlideContent::ApiAction {
            endpoint,
            method,
            payload,
        } = &node.content
        {
            log::info!("[Presentation] {} requests {} {}", node.id, method, endpoint);
            self.publish(PresentationEvent::ApiActionRequested {
                node_id: node.id.clone(),
                endpoint: endpoint.clone(),
                method: method.clone(),
                payload: payload.clone(),
            });
        }
    }

    fn publish_zoom(&self) {
        self.publish(PresentationEvent::ZoomChanged {
            level: self.state.zoom_level,
            point: self.state.zoom_point,
        });
    }

    fn publish(&self, event: PresentationEvent) {
        // No subscriber is fine: the state itself is the source of truth
        if self.events.send(event).is_err() {
            log::trace!("[Presentation] Event dropped, no subscribers");
        }
    }
}

#[cfg(test)]
#[path = "machine_tests.rs"]
mod tests;
