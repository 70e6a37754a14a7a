// GestureDispatcher - turns a stream of noisy samples into discrete actions
//
// Per sample:
// 1. Reject while calibrating and when the classifier saw nothing
// 2. Reject below the gesture's threshold (table value or the default)
// 3. Resolve bindings on the current slide, first match wins:
//    media control > zoom > navigation
//
// Navigation and zoom are one-shot: a pose held across many frames fires
// once, and must be released (any other label, or no gesture) before it can
// fire again. Play/pause fires while held but at most once per cooldown;
// scrubbing repeats while held at the scrub repeat interval. Media repeats
// only for a hold that started as that media command on the same slide, so a
// pose that navigated onto a video slide stays inert until released.

use std::time::{Duration, Instant};

use crate::calibration::ThresholdTable;
use crate::config::DispatchConfig;
use crate::dispatch::action::{DispatchAction, DispatchOutcome, MediaCommand, RejectReason};
use crate::gesture::{GestureLabel, GestureSample};
use crate::graph::SlideActions;

/// Label that passed its threshold and has not been released
#[derive(Debug, Clone, PartialEq)]
struct Hold {
    gesture: GestureLabel,
    /// Slide on which this hold resolved to a media command
    media_on: Option<String>,
}

pub struct GestureDispatcher {
    config: DispatchConfig,
    thresholds: ThresholdTable,
    held: Option<Hold>,
    last_play_pause: Option<Instant>,
    last_scrub: Option<Instant>,
}

impl GestureDispatcher {
    /// Create a dispatcher owning a copy of the thresholds
    pub fn new(config: DispatchConfig, thresholds: ThresholdTable) -> Self {
        if !thresholds.is_complete() {
            log::warn!(
                "[Dispatcher] Threshold table incomplete, {} gesture(s) use default {:.2}",
                thresholds.missing().len(),
                config.default_threshold
            );
        }
        Self {
            config,
            thresholds,
            held: None,
            last_play_pause: None,
            last_scrub: None,
        }
    }

    /// Replace the threshold table, e.g. after recalibration
    pub fn set_thresholds(&mut self, thresholds: ThresholdTable) {
        self.thresholds = thresholds;
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    pub fn threshold_for(&self, gesture: GestureLabel) -> f32 {
        self.thresholds
            .threshold_or(gesture, self.config.default_threshold)
    }

    /// Forget hold and cooldown state
    pub fn reset(&mut self) {
        self.held = None;
        self.last_play_pause = None;
        self.last_scrub = None;
    }

    /// Gesture currently treated as held
    pub fn held_gesture(&self) -> Option<GestureLabel> {
        self.held.as_ref().map(|hold| hold.gesture)
    }

    /// Decide what, if anything, one sample does on the current slide
    ///
    /// # Arguments
    /// * `actions` - Bindings of the current slide (`None` when no slide is shown)
    /// * `sample` - Classified frame, `None` when the classifier saw no gesture
    /// * `is_calibrating` - Calibration currently owns the sample stream
    pub fn dispatch(
        &mut self,
        actions: Option<&SlideActions<'_>>,
        sample: Option<&GestureSample>,
        is_calibrating: bool,
    ) -> DispatchOutcome {
        if is_calibrating {
            return DispatchOutcome::Rejected(RejectReason::Calibrating);
        }

        let sample = match sample {
            Some(sample) => sample,
            None => {
                self.held = None;
                return DispatchOutcome::Rejected(RejectReason::NoGesture);
            }
        };

        let gesture = sample.label;
        if self.held_gesture() != Some(gesture) {
            self.held = None;
        }

        let threshold = self.threshold_for(gesture);
        if sample.confidence < threshold {
            return DispatchOutcome::Rejected(RejectReason::BelowThreshold {
                confidence: sample.confidence,
                threshold,
            });
        }

        let was_held = self.held.is_some();
        let media_on = self.held.take().and_then(|hold| hold.media_on);
        self.held = Some(Hold {
            gesture,
            media_on: None,
        });

        let actions = match actions {
            Some(actions) => actions,
            None => return DispatchOutcome::Rejected(RejectReason::NoBinding),
        };

        if let Some(command) = actions.media_command(gesture) {
            if was_held && media_on.as_deref() != Some(actions.node_id) {
                return DispatchOutcome::Rejected(RejectReason::Held);
            }
            if let Some(hold) = self.held.as_mut() {
                hold.media_on = Some(actions.node_id.to_string());
            }
            return self.media(gesture, command, sample.observed_at);
        }

        if let Some((direction, point)) = actions.zoom_for(gesture) {
            if was_held {
                return DispatchOutcome::Rejected(RejectReason::Held);
            }
            log::debug!("[Dispatcher] {} -> zoom {:?} on {}", gesture, direction, actions.node_id);
            return DispatchOutcome::Action(DispatchAction::Zoom {
                gesture,
                direction,
                point,
            });
        }

        if let Some(edge) = actions.edge_for(gesture) {
            if was_held {
                return DispatchOutcome::Rejected(RejectReason::Held);
            }
            log::debug!(
                "[Dispatcher] {} -> navigate {} -> {} via {}",
                gesture,
                edge.source,
                edge.target,
                edge.id
            );
            return DispatchOutcome::Action(DispatchAction::Navigate {
                gesture,
                edge: edge.clone(),
            });
        }

        DispatchOutcome::Rejected(RejectReason::NoBinding)
    }

    fn media(&mut self, gesture: GestureLabel, command: MediaCommand, now: Instant) -> DispatchOutcome {
        let (last, interval) = if command.is_scrub() {
            (&mut self.last_scrub, self.config.scrub_repeat_ms)
        } else {
            (&mut self.last_play_pause, self.config.play_pause_cooldown_ms)
        };

        if let Some(previous) = *last {
            if now.saturating_duration_since(previous) < Duration::from_millis(interval) {
                return DispatchOutcome::Rejected(RejectReason::Cooldown);
            }
        }
        *last = Some(now);

        log::debug!("[Dispatcher] {} -> media {:?}", gesture, command);
        DispatchOutcome::Action(DispatchAction::Media { gesture, command })
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
