// GestureSession - the per-frame loop tying everything together
//
// Each tick:
//   1. Calibrating: advance the calibration settle/stall timers.
//      Live: advance the zoom animation one step.
//   2. Tick the frame scheduler (at most one classification in flight).
//   3. Route every resolved sample to exactly one consumer, chosen by the
//      mode flag: the calibration engine or the dispatcher.
//
// Calibration completion stores the table, hands a copy to the dispatcher
// and switches to live in the same tick.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::calibration::{CalibrationEngine, CalibrationStep, SampleOutcome, ThresholdTable};
use crate::config::AppConfig;
use crate::dispatch::{DispatchOutcome, GestureDispatcher, RejectReason};
use crate::engine::channels::{CalibrationUpdate, ChannelHub};
use crate::engine::classifier::{GestureClassifier, VideoFrame};
use crate::engine::scheduler::{FrameScheduler, FrameTick, Resolution};
use crate::error::{
    log_calibration_error, log_classifier_error, log_storage_error, ErrorCode,
};
use crate::gesture::GestureSample;
use crate::graph::WorkflowGraph;
use crate::presentation::PresentationStateMachine;
use crate::storage::ThresholdStore;
use crate::telemetry::MetricEvent;

/// Which consumer owns the sample stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Calibrating,
    Live,
}

/// What one resolved frame did
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Calibration mode; `None` when the frame held no usable gesture
    Calibration(Option<SampleOutcome>),
    Dispatch(DispatchOutcome),
}

/// Summary of one session tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionTick {
    /// Frame dropped because a classification was still in flight
    pub skipped: bool,
    pub calibration: Option<CalibrationStep>,
    pub outcomes: Vec<FrameOutcome>,
}

pub struct GestureSession<C, S> {
    mode: Mode,
    calibration: CalibrationEngine,
    dispatcher: GestureDispatcher,
    presentation: PresentationStateMachine,
    scheduler: FrameScheduler,
    classifier: C,
    store: S,
    hub: ChannelHub,
}

impl<C: GestureClassifier, S: ThresholdStore> GestureSession<C, S> {
    /// Create a session with its own channels
    pub fn new(config: AppConfig, graph: Arc<WorkflowGraph>, classifier: C, store: S) -> Self {
        Self::with_hub(config, graph, classifier, store, ChannelHub::new())
    }

    /// Create a session on caller-provided channels
    ///
    /// Subscribe to `hub` before calling this to also receive the initial
    /// `SlideChanged` (or `NoContent`) event.
    pub fn with_hub(
        config: AppConfig,
        graph: Arc<WorkflowGraph>,
        classifier: C,
        store: S,
        hub: ChannelHub,
    ) -> Self {
        let presentation = PresentationStateMachine::new(
            graph,
            config.presentation.clone(),
            hub.presentation_sender(),
        );
        Self {
            mode: Mode::Live,
            calibration: CalibrationEngine::new(config.calibration.clone()),
            dispatcher: GestureDispatcher::new(config.dispatch.clone(), ThresholdTable::new()),
            presentation,
            scheduler: FrameScheduler::new(),
            classifier,
            store,
            hub,
        }
    }

    /// Load persisted thresholds; calibrate when they are absent or partial
    pub fn begin(&mut self, now: Instant) -> Mode {
        match self.store.load() {
            Ok(Some(table)) => {
                log::info!("[Session] Using stored thresholds, going live");
                self.dispatcher.set_thresholds(table);
                self.enter_live();
            }
            Ok(None) => {
                log::info!("[Session] No stored thresholds, calibration required");
                self.start_calibration(now);
            }
            Err(err) => {
                log_storage_error(&err, "begin");
                self.start_calibration(now);
            }
        }
        self.mode
    }

    /// Switch to calibration and prompt the first gesture
    pub fn start_calibration(&mut self, now: Instant) {
        self.scheduler.cancel();
        self.dispatcher.reset();
        self.calibration.restart(now);
        self.mode = Mode::Calibrating;
        tracing::info!(mode = "calibrating", "mode switch");
        self.publish_progress();
    }

    /// Discard the running calibration buffers and prompt the first gesture
    pub fn cancel_calibration(&mut self, now: Instant) -> bool {
        if self.mode != Mode::Calibrating || !self.calibration.cancel(now) {
            return false;
        }
        self.scheduler.cancel();
        self.publish_progress();
        true
    }

    /// Leave calibration without finishing; the dispatcher keeps its
    /// current thresholds (defaults for any gesture it lacks)
    pub fn abort_calibration(&mut self) {
        if self.mode != Mode::Calibrating {
            return;
        }
        self.calibration.abort();
        if !self.dispatcher.thresholds().is_complete() {
            log::warn!("[Session] Calibration aborted without a complete table");
        }
        self.enter_live();
    }

    /// Back to the start slide with dispatcher state cleared
    pub fn restart_presentation(&mut self) {
        self.dispatcher.reset();
        self.presentation.restart();
    }

    /// Process one video frame
    pub fn tick(&mut self, now: Instant, frame: VideoFrame) -> SessionTick {
        let mut report = SessionTick::default();

        match self.mode {
            Mode::Calibrating => {
                if let Some(step) = self.calibration.tick(now) {
                    self.handle_step(&step);
                    report.calibration = Some(step);
                }
            }
            Mode::Live => {
                self.presentation.tick_zoom();
            }
        }

        match self.scheduler.tick(&mut self.classifier, frame) {
            FrameTick::Skipped => {
                report.skipped = true;
                self.hub.publish_metric(MetricEvent::FrameSkipped {
                    skipped_total: self.scheduler.skipped(),
                });
            }
            FrameTick::Processed(resolutions) => {
                for resolution in resolutions {
                    let outcome = self.process(resolution);
                    report.outcomes.push(outcome);
                }
            }
        }

        report
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_calibrating(&self) -> bool {
        self.mode == Mode::Calibrating
    }

    pub fn calibration(&self) -> &CalibrationEngine {
        &self.calibration
    }

    pub fn dispatcher(&self) -> &GestureDispatcher {
        &self.dispatcher
    }

    pub fn presentation(&self) -> &PresentationStateMachine {
        &self.presentation
    }

    pub fn hub(&self) -> &ChannelHub {
        &self.hub
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    fn process(&mut self, resolution: Resolution) -> FrameOutcome {
        let raw = match resolution.output {
            Ok(raw) => raw,
            Err(err) => {
                log_classifier_error(&err, "tick");
                self.hub.publish_metric(MetricEvent::ClassifierFailed {
                    reason: err.message(),
                });
                None
            }
        };
        let sample = raw
            .as_ref()
            .and_then(|raw| GestureSample::from_raw(raw, resolution.frame.captured_at));

        tracing::trace!(
            frame = resolution.frame.index,
            label = sample.map(|s| s.label.as_str()),
            confidence = sample.map(|s| s.confidence),
            "sample"
        );

        match self.mode {
            Mode::Calibrating => FrameOutcome::Calibration(sample.and_then(|s| self.calibrate(s))),
            Mode::Live => FrameOutcome::Dispatch(self.dispatch(sample)),
        }
    }

    fn calibrate(&mut self, sample: GestureSample) -> Option<SampleOutcome> {
        let outcome = match self.calibration.submit_sample(sample) {
            Ok(outcome) => outcome,
            Err(err) => {
                log_calibration_error(&err, "calibrate");
                return None;
            }
        };

        match &outcome {
            SampleOutcome::Accepted(progress) => {
                self.hub
                    .publish_calibration(CalibrationUpdate::Progress(progress.clone()));
            }
            SampleOutcome::GestureCalibrated {
                gesture,
                threshold,
                table,
            } => {
                // Incremental save; a partial table on disk still forces
                // recalibration on the next start
                if let Err(err) = self.store.save(table) {
                    log_storage_error(&err, "calibrate");
                }
                self.hub.publish_metric(MetricEvent::ThresholdUpdated {
                    gesture: *gesture,
                    threshold: *threshold,
                    complete: table.is_complete(),
                });
                self.hub
                    .publish_calibration(CalibrationUpdate::ThresholdsUpdated {
                        gesture: *gesture,
                        threshold: *threshold,
                        table: table.clone(),
                    });
            }
            SampleOutcome::Ignored(_) => {}
        }
        Some(outcome)
    }

    fn dispatch(&mut self, sample: Option<GestureSample>) -> DispatchOutcome {
        let calibrating = self.is_calibrating();
        let outcome = {
            let actions = self.presentation.current_actions();
            self.dispatcher
                .dispatch(actions.as_ref(), sample.as_ref(), calibrating)
        };

        match &outcome {
            DispatchOutcome::Action(action) => {
                let node_id = self
                    .presentation
                    .state()
                    .current_node_id
                    .clone()
                    .unwrap_or_default();
                self.presentation.apply(action);
                self.hub.publish_metric(MetricEvent::ActionDispatched {
                    gesture: action.gesture(),
                    action: action.kind().to_string(),
                    node_id,
                });
            }
            DispatchOutcome::Rejected(RejectReason::NoGesture) => {}
            DispatchOutcome::Rejected(reason) => {
                self.hub.publish_metric(MetricEvent::SampleRejected {
                    gesture: sample.map(|s| s.label),
                    reason: *reason,
                });
            }
        }
        outcome
    }

    fn handle_step(&mut self, step: &CalibrationStep) {
        match step {
            CalibrationStep::Advanced { .. } => self.publish_progress(),
            CalibrationStep::Guidance(guidance) => {
                self.hub
                    .publish_calibration(CalibrationUpdate::Guidance(guidance.clone()));
            }
            CalibrationStep::Completed { table } => self.finish_calibration(table.clone()),
        }
    }

    fn finish_calibration(&mut self, table: ThresholdTable) {
        if let Err(err) = self.store.save(&table) {
            log_storage_error(&err, "finish_calibration");
        }
        self.dispatcher.set_thresholds(table.clone());
        self.hub
            .publish_calibration(CalibrationUpdate::Completed { table });
        log::info!("[Session] Calibration complete, going live");
        self.enter_live();
    }

    fn enter_live(&mut self) {
        self.scheduler.cancel();
        self.dispatcher.reset();
        self.mode = Mode::Live;
        tracing::info!(mode = "live", "mode switch");
    }

    fn publish_progress(&self) {
        self.hub
            .publish_calibration(CalibrationUpdate::Progress(self.calibration.progress()));
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
