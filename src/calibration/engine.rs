// CalibrationEngine - per-gesture threshold collection workflow
//
// This module manages the calibration state machine:
//
//   Idle -> AwaitingSample(0) -> Paused -> AwaitingSample(1) -> ... -> Complete
//
// For each gesture in calibration order the engine collects a fixed quota of
// matching confidences, records `mean * scale_factor` (clamped to the
// ceiling) as that gesture's threshold, then pauses for the settle duration
// before prompting the next gesture. Samples for any other gesture are
// dropped without touching the buffers.
//
// Time never comes from a clock in here: samples carry their observation
// instant and `tick(now)` is driven by the caller's frame loop.

use std::time::{Duration, Instant};

use crate::calibration::progress::{
    CalibrationGuidance, CalibrationGuidanceReason, CalibrationPhase, CalibrationProgress,
};
use crate::calibration::thresholds::ThresholdTable;
use crate::config::CalibrationConfig;
use crate::error::{log_calibration_error, CalibrationError};
use crate::gesture::{GestureLabel, GestureSample};

/// Why a sample did not count toward the quota
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Settle pause between gestures
    Paused,
    /// Calibration already finished
    Complete,
    /// Sample is for a different gesture than the one prompted
    WrongGesture {
        expected: GestureLabel,
        got: GestureLabel,
    },
}

/// Result of submitting one sample
#[derive(Debug, Clone, PartialEq)]
pub enum SampleOutcome {
    Ignored(IgnoreReason),
    /// Sample appended to the prompted gesture's buffer
    Accepted(CalibrationProgress),
    /// Quota reached: threshold recorded, settle pause started
    GestureCalibrated {
        gesture: GestureLabel,
        threshold: f32,
        /// Running table including the new entry
        table: ThresholdTable,
    },
}

/// State change produced by `tick`
#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationStep {
    /// Settle pause over; prompting the next gesture
    Advanced { next: GestureLabel },
    /// Settle pause after the last gesture over; final table
    Completed { table: ThresholdTable },
    /// No accepted sample for longer than the stall timeout
    Guidance(CalibrationGuidance),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum EngineState {
    Idle,
    AwaitingSample { index: usize },
    Paused { index: usize, until: Instant },
    Complete,
}

/// Transient data owned by one calibration run
struct CalibrationSession {
    buffers: Vec<Vec<f32>>,
    table: ThresholdTable,
    last_progress_at: Instant,
    stall_reported: bool,
}

impl CalibrationSession {
    fn new(now: Instant) -> Self {
        Self {
            buffers: vec![Vec::new(); GestureLabel::ALL.len()],
            table: ThresholdTable::new(),
            last_progress_at: now,
            stall_reported: false,
        }
    }
}

/// CalibrationEngine manages the sample collection workflow
pub struct CalibrationEngine {
    config: CalibrationConfig,
    state: EngineState,
    session: Option<CalibrationSession>,
    completed: Option<ThresholdTable>,
}

impl CalibrationEngine {
    /// Create an idle engine
    pub fn new(config: CalibrationConfig) -> Self {
        Self {
            config,
            state: EngineState::Idle,
            session: None,
            completed: None,
        }
    }

    /// Create with default configuration
    pub fn new_default() -> Self {
        Self::new(CalibrationConfig::default())
    }

    /// Begin a fresh run, discarding any previous buffers or result
    pub fn start(&mut self, now: Instant) {
        self.session = Some(CalibrationSession::new(now));
        self.completed = None;
        self.state = EngineState::AwaitingSample { index: 0 };
        log::info!(
            "[Calibration] Started: {} samples per gesture, prompting {}",
            self.config.samples_per_gesture,
            GestureLabel::ThumbUp.display_name()
        );
    }

    /// Discard the running buffers and prompt the first gesture again
    ///
    /// Only acts on a run in progress; an idle or completed engine is left
    /// as is and `false` is returned.
    pub fn cancel(&mut self, now: Instant) -> bool {
        if !self.is_active() {
            return false;
        }
        log::info!("[Calibration] Cancelled, buffers discarded");
        self.start(now);
        true
    }

    /// Start over at the first gesture from any state, dropping a
    /// previously completed table
    pub fn restart(&mut self, now: Instant) {
        self.abort();
        self.start(now);
    }

    /// Leave calibration entirely, back to idle
    pub fn abort(&mut self) {
        if self.session.take().is_some() {
            log::info!("[Calibration] Aborted, buffers discarded");
        }
        self.completed = None;
        self.state = EngineState::Idle;
    }

    /// Feed one classified sample
    ///
    /// # Returns
    /// * `Ok(SampleOutcome)` - What happened to the sample
    /// * `Err(CalibrationError::NotStarted)` - Engine is idle (integration bug)
    pub fn submit_sample(
        &mut self,
        sample: GestureSample,
    ) -> Result<SampleOutcome, CalibrationError> {
        let index = match self.state {
            EngineState::Idle => {
                let err = CalibrationError::NotStarted;
                log_calibration_error(&err, "submit_sample");
                return Err(err);
            }
            EngineState::Paused { .. } => return Ok(SampleOutcome::Ignored(IgnoreReason::Paused)),
            EngineState::Complete => return Ok(SampleOutcome::Ignored(IgnoreReason::Complete)),
            EngineState::AwaitingSample { index } => index,
        };

        let expected = GestureLabel::ALL[index];
        if sample.label != expected {
            return Ok(SampleOutcome::Ignored(IgnoreReason::WrongGesture {
                expected,
                got: sample.label,
            }));
        }

        let quota = self.config.samples_per_gesture.max(1);
        let settle = Duration::from_millis(self.config.settle_ms);
        let (scale, ceiling) = (self.config.scale_factor, self.config.threshold_ceiling);

        let session = self.session.as_mut().ok_or(CalibrationError::NotStarted)?;
        let buffer = &mut session.buffers[index];
        buffer.push(sample.confidence);
        session.last_progress_at = sample.observed_at;
        session.stall_reported = false;

        if buffer.len() < quota {
            log::debug!(
                "[Calibration] {} sample {}/{} (confidence {:.3})",
                expected,
                buffer.len(),
                quota,
                sample.confidence
            );
            return Ok(SampleOutcome::Accepted(self.progress()));
        }

        let threshold = compute_threshold(buffer, scale, ceiling);
        session.table.insert(expected, threshold);
        let table = session.table.clone();
        self.state = EngineState::Paused {
            index,
            until: sample.observed_at + settle,
        };

        log::info!(
            "[Calibration] {} calibrated: threshold {:.3} ({}/{} gestures)",
            expected,
            threshold,
            table.len(),
            GestureLabel::ALL.len()
        );

        Ok(SampleOutcome::GestureCalibrated {
            gesture: expected,
            threshold,
            table,
        })
    }

    /// Advance time-driven transitions
    ///
    /// Leaves the settle pause once it has elapsed and, when a stall timeout
    /// is configured, reports a stalled prompt once per stall.
    pub fn tick(&mut self, now: Instant) -> Option<CalibrationStep> {
        match self.state {
            EngineState::Paused { index, until } if now >= until => {
                match GestureLabel::from_index(index + 1) {
                    Some(next) => {
                        self.state = EngineState::AwaitingSample { index: index + 1 };
                        if let Some(session) = self.session.as_mut() {
                            session.last_progress_at = now;
                            session.stall_reported = false;
                        }
                        log::info!("[Calibration] Prompting {}", next.display_name());
                        Some(CalibrationStep::Advanced { next })
                    }
                    None => {
                        let table = self
                            .session
                            .take()
                            .map(|session| session.table)
                            .unwrap_or_default();
                        self.state = EngineState::Complete;
                        self.completed = Some(table.clone());
                        log::info!("[Calibration] Complete: {} thresholds", table.len());
                        Some(CalibrationStep::Completed { table })
                    }
                }
            }
            EngineState::AwaitingSample { index } => {
                let timeout = Duration::from_millis(self.config.stall_timeout_ms?);
                let session = self.session.as_mut()?;
                let waited = now.saturating_duration_since(session.last_progress_at);
                if session.stall_reported || waited < timeout {
                    return None;
                }
                session.stall_reported = true;
                let gesture = GestureLabel::ALL[index];
                log::warn!(
                    "[Calibration] No {} sample accepted for {} ms",
                    gesture,
                    waited.as_millis()
                );
                Some(CalibrationStep::Guidance(CalibrationGuidance {
                    gesture,
                    reason: CalibrationGuidanceReason::Stalled,
                    waited_ms: waited.as_millis() as u64,
                }))
            }
            _ => None,
        }
    }

    /// Snapshot of the current step
    pub fn progress(&self) -> CalibrationProgress {
        let samples_needed = self.config.samples_per_gesture;
        let gestures_done = match (&self.session, &self.completed) {
            (Some(session), _) => session.table.len(),
            (None, Some(table)) => table.len(),
            (None, None) => 0,
        };

        let (phase, index) = match self.state {
            EngineState::Idle => (CalibrationPhase::Idle, None),
            EngineState::AwaitingSample { index } => (CalibrationPhase::AwaitingSample, Some(index)),
            EngineState::Paused { index, .. } => (CalibrationPhase::Paused, Some(index)),
            EngineState::Complete => (CalibrationPhase::Complete, None),
        };

        let samples_collected = match (index, &self.session) {
            (Some(i), Some(session)) => session.buffers[i].len(),
            _ => 0,
        };

        CalibrationProgress {
            phase,
            current_gesture: index.and_then(GestureLabel::from_index),
            samples_collected,
            samples_needed,
            gestures_done,
        }
    }

    pub fn phase(&self) -> CalibrationPhase {
        self.progress().phase
    }

    /// True while a run is collecting or settling
    pub fn is_active(&self) -> bool {
        matches!(
            self.state,
            EngineState::AwaitingSample { .. } | EngineState::Paused { .. }
        )
    }

    /// Gesture currently prompted, if collecting
    pub fn expected_gesture(&self) -> Option<GestureLabel> {
        match self.state {
            EngineState::AwaitingSample { index } => GestureLabel::from_index(index),
            _ => None,
        }
    }

    /// Thresholds recorded so far in the running session
    pub fn partial_table(&self) -> Option<&ThresholdTable> {
        self.session.as_ref().map(|session| &session.table)
    }

    /// Final table of the last completed run
    pub fn final_table(&self) -> Result<ThresholdTable, CalibrationError> {
        self.completed
            .clone()
            .ok_or(CalibrationError::NotComplete)
    }
}

/// Derive a threshold from collected confidences
///
/// The bar sits below the user's mean performed confidence so that natural
/// variation still passes, and never above `ceiling` even when the
/// classifier reports near-certain scores.
pub fn compute_threshold(confidences: &[f32], scale_factor: f32, ceiling: f32) -> f32 {
    if confidences.is_empty() {
        return 0.0;
    }
    let mean = confidences.iter().sum::<f32>() / confidences.len() as f32;
    (mean * scale_factor).clamp(0.0, ceiling)
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
