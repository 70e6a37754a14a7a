// ChannelHub: tokio broadcast channels of a gesture session
// Single Responsibility: channel creation and subscription

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::calibration::{CalibrationGuidance, CalibrationProgress, ThresholdTable};
use crate::gesture::GestureLabel;
use crate::presentation::PresentationEvent;
use crate::telemetry::{MetricEvent, TelemetryCollector};

/// Calibration notifications for the prompt UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "update", rename_all = "snake_case")]
pub enum CalibrationUpdate {
    Progress(CalibrationProgress),
    /// One gesture finished; `table` is the running partial table
    ThresholdsUpdated {
        gesture: GestureLabel,
        threshold: f32,
        table: ThresholdTable,
    },
    Guidance(CalibrationGuidance),
    Completed {
        table: ThresholdTable,
    },
}

/// Owns every broadcast channel of a session
///
/// # Channel Types
/// - Presentation: slide, zoom, media and API action events for the renderer
/// - Calibration: prompt progress and threshold updates
/// - Metrics: telemetry events, via the shared [`TelemetryCollector`]
///
/// Senders exist from construction; a send with no subscriber is not an
/// error, the event is simply dropped.
pub struct ChannelHub {
    presentation: broadcast::Sender<PresentationEvent>,
    calibration: broadcast::Sender<CalibrationUpdate>,
    telemetry: Arc<TelemetryCollector>,
}

impl ChannelHub {
    /// # Notes
    /// - Presentation buffer: 128 events (a zoom ramp emits one per frame)
    /// - Calibration buffer: 64 updates
    pub fn new() -> Self {
        Self::with_capacity(128, 64)
    }

    pub fn with_capacity(presentation: usize, calibration: usize) -> Self {
        let (presentation, _) = broadcast::channel(presentation.max(1));
        let (calibration, _) = broadcast::channel(calibration.max(1));
        Self {
            presentation,
            calibration,
            telemetry: Arc::new(TelemetryCollector::default()),
        }
    }

    // ========================================================================
    // PRESENTATION CHANNEL
    // ========================================================================

    /// Sender handed to the presentation state machine
    pub fn presentation_sender(&self) -> broadcast::Sender<PresentationEvent> {
        self.presentation.clone()
    }

    pub fn subscribe_presentation(&self) -> broadcast::Receiver<PresentationEvent> {
        self.presentation.subscribe()
    }

    // ========================================================================
    // CALIBRATION CHANNEL
    // ========================================================================

    pub fn publish_calibration(&self, update: CalibrationUpdate) {
        let _ = self.calibration.send(update);
    }

    pub fn subscribe_calibration(&self) -> broadcast::Receiver<CalibrationUpdate> {
        self.calibration.subscribe()
    }

    // ========================================================================
    // METRICS CHANNEL
    // ========================================================================

    pub fn telemetry(&self) -> &Arc<TelemetryCollector> {
        &self.telemetry
    }

    pub fn publish_metric(&self, event: MetricEvent) {
        self.telemetry.publish(event);
    }

    pub fn subscribe_metrics(&self) -> broadcast::Receiver<MetricEvent> {
        self.telemetry.subscribe()
    }
}

impl Default for ChannelHub {
    fn default() -> Self {
        Self::new()
    }
}
