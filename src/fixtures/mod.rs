//! Recorded classifier scripts for the deterministic CLI harness.
//!
//! A script is the classifier output of a recorded session, one entry per
//! video frame, with the frame's offset from the start of the recording.
//! Replaying it through [`ScriptedClassifier`] gives repeatable calibration
//! and presentation runs without a camera.

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::{ScriptedClassifier, VideoFrame};
use crate::gesture::RawClassification;

/// Default location for fixture graph/script/threshold assets.
pub const DEFAULT_FIXTURE_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures");

/// One recorded frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptFrame {
    /// Classifier label; `null` when no hand was detected
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub confidence: f32,
    /// Offset from the first frame of the recording
    pub at_ms: u64,
}

impl ScriptFrame {
    pub fn classification(&self) -> Option<RawClassification> {
        self.label
            .as_ref()
            .map(|label| RawClassification::new(label.clone(), self.confidence))
    }
}

/// A recorded sequence of frames, ordered by `at_ms`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameScript {
    frames: Vec<ScriptFrame>,
}

impl FrameScript {
    pub fn new(frames: Vec<ScriptFrame>) -> Result<Self> {
        if let Some(pair) = frames.windows(2).find(|pair| pair[1].at_ms < pair[0].at_ms) {
            bail!(
                "script frames go back in time: {} ms after {} ms",
                pair[1].at_ms,
                pair[0].at_ms
            );
        }
        Ok(Self { frames })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let frames: Vec<ScriptFrame> =
            serde_json::from_str(json).context("parsing frame script")?;
        Self::new(frames)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&contents).with_context(|| format!("loading script {}", path.display()))
    }

    pub fn frames(&self) -> &[ScriptFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Offset of the last frame
    pub fn duration(&self) -> Duration {
        self.frames
            .last()
            .map(|frame| Duration::from_millis(frame.at_ms))
            .unwrap_or_default()
    }

    /// Classifier answering each call with the next recorded frame
    pub fn classifier(&self) -> ScriptedClassifier {
        ScriptedClassifier::new(self.frames.iter().map(ScriptFrame::classification))
    }

    /// Frame handles anchored at `start`
    pub fn video_frames(&self, start: Instant) -> impl Iterator<Item = VideoFrame> + '_ {
        self.frames.iter().enumerate().map(move |(index, frame)| {
            VideoFrame::new(index as u64, start + Duration::from_millis(frame.at_ms))
        })
    }
}
