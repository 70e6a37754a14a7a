//! Configuration management for runtime parameter tuning
//!
//! This module provides runtime configuration loading from JSON files,
//! so calibration quotas, dispatch cooldowns and zoom pacing can be tuned
//! without recompilation. Every field has a default; a partial file only
//! overrides what it names.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::CalibrationError;
use crate::graph::StartNodePolicy;

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub calibration: CalibrationConfig,
    pub dispatch: DispatchConfig,
    pub presentation: PresentationConfig,
}

/// Calibration procedure configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Number of matching samples to collect per gesture
    pub samples_per_gesture: usize,
    /// Multiplier applied to the mean confidence (0.6-0.9)
    pub scale_factor: f32,
    /// Upper bound on any derived threshold
    pub threshold_ceiling: f32,
    /// Pause after each gesture so the user can relax the pose
    pub settle_ms: u64,
    /// Emit stall guidance after this long without an accepted sample
    pub stall_timeout_ms: Option<u64>,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            samples_per_gesture: 15,
            scale_factor: 0.8,
            threshold_ceiling: 0.9,
            settle_ms: 1500,
            stall_timeout_ms: None,
        }
    }
}

/// Gesture dispatcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Threshold used for gestures missing from the table
    pub default_threshold: f32,
    /// Minimum delay between two play/pause toggles
    pub play_pause_cooldown_ms: u64,
    /// Minimum delay between repeated scrub commands while a pose is held
    pub scrub_repeat_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            default_threshold: 0.7,
            play_pause_cooldown_ms: 1000,
            scrub_repeat_ms: 400,
        }
    }
}

/// Presentation state machine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Zoom level change per animation tick
    pub zoom_step: f32,
    /// Seconds moved by one scrub command
    pub scrub_step_seconds: f32,
    pub start_node: StartNodePolicy,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            min_zoom: 1.0,
            max_zoom: 4.0,
            zoom_step: 0.1,
            scrub_step_seconds: 5.0,
            start_node: StartNodePolicy::FirstNode,
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The parsed configuration, or defaults if the file is missing or invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<AppConfig>(&contents) {
                Ok(config) => match config.validate() {
                    Ok(()) => {
                        log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                        config
                    }
                    Err(err) => {
                        log::warn!(
                            "[Config] Rejected configuration from {:?}: {}. Using defaults.",
                            path.as_ref(),
                            err
                        );
                        Self::default()
                    }
                },
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load `gesture_config.json` from the working directory
    pub fn load() -> Self {
        Self::load_from_file("gesture_config.json")
    }

    /// Check that values are mutually consistent
    pub fn validate(&self) -> Result<(), CalibrationError> {
        let invalid = |reason: String| Err(CalibrationError::InvalidConfig { reason });

        let cal = &self.calibration;
        if cal.samples_per_gesture == 0 {
            return invalid("samples_per_gesture must be at least 1".to_string());
        }
        if !(0.6..=0.9).contains(&cal.scale_factor) {
            return invalid(format!(
                "scale_factor {} out of range [0.6, 0.9]",
                cal.scale_factor
            ));
        }
        if !(0.0..=1.0).contains(&cal.threshold_ceiling) {
            return invalid(format!(
                "threshold_ceiling {} out of range [0, 1]",
                cal.threshold_ceiling
            ));
        }
        if !(0.0..=1.0).contains(&self.dispatch.default_threshold) {
            return invalid(format!(
                "default_threshold {} out of range [0, 1]",
                self.dispatch.default_threshold
            ));
        }

        let pres = &self.presentation;
        if pres.min_zoom <= 0.0 || pres.min_zoom > pres.max_zoom {
            return invalid(format!(
                "zoom range [{}, {}] is empty or non-positive",
                pres.min_zoom, pres.max_zoom
            ));
        }
        if pres.zoom_step <= 0.0 {
            return invalid(format!("zoom_step {} must be positive", pres.zoom_step));
        }

        Ok(())
    }
}
