// ABOUTME: Runtime configuration for motion sessions loaded from environment variables
// ABOUTME: Smoothing preset, timeline interval, feedback threshold, and event buffer size
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

//! Environment-driven session configuration.
//!
//! | Variable | Default |
//! |---|---|
//! | `FITPLUS_SMOOTHER_PRESET` | `smooth` (`none` disables landmark smoothing) |
//! | `FITPLUS_SMOOTH_METRICS` | `true` |
//! | `FITPLUS_TIMELINE_INTERVAL_MS` | `1000` |
//! | `FITPLUS_FEEDBACK_SUCCESS_THRESHOLD` | `80` |
//! | `FITPLUS_EVENT_BUFFER` | `64` |

/// Profile and pattern file loading
pub mod loader;

pub use loader::{load_pattern, load_profile};

use fitplus_core::constants::scoring::{FULL_SCORE, SUCCESS_THRESHOLD};
use fitplus_core::constants::session::{EVENT_BUFFER_SIZE, TIMELINE_INTERVAL_MS};
use fitplus_core::errors::ConfigError;
use fitplus_motion::{SmootherPreset, TrackerOptions};
use std::env;
use std::str::FromStr;

/// Session runtime configuration
#[derive(Debug, Clone, PartialEq)]
pub struct MotionConfig {
    /// Frame smoothing
    pub tracker: TrackerOptions,
    /// Minimum spacing between timeline samples (ms)
    pub timeline_interval_ms: f64,
    /// Worst-component score treated as a clean rep
    pub success_threshold: f64,
    /// Capacity of each session's event channel
    pub event_buffer: usize,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            tracker: TrackerOptions::default(),
            timeline_interval_ms: TIMELINE_INTERVAL_MS,
            success_threshold: SUCCESS_THRESHOLD,
            event_buffer: EVENT_BUFFER_SIZE,
        }
    }
}

fn parse_env<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Parse(format!("{key}: cannot parse '{raw}'"))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::EnvVar(e)),
    }
}

fn parse_bool(key: &str) -> Result<Option<bool>, ConfigError> {
    let Some(raw) = parse_env::<String>(key)? else {
        return Ok(None);
    };
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::Parse(format!("{key}: expected a boolean, got '{raw}'"))),
    }
}

impl MotionConfig {
    /// Load configuration from environment variables, falling back to defaults
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for unparseable or out-of-range values
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let landmark_preset = match parse_env::<String>("FITPLUS_SMOOTHER_PRESET")? {
            None => defaults.tracker.landmark_preset,
            Some(raw) if raw.eq_ignore_ascii_case("none") => None,
            Some(raw) => Some(raw.parse::<SmootherPreset>()?),
        };

        let config = Self {
            tracker: TrackerOptions {
                landmark_preset,
                smooth_metrics: parse_bool("FITPLUS_SMOOTH_METRICS")?
                    .unwrap_or(defaults.tracker.smooth_metrics),
            },
            timeline_interval_ms: parse_env("FITPLUS_TIMELINE_INTERVAL_MS")?
                .unwrap_or(defaults.timeline_interval_ms),
            success_threshold: parse_env("FITPLUS_FEEDBACK_SUCCESS_THRESHOLD")?
                .unwrap_or(defaults.success_threshold),
            event_buffer: parse_env("FITPLUS_EVENT_BUFFER")?.unwrap_or(defaults.event_buffer),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValueOutOfRange` naming the offending setting
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.timeline_interval_ms.is_finite() && self.timeline_interval_ms > 0.0) {
            return Err(ConfigError::ValueOutOfRange(
                "FITPLUS_TIMELINE_INTERVAL_MS must be > 0",
            ));
        }
        if !(0.0..=FULL_SCORE).contains(&self.success_threshold) {
            return Err(ConfigError::ValueOutOfRange(
                "FITPLUS_FEEDBACK_SUCCESS_THRESHOLD must be within 0-100",
            ));
        }
        if self.event_buffer == 0 {
            return Err(ConfigError::ValueOutOfRange("FITPLUS_EVENT_BUFFER must be > 0"));
        }
        Ok(())
    }
}
