// ABOUTME: One-euro adaptive low-pass filter for scalars and whole landmark poses
// ABOUTME: Smooth at rest, responsive during fast motion; rejects non-monotonic timestamps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

//! One-euro filtering.
//!
//! The effective cutoff frequency rises with the smoothed speed of the
//! signal: `cutoff = min_cutoff + beta * |dx|`. Slow signals are heavily
//! smoothed, fast ones follow the input with little lag.

use fitplus_core::constants::filter::{
    DEFAULT_D_CUTOFF, LANDMARK_BETA, LANDMARK_MIN_CUTOFF, MINIMAL, RESPONSIVE, SMOOTH,
    ULTRA_SMOOTH,
};
use fitplus_core::errors::ConfigError;
use fitplus_core::models::Landmark;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::str::FromStr;

/// Exponential smoothing coefficient for a sample interval and cutoff
fn smoothing_factor(delta_time: f64, cutoff: f64) -> f64 {
    let r = 2.0 * PI * cutoff * delta_time;
    r / (r + 1.0)
}

fn exponential_smoothing(alpha: f64, x: f64, x_prev: f64) -> f64 {
    alpha.mul_add(x, (1.0 - alpha) * x_prev)
}

/// Filter tuning parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterParams {
    /// Minimum cutoff frequency (Hz); lower is smoother at rest
    pub min_cutoff: f64,
    /// Speed coefficient; higher reacts faster to quick motion
    pub beta: f64,
    /// Cutoff frequency for the derivative estimate (Hz)
    pub d_cutoff: f64,
}

impl FilterParams {
    /// Parameters with the standard derivative cutoff
    #[must_use]
    pub const fn new(min_cutoff: f64, beta: f64) -> Self {
        Self {
            min_cutoff,
            beta,
            d_cutoff: DEFAULT_D_CUTOFF,
        }
    }

    /// Reject negative or non-finite parameters
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValueOutOfRange` if any parameter is negative or not finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid = |v: f64| v.is_finite() && v >= 0.0;
        if !valid(self.min_cutoff) {
            return Err(ConfigError::ValueOutOfRange("min_cutoff must be >= 0"));
        }
        if !valid(self.beta) {
            return Err(ConfigError::ValueOutOfRange("beta must be >= 0"));
        }
        if !valid(self.d_cutoff) || self.d_cutoff == 0.0 {
            return Err(ConfigError::ValueOutOfRange("d_cutoff must be > 0"));
        }
        Ok(())
    }
}

impl Default for FilterParams {
    fn default() -> Self {
        Self::new(LANDMARK_MIN_CUTOFF, LANDMARK_BETA)
    }
}

#[derive(Debug, Clone, Copy)]
struct FilterState {
    t_prev: f64,
    x_prev: f64,
    dx_prev: f64,
}

/// Adaptive low-pass filter for one scalar signal
#[derive(Debug, Clone)]
pub struct OneEuroFilter {
    params: FilterParams,
    state: Option<FilterState>,
}

impl OneEuroFilter {
    /// Create an uninitialized filter; the first sample passes through unchanged
    #[must_use]
    pub const fn new(params: FilterParams) -> Self {
        Self {
            params,
            state: None,
        }
    }

    /// Filter a sample taken at `t` seconds
    ///
    /// A timestamp that does not advance past the previous one returns the
    /// previous output unchanged.
    pub fn filter(&mut self, t: f64, x: f64) -> f64 {
        let Some(prev) = self.state else {
            self.state = Some(FilterState {
                t_prev: t,
                x_prev: x,
                dx_prev: 0.0,
            });
            return x;
        };

        let delta_time = t - prev.t_prev;
        if delta_time <= 0.0 {
            return prev.x_prev;
        }

        // 1. Derivative estimate
        let dx = (x - prev.x_prev) / delta_time;
        let alpha_d = smoothing_factor(delta_time, self.params.d_cutoff);
        let dx_hat = exponential_smoothing(alpha_d, dx, prev.dx_prev);

        // 2. Speed-dependent cutoff
        let cutoff = self.params.beta.mul_add(dx_hat.abs(), self.params.min_cutoff);

        // 3. Signal smoothing
        let alpha = smoothing_factor(delta_time, cutoff);
        let x_hat = exponential_smoothing(alpha, x, prev.x_prev);

        self.state = Some(FilterState {
            t_prev: t,
            x_prev: x_hat,
            dx_prev: dx_hat,
        });
        x_hat
    }

    /// Last filtered output, if any sample has been seen
    #[must_use]
    pub fn last_value(&self) -> Option<f64> {
        self.state.map(|s| s.x_prev)
    }

    /// Forget all history
    pub fn reset(&mut self) {
        self.state = None;
    }

    /// Filter parameters
    #[must_use]
    pub const fn params(&self) -> FilterParams {
        self.params
    }
}

/// Named smoothing presets for landmark filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmootherPreset {
    /// Slow movements and static posture analysis
    UltraSmooth,
    /// General exercise tracking
    #[default]
    Smooth,
    /// Fast movements
    Responsive,
    /// Close to raw detector output
    Minimal,
}

impl SmootherPreset {
    /// Filter parameters for this preset
    #[must_use]
    pub const fn params(self) -> FilterParams {
        let (min_cutoff, beta) = match self {
            Self::UltraSmooth => ULTRA_SMOOTH,
            Self::Smooth => SMOOTH,
            Self::Responsive => RESPONSIVE,
            Self::Minimal => MINIMAL,
        };
        FilterParams::new(min_cutoff, beta)
    }
}

impl FromStr for SmootherPreset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "ultra_smooth" => Ok(Self::UltraSmooth),
            "smooth" => Ok(Self::Smooth),
            "responsive" => Ok(Self::Responsive),
            "minimal" => Ok(Self::Minimal),
            other => Err(ConfigError::Parse(format!("unknown smoother preset '{other}'"))),
        }
    }
}

/// One filter per axis of a 3D point; visibility passes through untouched
#[derive(Debug, Clone)]
struct PointFilter {
    x: OneEuroFilter,
    y: OneEuroFilter,
    z: OneEuroFilter,
}

impl PointFilter {
    const fn new(params: FilterParams) -> Self {
        Self {
            x: OneEuroFilter::new(params),
            y: OneEuroFilter::new(params),
            z: OneEuroFilter::new(params),
        }
    }

    fn filter(&mut self, t: f64, point: &Landmark) -> Landmark {
        Landmark {
            x: self.x.filter(t, point.x),
            y: self.y.filter(t, point.y),
            z: self.z.filter(t, point.z),
            visibility: point.visibility,
        }
    }
}

/// Smooths every landmark of a pose, one filter per landmark axis
#[derive(Debug, Clone)]
pub struct LandmarkSmoother {
    params: FilterParams,
    filters: Vec<PointFilter>,
}

impl LandmarkSmoother {
    /// Create a smoother with explicit parameters
    #[must_use]
    pub const fn new(params: FilterParams) -> Self {
        Self {
            params,
            filters: Vec::new(),
        }
    }

    /// Create a smoother from a named preset
    #[must_use]
    pub const fn from_preset(preset: SmootherPreset) -> Self {
        Self::new(preset.params())
    }

    /// Smooth a pose sampled at `t` seconds
    ///
    /// Landmarks seen for the first time pass through unchanged and seed
    /// their filters.
    pub fn filter(&mut self, t: f64, landmarks: &[Landmark]) -> Vec<Landmark> {
        while self.filters.len() < landmarks.len() {
            self.filters.push(PointFilter::new(self.params));
        }
        landmarks
            .iter()
            .zip(self.filters.iter_mut())
            .map(|(landmark, filter)| filter.filter(t, landmark))
            .collect()
    }

    /// Drop all filter state (new session, lost tracking)
    pub fn reset(&mut self) {
        self.filters.clear();
    }

    /// Change parameters; existing state is discarded
    pub fn set_params(&mut self, params: FilterParams) {
        self.params = params;
        self.reset();
    }
}
