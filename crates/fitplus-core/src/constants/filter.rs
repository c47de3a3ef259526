// ABOUTME: One-euro filter tuning constants and named smoothing presets
// ABOUTME: Landmark presets trade jitter suppression against lag at speed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

/// Derivative cutoff frequency (Hz)
pub const DEFAULT_D_CUTOFF: f64 = 1.0;

/// Landmark smoothing minimum cutoff (Hz)
pub const LANDMARK_MIN_CUTOFF: f64 = 1.0;
/// Landmark smoothing speed coefficient
pub const LANDMARK_BETA: f64 = 0.5;

/// Metric (angle) smoothing minimum cutoff (Hz)
pub const METRIC_MIN_CUTOFF: f64 = 1.0;
/// Metric (angle) smoothing speed coefficient; angles move in degrees so beta stays small
pub const METRIC_BETA: f64 = 0.007;

/// Very smooth: slow movements and static posture analysis `(min_cutoff, beta)`
pub const ULTRA_SMOOTH: (f64, f64) = (0.5, 0.1);
/// Smooth: general exercise tracking `(min_cutoff, beta)`
pub const SMOOTH: (f64, f64) = (1.0, 0.5);
/// Responsive: fast movements `(min_cutoff, beta)`
pub const RESPONSIVE: (f64, f64) = (1.5, 1.0);
/// Minimal filtering, close to raw `(min_cutoff, beta)`
pub const MINIMAL: (f64, f64) = (3.0, 2.0);
