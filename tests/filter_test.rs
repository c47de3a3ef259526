// ABOUTME: Integration tests for one-euro filtering of scalars and landmark sets
// ABOUTME: Covers the monotonic-time guard, convergence, presets, and reset behavior
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use fitplus_core::models::Landmark;
use fitplus_motion::{FilterParams, LandmarkSmoother, OneEuroFilter, SmootherPreset};

#[test]
fn test_non_advancing_time_returns_previous_output() {
    let mut filter = OneEuroFilter::new(FilterParams::new(1.0, 0.007));
    let first = filter.filter(1.0, 10.0);
    let second = filter.filter(1.1, 20.0);
    assert!((first - 10.0).abs() < f64::EPSILON);

    // Same timestamp and a timestamp slightly in the past both echo the last output
    assert!((filter.filter(1.1, 500.0) - second).abs() < f64::EPSILON);
    assert!((filter.filter(1.1 - 1e-6, -500.0) - second).abs() < f64::EPSILON);
    assert_eq!(filter.last_value(), Some(second));
}

#[test]
fn test_constant_input_converges() {
    let mut filter = OneEuroFilter::new(SmootherPreset::Smooth.params());
    filter.filter(0.0, 0.0);
    let mut out = 0.0;
    for i in 1..=300 {
        out = filter.filter(f64::from(i) / 30.0, 42.0);
    }
    assert!((out - 42.0).abs() < 1e-3, "filter settled at {out}");
}

#[test]
fn test_smoothing_lags_a_step() {
    let mut filter = OneEuroFilter::new(SmootherPreset::UltraSmooth.params());
    filter.filter(0.0, 0.0);
    let out = filter.filter(1.0 / 30.0, 100.0);
    assert!(out > 0.0 && out < 100.0, "step output {out}");
}

#[test]
fn test_responsive_preset_tracks_faster_than_ultra_smooth() {
    let mut responsive = OneEuroFilter::new(SmootherPreset::Responsive.params());
    let mut smooth = OneEuroFilter::new(SmootherPreset::UltraSmooth.params());
    responsive.filter(0.0, 0.0);
    smooth.filter(0.0, 0.0);
    let fast = responsive.filter(1.0 / 30.0, 100.0);
    let slow = smooth.filter(1.0 / 30.0, 100.0);
    assert!(fast > slow);
}

#[test]
fn test_reset_forgets_history() {
    let mut filter = OneEuroFilter::new(FilterParams::default());
    filter.filter(0.0, 5.0);
    filter.filter(0.1, 6.0);
    filter.reset();
    assert_eq!(filter.last_value(), None);
    assert!((filter.filter(0.0, 99.0) - 99.0).abs() < f64::EPSILON);
}

#[test]
fn test_preset_names_parse() {
    assert_eq!("smooth".parse::<SmootherPreset>().unwrap(), SmootherPreset::Smooth);
    assert_eq!(
        "ULTRA_SMOOTH".parse::<SmootherPreset>().unwrap(),
        SmootherPreset::UltraSmooth
    );
    assert!("jittery".parse::<SmootherPreset>().is_err());
}

#[test]
fn test_invalid_params_rejected() {
    assert!(FilterParams::new(-1.0, 0.1).validate().is_err());
    assert!(FilterParams::new(1.0, -0.1).validate().is_err());
    assert!(FilterParams::new(1.0, 0.0).validate().is_ok());
}

#[test]
fn test_landmark_smoother_keeps_visibility_raw() {
    let mut smoother = LandmarkSmoother::from_preset(SmootherPreset::Smooth);
    let first = vec![Landmark::new(0.5, 0.5, 0.0, 0.9); 3];
    let second = vec![Landmark::new(0.7, 0.3, 0.1, 0.2); 3];
    smoother.filter(0.0, &first);
    let out = smoother.filter(1.0 / 30.0, &second);

    assert_eq!(out.len(), 3);
    for lm in &out {
        assert!(lm.x > 0.5 && lm.x < 0.7);
        assert!(lm.y > 0.3 && lm.y < 0.5);
        assert!((lm.visibility - 0.2).abs() < f64::EPSILON);
    }
}
