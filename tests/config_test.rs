// ABOUTME: Integration tests for environment configuration and profile file loading
// ABOUTME: Environment-mutating tests run serially to avoid cross-test interference
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use fitplus::config::{load_pattern, load_profile, MotionConfig};
use fitplus_core::errors::{ConfigError, ErrorCode};
use fitplus_motion::{MetricKey, SmootherPreset};
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

const VARS: [&str; 5] = [
    "FITPLUS_SMOOTHER_PRESET",
    "FITPLUS_SMOOTH_METRICS",
    "FITPLUS_TIMELINE_INTERVAL_MS",
    "FITPLUS_FEEDBACK_SUCCESS_THRESHOLD",
    "FITPLUS_EVENT_BUFFER",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();
    let config = MotionConfig::from_env().unwrap();
    assert_eq!(config, MotionConfig::default());
    assert_eq!(config.tracker.landmark_preset, Some(SmootherPreset::Smooth));
    assert!(config.tracker.smooth_metrics);
}

#[test]
#[serial]
fn test_environment_overrides() {
    clear_env();
    env::set_var("FITPLUS_SMOOTHER_PRESET", "responsive");
    env::set_var("FITPLUS_SMOOTH_METRICS", "off");
    env::set_var("FITPLUS_TIMELINE_INTERVAL_MS", "500");
    env::set_var("FITPLUS_FEEDBACK_SUCCESS_THRESHOLD", "85");
    env::set_var("FITPLUS_EVENT_BUFFER", "16");

    let config = MotionConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.tracker.landmark_preset, Some(SmootherPreset::Responsive));
    assert!(!config.tracker.smooth_metrics);
    assert!((config.timeline_interval_ms - 500.0).abs() < f64::EPSILON);
    assert!((config.success_threshold - 85.0).abs() < f64::EPSILON);
    assert_eq!(config.event_buffer, 16);
}

#[test]
#[serial]
fn test_preset_none_disables_landmark_smoothing() {
    clear_env();
    env::set_var("FITPLUS_SMOOTHER_PRESET", "none");
    let config = MotionConfig::from_env().unwrap();
    clear_env();
    assert_eq!(config.tracker.landmark_preset, None);
}

#[test]
#[serial]
fn test_invalid_values_rejected() {
    clear_env();
    env::set_var("FITPLUS_TIMELINE_INTERVAL_MS", "soon");
    assert!(matches!(MotionConfig::from_env(), Err(ConfigError::Parse(_))));

    env::set_var("FITPLUS_TIMELINE_INTERVAL_MS", "0");
    assert!(matches!(
        MotionConfig::from_env(),
        Err(ConfigError::ValueOutOfRange(_))
    ));
    clear_env();

    env::set_var("FITPLUS_FEEDBACK_SUCCESS_THRESHOLD", "120");
    assert!(MotionConfig::from_env().is_err());
    clear_env();

    env::set_var("FITPLUS_SMOOTH_METRICS", "maybe");
    assert!(MotionConfig::from_env().is_err());
    clear_env();
}

#[tokio::test]
async fn test_load_builtins_without_files() {
    let profile = load_profile(None, "side squat").await.unwrap();
    assert_eq!(profile.exercise_code, "side_squat");
    let pattern = load_pattern(None, "push-up").await.unwrap();
    assert_eq!(pattern.primary_metric, MetricKey::ElbowAngle);

    let plank = load_profile(None, "plank").await.unwrap();
    assert_eq!(plank.exercise_code, "plank");

    let error = load_profile(None, "handstand").await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ConfigInvalid);
}

#[tokio::test]
async fn test_load_profile_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "exercise_code": "squat",
            "profile_id": 11,
            "metrics": [{{
                "key": "depth",
                "metric_key": "knee_angle",
                "weight": 1,
                "aggregation": "p05",
                "rule": {{ "type": "range", "ideal_min": 80, "ideal_max": 110, "hard_min": 70, "hard_max": 150 }}
            }}]
        }}"#
    )
    .unwrap();

    let profile = load_profile(Some(file.path()), "ignored").await.unwrap();
    assert_eq!(profile.profile_id, Some(11));
    assert_eq!(profile.components.len(), 1);
}

#[tokio::test]
async fn test_load_errors_carry_codes() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{ "exercise_code": "squat", "metrics": [] }}"#).unwrap();
    let error = load_profile(Some(file.path()), "squat").await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ConfigInvalid);

    let missing = file.path().with_extension("missing");
    let error = load_pattern(Some(&missing), "squat").await.unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
}
