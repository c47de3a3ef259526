// ABOUTME: Integration tests for scoring profile and exercise pattern validation
// ABOUTME: Misconfigured documents must fail at load time with a specific error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use fitplus_core::errors::ConfigError;
use fitplus_motion::{Aggregation, ExercisePattern, MetricKey, MetricSource, ScoringProfile};

fn profile_json(metric: &str) -> String {
    format!(r#"{{ "exercise_code": "Side-Squat", "profile_id": 7, "metrics": [{metric}] }}"#)
}

const DEPTH: &str = r#"{
    "key": "depth",
    "metric_key": "primary_knee_angle",
    "weight": 0.5,
    "aggregation": "p05",
    "rule": { "type": "range", "ideal_min": 80, "ideal_max": 110, "hard_min": 70, "hard_max": 150 },
    "phases": ["mid", "bottom"]
}"#;

#[test]
fn test_valid_profile_normalizes_exercise_code() {
    let profile = ScoringProfile::from_json(&profile_json(DEPTH)).unwrap();
    assert_eq!(profile.exercise_code, "side_squat");
    assert_eq!(profile.profile_id, Some(7));
    assert_eq!(profile.components[0].aggregation, Aggregation::P05);
    assert_eq!(
        profile.components[0].metric,
        MetricSource::Known(MetricKey::PrimaryKneeAngle)
    );
}

#[test]
fn test_inverted_ideal_bounds_rejected() {
    let json = profile_json(&DEPTH.replace("\"ideal_min\": 80", "\"ideal_min\": 120"));
    assert!(matches!(
        ScoringProfile::from_json(&json),
        Err(ConfigError::InvalidBounds { metric, .. }) if metric == "depth"
    ));
}

#[test]
fn test_ideal_outside_hard_bounds_rejected() {
    let json = profile_json(&DEPTH.replace("\"hard_min\": 70", "\"hard_min\": 85"));
    assert!(matches!(
        ScoringProfile::from_json(&json),
        Err(ConfigError::InvalidBounds { .. })
    ));
}

#[test]
fn test_negative_weight_rejected() {
    let json = profile_json(&DEPTH.replace("0.5", "-0.5"));
    assert!(matches!(
        ScoringProfile::from_json(&json),
        Err(ConfigError::InvalidWeight { .. })
    ));
}

#[test]
fn test_unknown_aggregation_rejected() {
    let json = profile_json(&DEPTH.replace("p05", "median"));
    assert!(matches!(
        ScoringProfile::from_json(&json),
        Err(ConfigError::UnknownAggregation(name)) if name == "median"
    ));
}

#[test]
fn test_unknown_rule_kind_rejected() {
    let json = profile_json(&DEPTH.replace("\"range\"", "\"bell\""));
    assert!(matches!(
        ScoringProfile::from_json(&json),
        Err(ConfigError::UnknownRuleKind(_))
    ));
}

#[test]
fn test_unknown_phase_rejected() {
    let json = profile_json(&DEPTH.replace("\"bottom\"", "\"hole\""));
    assert!(matches!(
        ScoringProfile::from_json(&json),
        Err(ConfigError::UnknownPhase(_))
    ));
}

#[test]
fn test_empty_profile_rejected() {
    let json = r#"{ "exercise_code": "squat", "metrics": [] }"#;
    assert!(matches!(
        ScoringProfile::from_json(json),
        Err(ConfigError::EmptyProfile)
    ));
}

#[test]
fn test_malformed_json_is_parse_error() {
    assert!(matches!(
        ScoringProfile::from_json("{ not json"),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_camel_case_aliases_accepted() {
    let metric = r#"{
        "key": "lean",
        "metricKey": "torso_angle",
        "metricId": 42,
        "maxScore": 25,
        "weight": 1,
        "agg": "p95",
        "rule": { "kind": "max", "ideal_min": 0, "ideal_max": 25, "hard_min": 0, "hard_max": 45 }
    }"#;
    let json = format!(r#"{{ "exerciseCode": "squat", "profileId": 3, "metrics": [{metric}] }}"#);
    let profile = ScoringProfile::from_json(&json).unwrap();
    let component = &profile.components[0];
    assert_eq!(component.metric, MetricSource::Known(MetricKey::TorsoLean));
    assert_eq!(component.metric_id, Some(42));
    assert!((component.max_score - 25.0).abs() < f64::EPSILON);
    assert_eq!(component.aggregation, Aggregation::P95);
}

#[test]
fn test_unmapped_metric_loads_and_is_not_tracked() {
    let json = profile_json(&DEPTH.replace("primary_knee_angle", "ankle_wobble"));
    let profile = ScoringProfile::from_json(&json).unwrap();
    assert_eq!(
        profile.components[0].metric,
        MetricSource::Unmapped("ankle_wobble".to_owned())
    );
    assert_eq!(profile.metric_keys().count(), 0);
}

#[test]
fn test_builtin_profiles_are_valid() {
    for code in ["side_squat", "squat", "push_up", "Push-Up"] {
        let profile = ScoringProfile::builtin(code).unwrap();
        assert!(!profile.components.is_empty(), "{code}");
        let weight: f64 = profile.components.iter().map(|c| c.weight).sum();
        assert!(weight > 0.0);
    }
    assert!(matches!(
        ScoringProfile::builtin("handstand"),
        Err(ConfigError::UnknownExercise(_))
    ));
}

#[test]
fn test_builtin_patterns() {
    let side = ExercisePattern::builtin("side_squat").unwrap();
    assert_eq!(side.primary_metric, MetricKey::PrimaryKneeAngle);
    assert!(!side.is_hold());

    let plank = ExercisePattern::builtin("plank").unwrap();
    assert!(plank.is_hold());
    assert!(plank.rep_counter().unwrap().is_none());
    assert!(plank.hold_tracker().is_some());
}

#[test]
fn test_custom_pattern_with_bad_thresholds_rejected() {
    let json = r#"{
        "code": "box_squat",
        "primary_metric": "knee_angle",
        "mode": "reps",
        "thresholds": { "neutral": 90, "active": 160 },
        "direction": "decrease",
        "timing": { "min_duration_ms": 500, "min_active_ms": 100 }
    }"#;
    assert!(matches!(
        ExercisePattern::from_json(json),
        Err(ConfigError::InvalidRange(_))
    ));

    let fixed = json.replace("\"neutral\": 90", "\"neutral\": 165");
    let pattern = ExercisePattern::from_json(&fixed).unwrap();
    assert_eq!(pattern.code, "box_squat");
    assert!(pattern.rep_counter().unwrap().is_some());
}
