// ABOUTME: Integration tests for scoring rules, weighted totals, and rep feedback
// ABOUTME: Exercises the scoring engine through accumulators the way a session does
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use fitplus_core::models::Side;
use fitplus_motion::scoring::{RuleKind, ScoringRule};
use fitplus_motion::{
    AngleSource, FeedbackLevel, MetricKey, MetricsSnapshot, Phase, RepEvent, ScoreStatus,
    ScoringEngine, ScoringProfile,
};

const TWO_METRIC_PROFILE: &str = r#"{
    "exercise_code": "squat",
    "metrics": [
        {
            "key": "depth",
            "metric_key": "knee_angle",
            "weight": 0.6,
            "aggregation": "min",
            "rule": { "type": "range", "ideal_min": 80, "ideal_max": 110, "hard_min": 70, "hard_max": 150 }
        },
        {
            "key": "hinge",
            "metric_key": "hip_angle",
            "weight": 0.4,
            "aggregation": "min",
            "rule": { "type": "max", "ideal_min": 0, "ideal_max": 140, "hard_min": 0, "hard_max": 160 }
        }
    ]
}"#;

fn depth_rule() -> ScoringRule {
    ScoringRule::new(RuleKind::Range, (80.0, 110.0), (70.0, 150.0))
}

fn rep_event() -> RepEvent {
    RepEvent {
        rep_index: 1,
        rep_interval_ms: 1500.0,
        duration_ms: 1500.0,
        active_time_ms: 600.0,
        completed_at_ms: 1500.0,
        frame_score: Some(64.0),
        used_fallback_samples: false,
    }
}

fn snapshot(t: f64, values: &[(MetricKey, f64)]) -> MetricsSnapshot {
    let mut snapshot = MetricsSnapshot::new(t, Side::Left, AngleSource::Normalized);
    for (key, value) in values {
        snapshot.set(*key, Some(*value));
    }
    snapshot
}

#[test]
fn test_range_rule_scores() {
    let rule = depth_rule();
    assert_eq!(rule.score(90.0), (100.0, ScoreStatus::Ok));
    assert_eq!(rule.score(70.0), (0.0, ScoreStatus::TooLow));
    assert_eq!(rule.score(150.0), (0.0, ScoreStatus::TooHigh));

    let (at_75, status) = rule.score(75.0);
    assert_eq!(status, ScoreStatus::Low);
    assert!(at_75 > 0.0 && at_75 < 100.0);
    assert!(rule.score(78.0).0 > at_75, "score must rise toward the ideal band");
}

#[test]
fn test_scores_stay_in_bounds() {
    let rule = depth_rule();
    for value in [-1e9, 0.0, 69.9, 79.99, 110.01, 149.9, 1e9] {
        let (score, _) = rule.score(value);
        assert!((0.0..=100.0).contains(&score), "{value} scored {score}");
    }
}

#[test]
fn test_degenerate_band_does_not_divide_by_zero() {
    let rule = ScoringRule::new(RuleKind::Max, (0.0, 10.0), (0.0, 10.0));
    let (score, status) = rule.score(10.5);
    assert!(score.is_finite());
    assert_eq!(status, ScoreStatus::TooHigh);
}

#[test]
fn test_missing_metric_excluded_from_total() {
    let profile = ScoringProfile::from_json(TWO_METRIC_PROFILE).unwrap();
    let mut accumulators = profile.accumulators();
    let engine = ScoringEngine::new(profile);

    // 78 degrees scores 80; hip angle never observed
    accumulators.update(&snapshot(0.0, &[(MetricKey::KneeAngle, 78.0)]));
    let result = engine.score_rep(&accumulators, &rep_event());

    assert_eq!(result.components[0].score, Some(80.0));
    assert_eq!(result.components[1].status, ScoreStatus::Missing);
    assert_eq!(result.total, Some(80.0));
    assert_eq!(result.effective_score(), Some(80.0));
}

#[test]
fn test_all_missing_falls_back_to_frame_score() {
    let profile = ScoringProfile::from_json(TWO_METRIC_PROFILE).unwrap();
    let accumulators = profile.accumulators();
    let engine = ScoringEngine::new(profile);

    let result = engine.score_rep(&accumulators, &rep_event());
    assert_eq!(result.total, None);
    assert_eq!(result.effective_score(), Some(64.0));
}

#[test]
fn test_weighted_total_combines_components() {
    let profile = ScoringProfile::from_json(TWO_METRIC_PROFILE).unwrap();
    let mut accumulators = profile.accumulators();
    let engine = ScoringEngine::new(profile);

    accumulators.update(&snapshot(
        0.0,
        &[(MetricKey::KneeAngle, 90.0), (MetricKey::HipAngle, 150.0)],
    ));
    let result = engine.score_rep(&accumulators, &rep_event());
    // 0.6 * 100 + 0.4 * 50
    assert_eq!(result.total, Some(80.0));
    assert_eq!(result.components[1].status, ScoreStatus::High);
}

#[test]
fn test_points_scale_with_max_score() {
    let json = TWO_METRIC_PROFILE.replace("\"weight\": 0.6,", "\"weight\": 0.6, \"max_score\": 20,");
    let profile = ScoringProfile::from_json(&json).unwrap();
    let mut accumulators = profile.accumulators();
    let engine = ScoringEngine::new(profile);
    accumulators.update(&snapshot(0.0, &[(MetricKey::KneeAngle, 78.0)]));

    let result = engine.score_rep(&accumulators, &rep_event());
    assert_eq!(result.components[0].points, Some(16.0));
}

#[test]
fn test_frame_score_skips_components_outside_their_phases() {
    let profile = ScoringProfile::builtin("side_squat").unwrap();
    let engine = ScoringEngine::new(profile);

    let mut standing = snapshot(
        0.0,
        &[(MetricKey::PrimaryKneeAngle, 170.0), (MetricKey::TorsoLean, 10.0)],
    );
    standing.phase = Phase::Standing;
    let frame = engine.score_frame(&standing);

    let depth = frame.components.iter().find(|c| c.key == "depth").unwrap();
    assert_eq!(depth.status, ScoreStatus::Skipped);
    assert_eq!(depth.score, None);
    let lean = frame.components.iter().find(|c| c.key == "torso_lean").unwrap();
    assert_eq!(lean.status, ScoreStatus::Ok);
    assert_eq!(frame.total, Some(100.0));
}

#[test]
fn test_feedback_levels_follow_worst_component() {
    let profile = ScoringProfile::from_json(TWO_METRIC_PROFILE).unwrap();
    let engine = ScoringEngine::new(profile.clone());

    let mut clean = profile.accumulators();
    clean.update(&snapshot(0.0, &[(MetricKey::KneeAngle, 95.0), (MetricKey::HipAngle, 100.0)]));
    assert_eq!(
        engine.score_rep(&clean, &rep_event()).feedback.level,
        FeedbackLevel::Success
    );

    let mut minor = profile.accumulators();
    minor.update(&snapshot(0.0, &[(MetricKey::KneeAngle, 95.0), (MetricKey::HipAngle, 146.0)]));
    let feedback = engine.score_rep(&minor, &rep_event()).feedback;
    assert_eq!(feedback.level, FeedbackLevel::Info);
    assert_eq!(feedback.component.as_deref(), Some("hinge"));

    let mut bad = profile.accumulators();
    bad.update(&snapshot(0.0, &[(MetricKey::KneeAngle, 155.0), (MetricKey::HipAngle, 100.0)]));
    let feedback = engine.score_rep(&bad, &rep_event()).feedback;
    assert_eq!(feedback.level, FeedbackLevel::Warning);
    assert_eq!(feedback.component.as_deref(), Some("depth"));
    assert!(feedback.message.contains("Sit lower"));
}

#[test]
fn test_profile_feedback_overrides_builtin_messages() {
    let json = TWO_METRIC_PROFILE.replace(
        "\"aggregation\": \"min\",\n            \"rule\": { \"type\": \"range\"",
        "\"aggregation\": \"min\", \"feedback\": { \"too_high\": \"Deeper please\" },\n            \"rule\": { \"type\": \"range\"",
    );
    let profile = ScoringProfile::from_json(&json).unwrap();
    let mut accumulators = profile.accumulators();
    let engine = ScoringEngine::new(profile);
    accumulators.update(&snapshot(0.0, &[(MetricKey::KneeAngle, 160.0)]));

    let result = engine.score_rep(&accumulators, &rep_event());
    assert_eq!(result.components[0].feedback.as_deref(), Some("Deeper please"));
    assert_eq!(result.feedback.message, "Deeper please");
}
