// ABOUTME: Built-in scoring profiles for every exercise in the movement catalogue
// ABOUTME: Used when no external profile is supplied for an exercise
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

use super::exercise::normalize_code;
use super::profile::{ProfileMetricSpec, RuleSpec, ScoringProfile, ScoringProfileSpec};
use fitplus_core::constants::scoring::FULL_SCORE;
use fitplus_core::errors::ConfigError;
use std::collections::BTreeMap;

struct Entry {
    key: &'static str,
    label: &'static str,
    metric_key: &'static str,
    aggregation: &'static str,
    kind: &'static str,
    weight: f64,
    ideal: (f64, f64),
    hard: (f64, f64),
    phases: Option<&'static [&'static str]>,
}

const TEMPO: Entry = Entry {
    key: "tempo",
    label: "Tempo",
    metric_key: "rep_interval_ms",
    aggregation: "last",
    kind: "range",
    weight: 0.15,
    ideal: (800.0, 2500.0),
    hard: (400.0, 5000.0),
    phases: None,
};

const DEPTH_PHASES: &[&str] = &["mid", "bottom"];
const ACTIVE_PHASES: &[&str] = &["active"];

const fn tempo(ideal: (f64, f64), hard: (f64, f64)) -> Entry {
    Entry {
        ideal,
        hard,
        ..TEMPO
    }
}

const fn upright(ideal_max: f64, hard_max: f64) -> Entry {
    Entry {
        key: "torso_lean",
        label: "Torso lean",
        metric_key: "torso_lean",
        aggregation: "p95",
        kind: "max",
        weight: 0.3,
        ideal: (0.0, ideal_max),
        hard: (0.0, hard_max),
        phases: None,
    }
}

const SIDE_SQUAT: &[Entry] = &[
    Entry {
        key: "depth",
        label: "Squat depth",
        metric_key: "primary_knee_angle",
        aggregation: "p05",
        kind: "range",
        weight: 0.35,
        ideal: (80.0, 110.0),
        hard: (70.0, 150.0),
        phases: Some(DEPTH_PHASES),
    },
    Entry {
        key: "hip_hinge",
        label: "Hip hinge",
        metric_key: "primary_hip_angle",
        aggregation: "p05",
        kind: "max",
        weight: 0.25,
        ideal: (0.0, 140.0),
        hard: (0.0, 160.0),
        phases: Some(DEPTH_PHASES),
    },
    Entry {
        key: "torso_lean",
        label: "Torso lean",
        metric_key: "torso_lean",
        aggregation: "p95",
        kind: "max",
        weight: 0.25,
        ideal: (0.0, 25.0),
        hard: (0.0, 45.0),
        phases: None,
    },
    Entry {
        key: "knee_forward",
        label: "Knee travel",
        metric_key: "knee_forward_ratio",
        aggregation: "p95",
        kind: "max",
        weight: 0.15,
        ideal: (0.0, 0.06),
        hard: (0.0, 0.10),
        phases: None,
    },
    TEMPO,
];

const PUSH_UP: &[Entry] = &[
    Entry {
        key: "depth",
        label: "Push-up depth",
        metric_key: "elbow_angle",
        aggregation: "p05",
        kind: "range",
        weight: 0.35,
        ideal: (75.0, 115.0),
        hard: (70.0, 140.0),
        phases: Some(DEPTH_PHASES),
    },
    Entry {
        key: "body_line",
        label: "Body line",
        metric_key: "body_angle",
        aggregation: "p05",
        kind: "min",
        weight: 0.30,
        ideal: (170.0, 180.0),
        hard: (160.0, 180.0),
        phases: None,
    },
    Entry {
        key: "wrist_stack",
        label: "Wrist stack",
        metric_key: "wrist_shoulder_offset",
        aggregation: "p95",
        kind: "max",
        weight: 0.15,
        ideal: (0.0, 0.05),
        hard: (0.0, 0.08),
        phases: None,
    },
    Entry {
        key: "hip_sag",
        label: "Hip sag",
        metric_key: "hip_angle",
        aggregation: "p05",
        kind: "min",
        weight: 0.20,
        ideal: (170.0, 180.0),
        hard: (160.0, 180.0),
        phases: None,
    },
    TEMPO,
];

const LUNGE: &[Entry] = &[
    Entry {
        key: "depth",
        label: "Lunge depth",
        metric_key: "knee_angle",
        aggregation: "p05",
        kind: "range",
        weight: 0.45,
        ideal: (80.0, 110.0),
        hard: (65.0, 145.0),
        phases: Some(DEPTH_PHASES),
    },
    upright(20.0, 40.0),
    tempo((1000.0, 3000.0), (500.0, 6000.0)),
];

const BURPEE: &[Entry] = &[
    Entry {
        key: "hip_drop",
        label: "Hip drop",
        metric_key: "hip_angle",
        aggregation: "min",
        kind: "max",
        weight: 0.6,
        ideal: (0.0, 100.0),
        hard: (0.0, 140.0),
        phases: Some(ACTIVE_PHASES),
    },
    tempo((1500.0, 4000.0), (800.0, 8000.0)),
];

const DEADLIFT: &[Entry] = &[
    Entry {
        key: "hinge_depth",
        label: "Hinge depth",
        metric_key: "hip_angle",
        aggregation: "p05",
        kind: "range",
        weight: 0.4,
        ideal: (80.0, 110.0),
        hard: (60.0, 140.0),
        phases: Some(ACTIVE_PHASES),
    },
    Entry {
        key: "back_line",
        label: "Back line",
        metric_key: "spine_angle",
        aggregation: "p95",
        kind: "max",
        weight: 0.45,
        ideal: (0.0, 20.0),
        hard: (0.0, 35.0),
        phases: None,
    },
    tempo((1200.0, 4000.0), (600.0, 8000.0)),
];

const SHOULDER_PRESS: &[Entry] = &[
    Entry {
        key: "lockout",
        label: "Lockout",
        metric_key: "shoulder_angle",
        aggregation: "p95",
        kind: "min",
        weight: 0.55,
        ideal: (160.0, 180.0),
        hard: (130.0, 180.0),
        phases: Some(ACTIVE_PHASES),
    },
    upright(10.0, 25.0),
    tempo((1000.0, 3000.0), (500.0, 6000.0)),
];

const BICEP_CURL: &[Entry] = &[
    Entry {
        key: "curl_range",
        label: "Curl range",
        metric_key: "elbow_angle",
        aggregation: "p05",
        kind: "max",
        weight: 0.55,
        ideal: (0.0, 60.0),
        hard: (0.0, 90.0),
        phases: Some(ACTIVE_PHASES),
    },
    upright(10.0, 25.0),
    tempo((800.0, 3000.0), (400.0, 6000.0)),
];

const PLANK: &[Entry] = &[
    Entry {
        key: "back_line",
        label: "Back line",
        metric_key: "spine_angle",
        aggregation: "mean",
        kind: "max",
        weight: 0.6,
        ideal: (0.0, 10.0),
        hard: (0.0, 25.0),
        phases: None,
    },
    Entry {
        key: "body_line",
        label: "Body line",
        metric_key: "body_angle",
        aggregation: "mean",
        kind: "min",
        weight: 0.4,
        ideal: (165.0, 180.0),
        hard: (145.0, 180.0),
        phases: None,
    },
];

impl Entry {
    fn to_spec(&self, metric_key: &str) -> ProfileMetricSpec {
        ProfileMetricSpec {
            key: self.key.to_owned(),
            label: Some(self.label.to_owned()),
            metric_key: metric_key.to_owned(),
            metric_id: None,
            weight: self.weight,
            max_score: FULL_SCORE,
            aggregation: self.aggregation.to_owned(),
            rule: RuleSpec {
                kind: self.kind.to_owned(),
                ideal_min: self.ideal.0,
                ideal_max: self.ideal.1,
                hard_min: self.hard.0,
                hard_max: self.hard.1,
            },
            phases: self
                .phases
                .map(|phases| phases.iter().map(|p| (*p).to_owned()).collect()),
            feedback: BTreeMap::new(),
        }
    }
}

fn specs(entries: &[Entry]) -> Vec<ProfileMetricSpec> {
    entries.iter().map(|e| e.to_spec(e.metric_key)).collect()
}

impl ScoringProfile {
    /// Built-in profile for an exercise code
    ///
    /// Plain `squat` reuses the side-squat components with bilateral knee
    /// and hip metrics.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownExercise` when no built-in profile exists
    pub fn builtin(exercise_code: &str) -> Result<Self, ConfigError> {
        let code = normalize_code(exercise_code);
        let (name, metrics): (&str, Vec<ProfileMetricSpec>) = match code.as_str() {
            "side_squat" => ("Side squat", specs(SIDE_SQUAT)),
            "squat" => (
                "Squat",
                SIDE_SQUAT
                    .iter()
                    .map(|e| match e.metric_key {
                        "primary_knee_angle" => e.to_spec("knee_angle"),
                        "primary_hip_angle" => e.to_spec("hip_angle"),
                        other => e.to_spec(other),
                    })
                    .collect(),
            ),
            "push_up" => ("Push-up", specs(PUSH_UP)),
            "lunge" => ("Lunge", specs(LUNGE)),
            "burpee" => ("Burpee", specs(BURPEE)),
            "deadlift" => ("Deadlift", specs(DEADLIFT)),
            "shoulder_press" => ("Shoulder press", specs(SHOULDER_PRESS)),
            "bicep_curl" => ("Bicep curl", specs(BICEP_CURL)),
            "plank" => ("Plank", specs(PLANK)),
            _ => return Err(ConfigError::UnknownExercise(code)),
        };
        Self::try_from(ScoringProfileSpec {
            exercise_code: code,
            profile_id: None,
            name: Some(name.to_owned()),
            metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExercisePattern;
    use crate::metrics::MetricKey;

    const CATALOGUE: [&str; 9] = [
        "squat",
        "side_squat",
        "lunge",
        "push_up",
        "burpee",
        "deadlift",
        "shoulder_press",
        "bicep_curl",
        "plank",
    ];

    #[test]
    fn test_builtin_profiles_load() {
        for code in CATALOGUE {
            let profile = ScoringProfile::builtin(code).unwrap();
            assert!(profile.components.iter().all(|c| c.metric.key().is_some()));
        }
    }

    #[test]
    fn test_every_catalogue_exercise_pairs_with_its_profile() {
        for code in CATALOGUE {
            let pattern = ExercisePattern::builtin(code).unwrap();
            let profile = ScoringProfile::builtin(code).unwrap();
            pattern.check_profile(&profile).unwrap();
        }
    }

    #[test]
    fn test_squat_uses_bilateral_knee() {
        let profile = ScoringProfile::builtin("squat").unwrap();
        assert_eq!(profile.components[0].metric.key(), Some(MetricKey::KneeAngle));
    }
}
