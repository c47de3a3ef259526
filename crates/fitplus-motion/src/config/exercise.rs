// ABOUTME: Per-exercise movement patterns: primary metric, phase thresholds, rep timing
// ABOUTME: Built-in catalogue for common exercises; custom patterns load from JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

use super::profile::ScoringProfile;
use crate::metrics::MetricKey;
use crate::phase::{
    reachable_phases, Direction, Phase, PhaseBands, PhaseClassifier, StateThresholds,
};
use crate::rep_counter::{HoldTracker, RepCounter, RepTiming};
use fitplus_core::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// Repetition-based movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepPattern {
    /// Rest and full-range angles
    pub thresholds: StateThresholds,
    /// Which way the angle moves from rest
    #[serde(default)]
    pub direction: Direction,
    /// Noise-rejection timing
    #[serde(default)]
    pub timing: RepTiming,
    /// Named phase bands for accumulator gating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bands: Option<PhaseBands>,
}

/// Static hold with a posture angle kept under a limit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoldPattern {
    /// Largest posture angle still counted as holding
    pub max_angle: f64,
}

/// How an exercise is counted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Motion {
    /// Counted in repetitions
    Reps(RepPattern),
    /// Counted in held time
    Hold(HoldPattern),
}

/// Movement definition for one exercise code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExercisePattern {
    /// Normalized exercise code
    pub code: String,
    /// Metric whose angle drives phase classification
    pub primary_metric: MetricKey,
    /// Counting mode and its parameters
    #[serde(flatten)]
    pub motion: Motion,
}

/// Lowercase, underscore-separated exercise code with aliases folded
#[must_use]
pub fn normalize_code(code: &str) -> String {
    let normalized = code.trim().to_ascii_lowercase().replace(['-', ' '], "_");
    match normalized.as_str() {
        "pushup" | "push_ups" => "push_up".to_owned(),
        "sidesquat" => "side_squat".to_owned(),
        _ => normalized,
    }
}

fn reps(
    code: &str,
    primary_metric: MetricKey,
    (neutral, active): (f64, f64),
    direction: Direction,
    (min_duration_ms, min_active_ms): (f64, f64),
    bands: Option<PhaseBands>,
) -> ExercisePattern {
    ExercisePattern {
        code: code.to_owned(),
        primary_metric,
        motion: Motion::Reps(RepPattern {
            thresholds: StateThresholds { neutral, active },
            direction,
            timing: RepTiming {
                min_duration_ms,
                min_active_ms,
            },
            bands,
        }),
    }
}

impl ExercisePattern {
    /// Built-in pattern for an exercise code
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownExercise` for codes outside the catalogue
    pub fn builtin(code: &str) -> Result<Self, ConfigError> {
        use Direction::{Decrease, Increase};

        let code = normalize_code(code);
        let pattern = match code.as_str() {
            "squat" => reps(&code, MetricKey::KneeAngle, (160.0, 100.0), Decrease, (800.0, 200.0), Some(PhaseBands::squat())),
            "side_squat" => reps(&code, MetricKey::PrimaryKneeAngle, (175.0, 100.0), Decrease, (400.0, 0.0), Some(PhaseBands::squat())),
            "lunge" => reps(&code, MetricKey::KneeAngle, (160.0, 100.0), Decrease, (1000.0, 200.0), Some(PhaseBands::squat())),
            "push_up" => reps(&code, MetricKey::ElbowAngle, (160.0, 90.0), Decrease, (600.0, 150.0), Some(PhaseBands::push_up())),
            "burpee" => reps(&code, MetricKey::HipAngle, (160.0, 90.0), Decrease, (1500.0, 300.0), None),
            "deadlift" => reps(&code, MetricKey::HipAngle, (170.0, 100.0), Decrease, (1200.0, 200.0), None),
            "shoulder_press" => reps(&code, MetricKey::ShoulderAngle, (30.0, 160.0), Increase, (800.0, 150.0), None),
            "bicep_curl" => reps(&code, MetricKey::ElbowAngle, (160.0, 45.0), Decrease, (600.0, 150.0), None),
            "plank" => Self {
                code: code.clone(),
                primary_metric: MetricKey::SpineAngle,
                motion: Motion::Hold(HoldPattern { max_angle: 15.0 }),
            },
            _ => return Err(ConfigError::UnknownExercise(code)),
        };
        Ok(pattern)
    }

    /// Parse and validate a custom pattern
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON and any validation error
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut pattern: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        pattern.code = normalize_code(&pattern.code);
        pattern.validate()?;
        Ok(pattern)
    }

    /// Check thresholds, timing, and hold limits
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` describing the first problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.motion {
            Motion::Reps(pattern) => {
                PhaseClassifier::new(pattern.thresholds, pattern.direction)?;
                let RepTiming {
                    min_duration_ms,
                    min_active_ms,
                } = pattern.timing;
                if !(min_duration_ms.is_finite() && min_duration_ms >= 0.0) {
                    return Err(ConfigError::ValueOutOfRange("min_duration_ms must be >= 0"));
                }
                if !(min_active_ms.is_finite() && min_active_ms >= 0.0) {
                    return Err(ConfigError::ValueOutOfRange("min_active_ms must be >= 0"));
                }
                Ok(())
            }
            Motion::Hold(hold) if hold.max_angle.is_finite() && hold.max_angle >= 0.0 => Ok(()),
            Motion::Hold(_) => Err(ConfigError::ValueOutOfRange("hold max_angle must be >= 0")),
        }
    }

    /// Phase classifier for rep-based exercises
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidRange` for misordered thresholds
    pub fn classifier(&self) -> Result<Option<PhaseClassifier>, ConfigError> {
        let Motion::Reps(pattern) = &self.motion else {
            return Ok(None);
        };
        let classifier = PhaseClassifier::new(pattern.thresholds, pattern.direction)?;
        Ok(Some(match &pattern.bands {
            Some(bands) => classifier.with_bands(bands.clone()),
            None => classifier,
        }))
    }

    /// Fresh rep counter for rep-based exercises
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidRange` for misordered thresholds
    pub fn rep_counter(&self) -> Result<Option<RepCounter>, ConfigError> {
        let Motion::Reps(pattern) = &self.motion else {
            return Ok(None);
        };
        Ok(self
            .classifier()?
            .map(|classifier| RepCounter::new(classifier, pattern.timing)))
    }

    /// Fresh hold tracker for time-based exercises
    #[must_use]
    pub fn hold_tracker(&self) -> Option<HoldTracker> {
        match &self.motion {
            Motion::Hold(hold) => Some(HoldTracker::new(hold.max_angle)),
            Motion::Reps(_) => None,
        }
    }

    /// Phases snapshots of this exercise can carry
    ///
    /// Hold exercises are never classified, so they only report `Unknown`.
    #[must_use]
    pub fn emitted_phases(&self) -> Vec<Phase> {
        match &self.motion {
            Motion::Reps(pattern) => reachable_phases(pattern.bands.as_ref()),
            Motion::Hold(_) => vec![Phase::Unknown],
        }
    }

    /// Check that every phase-gated component of `profile` can receive samples
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnreachablePhases` for the first component whose
    /// phases never occur for this exercise
    pub fn check_profile(&self, profile: &ScoringProfile) -> Result<(), ConfigError> {
        let emitted = self.emitted_phases();
        let unreachable = profile.components.iter().find(|component| {
            component
                .phases
                .as_ref()
                .is_some_and(|phases| !phases.iter().any(|p| emitted.contains(p)))
        });
        match unreachable {
            Some(component) => Err(ConfigError::UnreachablePhases {
                metric: component.key.clone(),
                exercise: self.code.clone(),
                phases: component
                    .phases
                    .iter()
                    .flatten()
                    .copied()
                    .map(Phase::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
            None => Ok(()),
        }
    }

    /// Whether the exercise counts held time instead of reps
    #[must_use]
    pub const fn is_hold(&self) -> bool {
        matches!(self.motion, Motion::Hold(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_resolve() {
        let pattern = ExercisePattern::builtin("PushUp").unwrap();
        assert_eq!(pattern.code, "push_up");
        assert_eq!(pattern.primary_metric, MetricKey::ElbowAngle);
    }

    #[test]
    fn test_unknown_exercise_fails() {
        assert!(matches!(
            ExercisePattern::builtin("handstand"),
            Err(ConfigError::UnknownExercise(_))
        ));
    }

    #[test]
    fn test_every_builtin_validates() {
        for code in [
            "squat",
            "side_squat",
            "lunge",
            "push_up",
            "burpee",
            "deadlift",
            "shoulder_press",
            "bicep_curl",
            "plank",
        ] {
            ExercisePattern::builtin(code).unwrap().validate().unwrap();
        }
    }

    #[test]
    fn test_hold_pattern_only_reports_unknown() {
        let plank = ExercisePattern::builtin("plank").unwrap();
        assert_eq!(plank.emitted_phases(), vec![Phase::Unknown]);
        let deadlift = ExercisePattern::builtin("deadlift").unwrap();
        assert!(deadlift.emitted_phases().contains(&Phase::Active));
        assert!(!deadlift.emitted_phases().contains(&Phase::Bottom));
    }

    #[test]
    fn test_custom_pattern_json() {
        let json = r#"{
            "code": "Goblet-Squat",
            "primary_metric": "knee_angle",
            "mode": "reps",
            "thresholds": {"neutral": 165.0, "active": 95.0},
            "timing": {"min_duration_ms": 700.0, "min_active_ms": 100.0}
        }"#;
        let pattern = ExercisePattern::from_json(json).unwrap();
        assert_eq!(pattern.code, "goblet_squat");
        assert!(pattern.rep_counter().unwrap().is_some());
    }
}
