// ABOUTME: Repetition state machine with noise rejection, plus a time-based hold tracker
// ABOUTME: Completed reps carry timing and a trimmed-mean score of their frame scores
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

use crate::phase::{PhaseClassifier, RepState};
use fitplus_core::constants::reps::{TRIM_FRACTION, TRIM_MIN_SAMPLES};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Mean after dropping the top and bottom 10% of samples
///
/// Trimming applies only with at least ten samples. Non-finite samples are
/// ignored; an empty input yields `None`.
#[must_use]
pub fn trimmed_mean(samples: &[f64]) -> Option<f64> {
    let mut sorted: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let trim = if sorted.len() >= TRIM_MIN_SAMPLES {
        (sorted.len() as f64 * TRIM_FRACTION).floor() as usize
    } else {
        0
    };
    let kept = &sorted[trim..sorted.len() - trim];
    Some(kept.iter().sum::<f64>() / kept.len() as f64)
}

/// Minimum timing a rep must satisfy to count
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RepTiming {
    /// Minimum time from rep start to return to neutral (ms)
    pub min_duration_ms: f64,
    /// Minimum accumulated time in the active state (ms)
    pub min_active_ms: f64,
}

/// Why a rep attempt was discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepRejection {
    /// Returned to neutral without ever reaching the active state
    NoActivePhase,
    /// Completed faster than the minimum duration
    TooShort,
    /// Spent less than the minimum time in the active state
    InsufficientActiveTime,
}

/// A completed repetition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepEvent {
    /// 1-based rep number
    pub rep_index: u32,
    /// Time since the previous completed rep, or this rep's duration for the first
    pub rep_interval_ms: f64,
    /// Rep start to return to neutral
    pub duration_ms: f64,
    /// Time spent in the active state
    pub active_time_ms: f64,
    /// Timestamp of the completing frame
    pub completed_at_ms: f64,
    /// Trimmed mean of the rep's frame scores
    pub frame_score: Option<f64>,
    /// Whether the score fell back to non-active samples
    pub used_fallback_samples: bool,
}

#[derive(Debug, Clone, Default)]
struct RepInProgress {
    started_at_ms: f64,
    reached_active: bool,
    active_since_ms: Option<f64>,
    active_time_ms: f64,
    active_scores: Vec<f64>,
    all_scores: Vec<f64>,
}

/// Counts repetitions from a stream of rep states
///
/// NEUTRAL to anything else starts a rep. Returning to NEUTRAL completes it
/// when it reached ACTIVE and satisfied the timing constraints, and cancels
/// it otherwise. UNKNOWN frames are ignored entirely.
#[derive(Debug, Clone)]
pub struct RepCounter {
    classifier: PhaseClassifier,
    timing: RepTiming,
    state: RepState,
    count: u32,
    rejected: u32,
    last_completed_ms: Option<f64>,
    current: Option<RepInProgress>,
}

impl RepCounter {
    /// Create a counter in the NEUTRAL state
    #[must_use]
    pub const fn new(classifier: PhaseClassifier, timing: RepTiming) -> Self {
        Self {
            classifier,
            timing,
            state: RepState::Neutral,
            count: 0,
            rejected: 0,
            last_completed_ms: None,
            current: None,
        }
    }

    /// Classify a primary angle and advance
    pub fn update(
        &mut self,
        timestamp_ms: f64,
        primary_angle: Option<f64>,
        frame_score: Option<f64>,
    ) -> Option<RepEvent> {
        let state = self.classifier.classify_state(primary_angle);
        self.advance(timestamp_ms, state, frame_score)
    }

    /// Advance with an already-classified state
    pub fn advance(
        &mut self,
        timestamp_ms: f64,
        state: RepState,
        frame_score: Option<f64>,
    ) -> Option<RepEvent> {
        if state == RepState::Unknown {
            return None;
        }
        let previous = self.state;
        self.state = state;

        if previous == RepState::Neutral && state != RepState::Neutral {
            debug!(timestamp_ms, "Rep started");
            self.current = Some(RepInProgress {
                started_at_ms: timestamp_ms,
                ..RepInProgress::default()
            });
        }

        let rep = self.current.as_mut()?;

        if previous != RepState::Active && state == RepState::Active {
            rep.reached_active = true;
            rep.active_since_ms = Some(timestamp_ms);
        } else if previous == RepState::Active && state != RepState::Active {
            if let Some(since) = rep.active_since_ms.take() {
                rep.active_time_ms += timestamp_ms - since;
            }
        }

        if state != RepState::Neutral {
            if let Some(score) = frame_score.filter(|s| s.is_finite()) {
                rep.all_scores.push(score);
                if state == RepState::Active {
                    rep.active_scores.push(score);
                }
            }
            return None;
        }

        let rep = self.current.take()?;
        let duration_ms = timestamp_ms - rep.started_at_ms;
        let rejection = if !rep.reached_active {
            Some(RepRejection::NoActivePhase)
        } else if duration_ms < self.timing.min_duration_ms {
            Some(RepRejection::TooShort)
        } else if rep.active_time_ms < self.timing.min_active_ms {
            Some(RepRejection::InsufficientActiveTime)
        } else {
            None
        };
        if let Some(reason) = rejection {
            self.rejected += 1;
            debug!(?reason, duration_ms, active_time_ms = rep.active_time_ms, "Rep rejected");
            return None;
        }

        Some(self.complete(timestamp_ms, duration_ms, rep))
    }

    fn complete(&mut self, timestamp_ms: f64, duration_ms: f64, rep: RepInProgress) -> RepEvent {
        self.count += 1;
        let rep_interval_ms = self
            .last_completed_ms
            .map_or(duration_ms, |last| timestamp_ms - last);
        self.last_completed_ms = Some(timestamp_ms);

        let used_fallback_samples = rep.active_scores.is_empty();
        let samples = if used_fallback_samples {
            &rep.all_scores
        } else {
            &rep.active_scores
        };

        debug!(rep_index = self.count, duration_ms, rep_interval_ms, "Rep completed");
        RepEvent {
            rep_index: self.count,
            rep_interval_ms,
            duration_ms,
            active_time_ms: rep.active_time_ms,
            completed_at_ms: timestamp_ms,
            frame_score: trimmed_mean(samples),
            used_fallback_samples,
        }
    }

    /// Completed reps so far
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Rep attempts discarded as noise
    #[must_use]
    pub const fn rejected(&self) -> u32 {
        self.rejected
    }

    /// Current rep state
    #[must_use]
    pub const fn state(&self) -> RepState {
        self.state
    }

    /// Whether a rep attempt is underway
    #[must_use]
    pub const fn in_progress(&self) -> bool {
        self.current.is_some()
    }

    /// Classifier used by [`Self::update`]
    #[must_use]
    pub const fn classifier(&self) -> &PhaseClassifier {
        &self.classifier
    }

    /// Return to a fresh NEUTRAL counter
    pub fn reset(&mut self) {
        self.state = RepState::Neutral;
        self.count = 0;
        self.rejected = 0;
        self.last_completed_ms = None;
        self.current = None;
    }
}

/// Hold status for time-based exercises
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoldStatus {
    /// Whether the posture is currently within tolerance
    pub holding: bool,
    /// Current posture angle
    pub angle: Option<f64>,
    /// Total time held (ms)
    pub held_ms: f64,
    /// Longest unbroken hold (ms)
    pub best_streak_ms: f64,
}

/// Accumulates time spent with a posture angle at or under a limit
#[derive(Debug, Clone)]
pub struct HoldTracker {
    max_angle: f64,
    last_timestamp_ms: Option<f64>,
    holding: bool,
    held_ms: f64,
    streak_ms: f64,
    best_streak_ms: f64,
}

impl HoldTracker {
    /// Track holds with the posture angle kept at or below `max_angle`
    #[must_use]
    pub const fn new(max_angle: f64) -> Self {
        Self {
            max_angle,
            last_timestamp_ms: None,
            holding: false,
            held_ms: 0.0,
            streak_ms: 0.0,
            best_streak_ms: 0.0,
        }
    }

    /// Advance with the posture angle observed at `timestamp_ms`
    ///
    /// Time between two consecutive holding frames counts as held.
    pub fn update(&mut self, timestamp_ms: f64, angle: Option<f64>) -> HoldStatus {
        let holding = angle.is_some_and(|a| a <= self.max_angle);
        if let Some(last) = self.last_timestamp_ms {
            let dt = timestamp_ms - last;
            if holding && self.holding && dt > 0.0 {
                self.held_ms += dt;
                self.streak_ms += dt;
                self.best_streak_ms = self.best_streak_ms.max(self.streak_ms);
            }
        }
        if !holding {
            self.streak_ms = 0.0;
        }
        self.holding = holding;
        self.last_timestamp_ms = Some(timestamp_ms);

        HoldStatus {
            holding,
            angle,
            held_ms: self.held_ms,
            best_streak_ms: self.best_streak_ms,
        }
    }

    /// Forget all held time
    pub fn reset(&mut self) {
        *self = Self::new(self.max_angle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::{Direction, StateThresholds};

    fn squat_counter() -> RepCounter {
        let classifier = PhaseClassifier::new(
            StateThresholds {
                neutral: 160.0,
                active: 100.0,
            },
            Direction::Decrease,
        )
        .unwrap();
        RepCounter::new(
            classifier,
            RepTiming {
                min_duration_ms: 800.0,
                min_active_ms: 200.0,
            },
        )
    }

    #[test]
    fn test_trimmed_mean_small_sample_untrimmed() {
        assert_eq!(trimmed_mean(&[1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(trimmed_mean(&[]), None);
    }

    #[test]
    fn test_shallow_dip_is_cancelled() {
        let mut counter = squat_counter();
        assert!(counter.update(0.0, Some(170.0), None).is_none());
        assert!(counter.update(300.0, Some(130.0), None).is_none());
        assert!(counter.update(1500.0, Some(170.0), None).is_none());
        assert_eq!(counter.count(), 0);
        assert_eq!(counter.rejected(), 1);
    }

    #[test]
    fn test_unknown_frames_are_ignored() {
        let mut counter = squat_counter();
        counter.update(0.0, Some(170.0), None);
        counter.update(100.0, None, None);
        assert_eq!(counter.state(), RepState::Neutral);
        assert!(!counter.in_progress());
    }

    #[test]
    fn test_hold_tracker_accumulates_consecutive_frames() {
        let mut hold = HoldTracker::new(15.0);
        hold.update(0.0, Some(5.0));
        hold.update(500.0, Some(8.0));
        hold.update(1000.0, Some(30.0));
        let status = hold.update(1500.0, Some(4.0));
        assert!(status.holding);
        assert!((status.held_ms - 500.0).abs() < f64::EPSILON);
        assert!((status.best_streak_ms - 500.0).abs() < f64::EPSILON);
    }
}
