// ABOUTME: Scoring engine producing per-component and weighted rep and frame scores
// ABOUTME: Missing metrics are excluded from the weighted total rather than scored as zero
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

use super::feedback::{Feedback, FeedbackTable};
use super::rule::ScoreStatus;
use crate::accumulator::{AccumulatorSet, Aggregation};
use crate::config::{ScoringComponent, ScoringProfile};
use crate::metrics::MetricsSnapshot;
use crate::phase::Phase;
use crate::rep_counter::RepEvent;
use fitplus_core::constants::scoring::{FULL_SCORE, SCORE_VERSION};
use serde::{Deserialize, Serialize};

/// Round to a fixed number of decimal places
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}

/// Score of one profile component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScore {
    /// Component key
    pub key: String,
    /// Display label
    pub label: String,
    /// Metric key as configured
    pub metric_key: String,
    /// External metric identifier
    pub metric_id: Option<i64>,
    /// Sample reduction used
    pub aggregation: Aggregation,
    /// Aggregated metric value
    pub value: Option<f64>,
    /// Score in `[0, 100]`
    pub score: Option<f64>,
    /// Score scaled to `max_score`
    pub points: Option<f64>,
    /// Relative weight
    pub weight: f64,
    /// Points at a perfect score
    pub max_score: f64,
    /// Outcome category
    pub status: ScoreStatus,
    /// Coaching message for this component
    pub feedback: Option<String>,
}

/// Weighted mean of scored components
///
/// Missing and skipped components are excluded from both numerator and
/// denominator. Returns `None` when nothing was scored or the remaining
/// weight is zero.
#[must_use]
pub fn weighted_total(components: &[ComponentScore]) -> Option<f64> {
    let (weighted, weight_sum) = components
        .iter()
        .filter(|c| c.status.is_scored())
        .filter_map(|c| c.score.map(|score| (score, c.weight)))
        .fold((0.0, 0.0), |(acc, sum), (score, weight)| {
            (score.mul_add(weight, acc), sum + weight)
        });
    (weight_sum > 0.0).then(|| round_to(weighted / weight_sum, 2))
}

/// Score of one completed rep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepScoreResult {
    /// Scoring algorithm version
    pub version: String,
    /// 1-based rep number
    pub rep_index: u32,
    /// Time since the previous rep
    pub rep_interval_ms: f64,
    /// Rep duration
    pub duration_ms: f64,
    /// Weighted component total; `None` when every component is missing
    pub total: Option<f64>,
    /// Trimmed mean of the rep's live frame scores
    pub frame_score: Option<f64>,
    /// Component breakdown
    pub components: Vec<ComponentScore>,
    /// Rep-level coaching message
    pub feedback: Feedback,
}

impl RepScoreResult {
    /// Component total, falling back to the frame-score mean
    #[must_use]
    pub fn effective_score(&self) -> Option<f64> {
        self.total.or(self.frame_score)
    }
}

/// Live score of one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameScore {
    /// Frame timestamp
    pub timestamp_ms: f64,
    /// Phase the frame was scored in
    pub phase: Phase,
    /// Weighted total over components evaluated in this phase
    pub total: Option<f64>,
    /// Component breakdown
    pub components: Vec<ComponentScore>,
}

/// Grades reps and frames against one scoring profile
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    profile: ScoringProfile,
    feedback: FeedbackTable,
}

impl ScoringEngine {
    /// Engine with the built-in feedback table for the profile's exercise
    #[must_use]
    pub fn new(profile: ScoringProfile) -> Self {
        let mut feedback = FeedbackTable::for_exercise(&profile.exercise_code);
        for component in &profile.components {
            for (status, message) in &component.feedback {
                feedback.insert(&component.key, *status, message.clone());
            }
        }
        Self { profile, feedback }
    }

    /// Override the worst-component score treated as a clean rep
    #[must_use]
    pub fn with_success_threshold(mut self, threshold: f64) -> Self {
        self.feedback = self.feedback.with_success_threshold(threshold);
        self
    }

    /// Profile being graded against
    #[must_use]
    pub const fn profile(&self) -> &ScoringProfile {
        &self.profile
    }

    fn component_score(
        &self,
        component: &ScoringComponent,
        value: Option<f64>,
        status_if_absent: ScoreStatus,
    ) -> ComponentScore {
        let mut result = ComponentScore {
            key: component.key.clone(),
            label: component.label.clone(),
            metric_key: component.metric.as_str().to_owned(),
            metric_id: component.metric_id,
            aggregation: component.aggregation,
            value: None,
            score: None,
            points: None,
            weight: component.weight,
            max_score: component.max_score,
            status: status_if_absent,
            feedback: None,
        };
        let Some(value) = value.filter(|v| v.is_finite()) else {
            return result;
        };
        let (score, status) = component.rule.score(value);
        result.value = Some(round_to(value, 4));
        result.score = Some(round_to(score, 2));
        result.points = Some(round_to(score * component.max_score / FULL_SCORE, 2));
        result.status = status;
        result.feedback = self
            .feedback
            .lookup(&component.key, status)
            .map(str::to_owned);
        result
    }

    /// Score a completed rep from its accumulated metric values
    #[must_use]
    pub fn score_rep(&self, accumulators: &AccumulatorSet, rep: &RepEvent) -> RepScoreResult {
        let components: Vec<ComponentScore> = self
            .profile
            .components
            .iter()
            .enumerate()
            .map(|(idx, component)| {
                self.component_score(component, accumulators.value(idx), ScoreStatus::Missing)
            })
            .collect();
        let feedback = self.summarize(&components);

        RepScoreResult {
            version: SCORE_VERSION.to_owned(),
            rep_index: rep.rep_index,
            rep_interval_ms: rep.rep_interval_ms,
            duration_ms: rep.duration_ms,
            total: weighted_total(&components),
            frame_score: rep.frame_score.map(|s| round_to(s, 2)),
            components,
            feedback,
        }
    }

    /// Score a single frame's raw metric values
    ///
    /// Components gated to other phases are `skipped`; absent values are `missing`.
    #[must_use]
    pub fn score_frame(&self, snapshot: &MetricsSnapshot) -> FrameScore {
        let components: Vec<ComponentScore> = self
            .profile
            .components
            .iter()
            .map(|component| {
                if component.accepts(snapshot.phase) {
                    self.component_score(
                        component,
                        component.metric.value_in(snapshot),
                        ScoreStatus::Missing,
                    )
                } else {
                    self.component_score(component, None, ScoreStatus::Skipped)
                }
            })
            .collect();

        FrameScore {
            timestamp_ms: snapshot.timestamp_ms,
            phase: snapshot.phase,
            total: weighted_total(&components),
            components,
        }
    }

    /// Rep-level feedback from the worst component
    #[must_use]
    pub fn summarize(&self, components: &[ComponentScore]) -> Feedback {
        self.feedback.summarize(
            components
                .iter()
                .map(|c| (c.key.as_str(), c.score, c.status)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(status: ScoreStatus, score: Option<f64>, weight: f64) -> ComponentScore {
        ComponentScore {
            key: "k".to_owned(),
            label: "k".to_owned(),
            metric_key: "knee_angle".to_owned(),
            metric_id: None,
            aggregation: Aggregation::Last,
            value: score,
            score,
            points: score,
            weight,
            max_score: 100.0,
            status,
            feedback: None,
        }
    }

    #[test]
    fn test_missing_components_excluded_from_total() {
        let components = [
            component(ScoreStatus::Ok, Some(100.0), 0.5),
            component(ScoreStatus::Missing, None, 0.5),
        ];
        assert_eq!(weighted_total(&components), Some(100.0));
    }

    #[test]
    fn test_zero_weight_yields_none() {
        let components = [component(ScoreStatus::Ok, Some(90.0), 0.0)];
        assert_eq!(weighted_total(&components), None);
    }

    #[test]
    fn test_round_to() {
        assert!((round_to(1.23456, 2) - 1.23).abs() < 1e-12);
    }
}
