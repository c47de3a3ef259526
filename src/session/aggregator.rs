// ABOUTME: Session aggregator owning the rep counter, accumulators, and scoring engine
// ABOUTME: Scores each snapshot, records reps, sets, and events, and builds the final summary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

use super::summary::{
    MetricResult, RepRecord, SessionDetail, SessionStats, SessionSummary, TimelineSample,
};
use crate::config::MotionConfig;
use chrono::{DateTime, Utc};
use fitplus_core::errors::AppResult;
use fitplus_core::models::{SessionEventRecord, SetPhase, SetRecord};
use fitplus_motion::scoring::round_to;
use fitplus_motion::{
    AccumulatorSet, ExercisePattern, FrameScore, HoldStatus, HoldTracker, MetricKey,
    MetricsSnapshot, RepCounter, RepScoreResult, ScoringEngine, ScoringProfile,
};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// What one snapshot produced
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Live frame score
    pub frame_score: FrameScore,
    /// Rep completed on this frame
    pub rep: Option<RepScoreResult>,
    /// Hold progress for hold exercises
    pub hold: Option<HoldStatus>,
}

fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0_usize), |(sum, n), v| (sum + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

fn summary_sentence(final_score: Option<f64>, reps: u32) -> String {
    let mut sentence = match final_score {
        None => "No scored movement was detected.".to_owned(),
        Some(s) if s >= 90.0 => "Perfect! You trained with excellent form.".to_owned(),
        Some(s) if s >= 80.0 => "Well done! Your form was very good.".to_owned(),
        Some(s) if s >= 70.0 => "Good! A little more attention and it will be perfect.".to_owned(),
        Some(s) if s >= 60.0 => "Not bad. Focus a bit more on your form.".to_owned(),
        Some(_) => "Your form needs correction. Check the exercise guide.".to_owned(),
    };
    if reps > 0 {
        sentence.push_str(&format!(" {reps} reps completed!"));
    }
    sentence
}

/// Per-session scoring state and history
#[derive(Debug)]
pub struct SessionAggregator {
    exercise_code: String,
    primary: MetricKey,
    counter: Option<RepCounter>,
    hold: Option<HoldTracker>,
    accumulators: AccumulatorSet,
    engine: ScoringEngine,
    timeline_interval_ms: f64,
    started_at: DateTime<Utc>,
    origin_ms: Option<f64>,
    last_seen_ms: Option<f64>,
    last_timeline_ms: Option<f64>,
    timeline: Vec<TimelineSample>,
    rep_results: Vec<RepScoreResult>,
    rep_records: Vec<RepRecord>,
    sets: Vec<SetRecord>,
    set_number: u32,
    set_started_ms: Option<f64>,
    set_reps: u32,
    events: Vec<SessionEventRecord>,
    last_hold: Option<HoldStatus>,
}

impl SessionAggregator {
    /// Aggregator for one exercise and profile
    ///
    /// # Errors
    ///
    /// Returns a config error if the exercise pattern is invalid or the
    /// profile gates a component to phases the exercise never reports
    pub fn new(
        pattern: &ExercisePattern,
        profile: ScoringProfile,
        config: &MotionConfig,
    ) -> AppResult<Self> {
        pattern.check_profile(&profile)?;
        Ok(Self {
            exercise_code: pattern.code.clone(),
            primary: pattern.primary_metric,
            counter: pattern.rep_counter()?,
            hold: pattern.hold_tracker(),
            accumulators: profile.accumulators(),
            engine: ScoringEngine::new(profile).with_success_threshold(config.success_threshold),
            timeline_interval_ms: config.timeline_interval_ms,
            started_at: Utc::now(),
            origin_ms: None,
            last_seen_ms: None,
            last_timeline_ms: None,
            timeline: Vec::new(),
            rep_results: Vec::new(),
            rep_records: Vec::new(),
            sets: Vec::new(),
            set_number: 1,
            set_started_ms: None,
            set_reps: 0,
            events: Vec::new(),
            last_hold: None,
        })
    }

    fn relative(&self, timestamp_ms: f64) -> f64 {
        self.origin_ms.map_or(0.0, |origin| timestamp_ms - origin)
    }

    fn touch(&mut self, timestamp_ms: f64) {
        self.origin_ms.get_or_insert(timestamp_ms);
        self.set_started_ms.get_or_insert(timestamp_ms);
        self.last_seen_ms = Some(timestamp_ms);
    }

    /// Score a classified snapshot and advance rep or hold tracking
    ///
    /// The frame that closes a rep is back at rest, so it only contributes
    /// `rep_interval_ms`; its other metrics are not accumulated.
    pub fn observe(&mut self, snapshot: &mut MetricsSnapshot) -> Observation {
        let t = snapshot.timestamp_ms;
        self.touch(t);

        let frame_score = self.engine.score_frame(snapshot);
        self.add_frame_score(&frame_score);

        if let Some(hold) = &mut self.hold {
            let status = hold.update(t, snapshot.get(self.primary));
            self.last_hold = Some(status);
            return Observation {
                frame_score,
                rep: None,
                hold: Some(status),
            };
        }

        let Some(counter) = &mut self.counter else {
            return Observation {
                frame_score,
                rep: None,
                hold: None,
            };
        };

        let was_in_progress = counter.in_progress();
        let event = counter.advance(t, snapshot.state, frame_score.total);
        let in_progress = counter.in_progress();

        if in_progress && !was_in_progress {
            self.accumulators.reset();
        }

        let rep = if let Some(event) = event {
            snapshot.set(MetricKey::RepIntervalMs, Some(event.rep_interval_ms));
            self.accumulators
                .record(MetricKey::RepIntervalMs, event.rep_interval_ms);
            let result = self.engine.score_rep(&self.accumulators, &event);
            self.accumulators.reset();
            self.add_rep(result.clone(), t);
            Some(result)
        } else {
            if in_progress {
                self.accumulators.update(snapshot);
            } else if was_in_progress {
                self.accumulators.reset();
            }
            None
        };

        Observation {
            frame_score,
            rep,
            hold: None,
        }
    }

    /// Record a completed rep
    pub fn add_rep(&mut self, result: RepScoreResult, timestamp_ms: f64) {
        let record = RepRecord {
            rep_index: result.rep_index,
            set_number: self.set_number,
            relative_time_ms: self.relative(timestamp_ms),
            score: result.effective_score(),
            duration_ms: result.duration_ms,
            rep_interval_ms: result.rep_interval_ms,
            feedback: result.feedback.clone(),
        };
        info!(
            exercise = %self.exercise_code,
            rep_index = record.rep_index,
            score = ?record.score,
            "Rep recorded"
        );
        self.rep_records.push(record);
        self.rep_results.push(result);
        self.set_reps += 1;
    }

    /// Append a frame score to the timeline, at most once per interval
    ///
    /// Frames without a total are not sampled.
    pub fn add_frame_score(&mut self, score: &FrameScore) {
        let Some(total) = score.total else {
            return;
        };
        let t = score.timestamp_ms;
        if self
            .last_timeline_ms
            .is_some_and(|last| t - last < self.timeline_interval_ms)
        {
            return;
        }
        self.last_timeline_ms = Some(t);
        let breakdown = score
            .components
            .iter()
            .filter_map(|c| c.score.map(|s| (c.key.clone(), s)))
            .collect();
        self.timeline.push(TimelineSample {
            relative_time_ms: self.relative(t),
            score: total,
            phase: score.phase,
            breakdown,
        });
    }

    /// Close the current set and start the next
    pub fn complete_set(&mut self, rest_sec: u64) -> SetRecord {
        let duration_ms = match (self.set_started_ms, self.last_seen_ms) {
            (Some(start), Some(end)) => (end - start).max(0.0),
            _ => 0.0,
        };
        let record = SetRecord {
            set_no: self.set_number,
            phase: SetPhase::Work,
            actual_reps: self.set_reps,
            duration_sec: (duration_ms / 1000.0).round() as u64,
            rest_sec,
        };
        debug!(set_no = record.set_no, reps = record.actual_reps, "Set completed");
        self.sets.push(record.clone());
        self.set_number += 1;
        self.set_reps = 0;
        self.set_started_ms = self.last_seen_ms;
        record
    }

    /// Record a discrete event at `timestamp_ms`
    pub fn add_event(
        &mut self,
        event_type: impl Into<String>,
        payload: serde_json::Value,
        timestamp_ms: f64,
    ) {
        self.events.push(SessionEventRecord {
            event_type: event_type.into(),
            payload,
            timestamp_ms: self.relative(timestamp_ms),
        });
    }

    /// Completed reps
    #[must_use]
    pub fn total_reps(&self) -> u32 {
        self.rep_records.len() as u32
    }

    /// Scored reps in completion order
    #[must_use]
    pub fn rep_results(&self) -> &[RepScoreResult] {
        &self.rep_results
    }

    /// Downsampled timeline
    #[must_use]
    pub fn timeline(&self) -> &[TimelineSample] {
        &self.timeline
    }

    fn duration_sec(&self) -> u64 {
        match (self.origin_ms, self.last_seen_ms) {
            (Some(origin), Some(last)) => ((last - origin).max(0.0) / 1000.0).round() as u64,
            _ => 0,
        }
    }

    fn final_score(&self) -> Option<f64> {
        let score = if self.rep_records.is_empty() {
            mean(self.timeline.iter().map(|s| s.score))
        } else {
            mean(self.rep_records.iter().filter_map(|r| r.score))
        };
        score.map(|s| round_to(s, 2))
    }

    fn metric_results(&self) -> Vec<MetricResult> {
        let mut order: Vec<String> = Vec::new();
        let mut grouped: BTreeMap<String, (MetricResult, Vec<f64>, Vec<f64>)> = BTreeMap::new();
        for component in self.rep_results.iter().flat_map(|r| &r.components) {
            let entry = grouped.entry(component.key.clone()).or_insert_with(|| {
                order.push(component.key.clone());
                (
                    MetricResult {
                        key: component.key.clone(),
                        metric_key: component.metric_key.clone(),
                        metric_id: component.metric_id,
                        score: None,
                        raw: None,
                        samples: 0,
                    },
                    Vec::new(),
                    Vec::new(),
                )
            });
            if let Some(score) = component.score {
                entry.1.push(score);
                if let Some(value) = component.value {
                    entry.2.push(value);
                }
            }
        }
        order
            .iter()
            .filter_map(|key| grouped.remove(key))
            .map(|(mut result, scores, raws)| {
                result.samples = scores.len();
                result.score = mean(scores).map(|s| round_to(s, 2));
                result.raw = mean(raws).map(|v| round_to(v, 4));
                result
            })
            .collect()
    }

    /// Build the session summary
    ///
    /// Non-destructive; the aggregator keeps accepting frames afterwards.
    #[must_use]
    pub fn finalize(&self) -> SessionSummary {
        let total_reps = self.total_reps();
        let final_score = self.final_score();

        let set_records = if self.sets.is_empty() {
            vec![SetRecord {
                set_no: 1,
                phase: SetPhase::Work,
                actual_reps: total_reps,
                duration_sec: self.duration_sec(),
                rest_sec: 0,
            }]
        } else {
            self.sets.clone()
        };

        let best = self
            .rep_records
            .iter()
            .filter_map(|r| r.score.map(|s| (r.rep_index, s)))
            .max_by(|a, b| a.1.total_cmp(&b.1));

        let stats = SessionStats {
            average_rep_score: mean(self.rep_records.iter().filter_map(|r| r.score))
                .map(|s| round_to(s, 2)),
            best_rep: best.map(|(idx, _)| idx),
            best_rep_score: best.map(|(_, s)| s),
            total_sets: set_records.len(),
            rejected_reps: self.counter.as_ref().map_or(0, RepCounter::rejected),
            hold_ms: self.last_hold.map(|h| h.held_ms),
        };

        SessionSummary {
            exercise_code: self.exercise_code.clone(),
            started_at: self.started_at,
            duration_sec: self.duration_sec(),
            total_reps,
            final_score,
            summary_feedback: summary_sentence(final_score, total_reps),
            detail: SessionDetail {
                timeline: self.timeline.clone(),
                rep_records: self.rep_records.clone(),
                set_records,
                events: self.events.clone(),
                stats,
            },
            metric_results: self.metric_results(),
        }
    }

    /// Summary as JSON for the persistence boundary
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the summary cannot be encoded
    pub fn export(&self) -> AppResult<serde_json::Value> {
        Ok(serde_json::to_value(self.finalize())?)
    }

    /// Discard all in-progress state and history
    pub fn reset(&mut self) {
        if let Some(counter) = &mut self.counter {
            counter.reset();
        }
        if let Some(hold) = &mut self.hold {
            hold.reset();
        }
        self.accumulators.reset();
        self.started_at = Utc::now();
        self.origin_ms = None;
        self.last_seen_ms = None;
        self.last_timeline_ms = None;
        self.timeline.clear();
        self.rep_results.clear();
        self.rep_records.clear();
        self.sets.clear();
        self.set_number = 1;
        self.set_started_ms = None;
        self.set_reps = 0;
        self.events.clear();
        self.last_hold = None;
    }
}
