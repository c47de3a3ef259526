// ABOUTME: One live workout session: frame tracking, aggregation, and event publication
// ABOUTME: Synchronous per-frame processing; events fan out over a broadcast bus
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

use super::aggregator::{Observation, SessionAggregator};
use super::summary::SessionSummary;
use crate::config::MotionConfig;
use crate::events::{SessionEvent, SessionEventBus};
use fitplus_core::errors::AppResult;
use fitplus_core::models::{PoseFrame, SessionHandle, SetRecord};
use fitplus_motion::{
    ExercisePattern, FrameScore, HoldStatus, MetricsSnapshot, MotionTracker, RepScoreResult,
    ScoringProfile,
};
use tokio::sync::broadcast;
use tracing::{debug, instrument};

/// What one frame produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutcome {
    /// Classified metrics; `None` when the frame was skipped
    pub snapshot: Option<MetricsSnapshot>,
    /// Live frame score
    pub frame_score: Option<FrameScore>,
    /// Rep completed on this frame
    pub rep: Option<RepScoreResult>,
    /// Hold progress for hold exercises
    pub hold: Option<HoldStatus>,
}

/// A live workout session
///
/// Owns every stateful component for exactly one session; nothing is
/// shared across sessions.
#[derive(Debug)]
pub struct WorkoutSession {
    handle: SessionHandle,
    pattern: ExercisePattern,
    tracker: MotionTracker,
    aggregator: SessionAggregator,
    events: SessionEventBus,
}

impl WorkoutSession {
    /// Build a session for an exercise pattern and scoring profile
    ///
    /// # Errors
    ///
    /// Returns a config error when the pattern's thresholds are invalid
    pub fn new(
        handle: SessionHandle,
        pattern: ExercisePattern,
        profile: ScoringProfile,
        config: &MotionConfig,
    ) -> AppResult<Self> {
        pattern.validate()?;
        let tracker = MotionTracker::new(
            pattern.primary_metric,
            profile.metric_keys().collect::<Vec<_>>(),
            pattern.classifier()?,
            config.tracker,
        );
        let aggregator = SessionAggregator::new(&pattern, profile, config)?;
        Ok(Self {
            handle,
            pattern,
            tracker,
            aggregator,
            events: SessionEventBus::new(config.event_buffer),
        })
    }

    /// Session handle
    #[must_use]
    pub const fn handle(&self) -> SessionHandle {
        self.handle
    }

    /// Exercise pattern
    #[must_use]
    pub const fn pattern(&self) -> &ExercisePattern {
        &self.pattern
    }

    /// Aggregated state so far
    #[must_use]
    pub const fn aggregator(&self) -> &SessionAggregator {
        &self.aggregator
    }

    /// Subscribe to this session's events
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Process one pose frame
    ///
    /// Frames without a person or with a non-advancing timestamp produce an
    /// empty outcome and change nothing.
    #[instrument(skip_all, fields(session = %self.handle, t = frame.timestamp_ms))]
    pub fn process_frame(&mut self, frame: &PoseFrame) -> FrameOutcome {
        let Some(mut snapshot) = self.tracker.observe(frame) else {
            return FrameOutcome::default();
        };
        let Observation {
            frame_score,
            rep,
            hold,
        } = self.aggregator.observe(&mut snapshot);

        if let Some(result) = &rep {
            debug!(rep_index = result.rep_index, total = ?result.total, "Publishing rep");
            self.events.publish(SessionEvent::RepCompleted {
                handle: self.handle,
                result: Box::new(result.clone()),
            });
            self.events.publish(SessionEvent::Feedback {
                handle: self.handle,
                feedback: result.feedback.clone(),
            });
        }
        if let Some(status) = hold {
            self.events.publish(SessionEvent::Hold {
                handle: self.handle,
                status,
            });
        }

        FrameOutcome {
            snapshot: Some(snapshot),
            frame_score: Some(frame_score),
            rep,
            hold,
        }
    }

    /// Close the current set
    pub fn complete_set(&mut self, rest_sec: u64) -> SetRecord {
        let set = self.aggregator.complete_set(rest_sec);
        self.events.publish(SessionEvent::SetCompleted {
            handle: self.handle,
            set: set.clone(),
        });
        set
    }

    /// Record a discrete event
    pub fn add_event(
        &mut self,
        event_type: impl Into<String>,
        payload: serde_json::Value,
        timestamp_ms: f64,
    ) {
        self.aggregator.add_event(event_type, payload, timestamp_ms);
    }

    /// Build the summary and announce it
    pub fn finalize(&mut self) -> SessionSummary {
        let summary = self.aggregator.finalize();
        self.events.publish(SessionEvent::Finalized {
            handle: self.handle,
            summary: Box::new(summary.clone()),
        });
        summary
    }

    /// Hard reset: discard all tracking and scoring state
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.aggregator.reset();
    }
}
